use thiserror::Error;

use drm_bitstream::BitstreamError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("bitstream error: {0}")]
    Bitstream(#[from] BitstreamError),
    #[error("no super-frame layout for the given robustness mode / sample rate combination")]
    NoLayoutForParameters,
    #[error("frame length {length} at border {index} is negative or exceeds the audio payload length {payload_len}")]
    InvalidFrameLength {
        index: usize,
        length: i64,
        payload_len: usize,
    },
    #[error("sum of frame lengths did not reconcile with the audio payload length")]
    FrameLengthMismatch,
}
