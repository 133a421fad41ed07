use drm_common::BlockStatus;

/// One compressed audio frame produced by either parser variant, owned
/// by the parser for exactly one super-frame tick and consumed by the
/// decoder on the same tick.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub payload: Vec<u8>,
    pub status: BlockStatus,
}

impl FrameRecord {
    pub fn bad(status: BlockStatus) -> Self {
        FrameRecord {
            payload: Vec::new(),
            status,
        }
    }
}

/// Output of parsing one super-frame: the per-frame records in
/// transmission order, plus a super-frame-level validity flag.
#[derive(Debug, Clone)]
pub struct SuperFrameOutput {
    pub frames: Vec<FrameRecord>,
    pub super_frame_ok: bool,
}
