use log::warn;

use drm_bitstream::{BitCursor, CrcUnit, CrcWidth};
use drm_common::BlockStatus;

use crate::error::ParseError;
use crate::frame::{FrameRecord, SuperFrameOutput};
use crate::layout::SuperFrameLayout;

/// Parses the AAC super-frame layout (DRM spec Table 5): a 12-bit frame
/// border per border, then each frame's higher-protected bytes + 8-bit
/// CRC, then each frame's lower-protected bytes.
pub struct AacParser {
    layout: SuperFrameLayout,
}

impl AacParser {
    pub fn new(layout: SuperFrameLayout) -> Self {
        AacParser { layout }
    }

    pub fn layout(&self) -> SuperFrameLayout {
        self.layout
    }

    /// Parses one super-frame. Any structural failure collapses the
    /// whole super-frame to `DATA_ERROR`, matching spec §4.3's failure
    /// policy; per-frame CRC failures mark only that frame as
    /// `CRC_ERROR` without failing the super-frame.
    pub fn parse(&self, data: &[u8], length_a: usize, length_b: usize) -> SuperFrameOutput {
        match self.try_parse(data, length_a, length_b) {
            Ok(output) => output,
            Err(err) => {
                warn!("AAC super-frame parse failed, marking DATA_ERROR: {err}");
                SuperFrameOutput {
                    frames: vec![FrameRecord::bad(BlockStatus::DataError); self.layout.num_frames],
                    super_frame_ok: false,
                }
            }
        }
    }

    fn try_parse(
        &self,
        data: &[u8],
        length_a: usize,
        length_b: usize,
    ) -> Result<SuperFrameOutput, ParseError> {
        let num_frames = self.layout.num_frames;
        let num_borders = self.layout.num_borders();
        let header_bytes = self.layout.aac_header_bytes();

        let audio_payload_length = length_a
            .checked_add(length_b)
            .and_then(|total| total.checked_sub(header_bytes))
            .and_then(|total| total.checked_sub(num_frames))
            .ok_or(ParseError::FrameLengthMismatch)?;

        let mut cursor = BitCursor::new(data);

        let mut frame_lengths = Vec::with_capacity(num_frames);
        let mut previous_border: usize = 0;
        for index in 0..num_borders {
            let mut border = cursor.separate(12)? as usize;
            if border < previous_border {
                border += 4096; // Table 11 note: modular wrap
            }
            let length = border - previous_border;
            if length > audio_payload_length {
                return Err(ParseError::InvalidFrameLength {
                    index,
                    length: length as i64,
                    payload_len: audio_payload_length,
                });
            }
            frame_lengths.push(length);
            previous_border = border;
        }

        if num_borders == 9 {
            cursor.separate(4)?; // reserved
        }

        let last_length = audio_payload_length
            .checked_sub(previous_border)
            .ok_or(ParseError::FrameLengthMismatch)?;
        frame_lengths.push(last_length);

        let higher_protected_bytes = if length_a > 0 {
            length_a
                .checked_sub(header_bytes)
                .and_then(|v| v.checked_sub(num_frames))
                .map(|v| v / num_frames)
                .ok_or(ParseError::FrameLengthMismatch)?
        } else {
            0
        };

        let mut payloads: Vec<Vec<u8>> = frame_lengths.iter().map(|&len| vec![0u8; len]).collect();
        let mut frame_crc = vec![0u8; num_frames];

        // A UEP border table can yield a frame shorter than the per-frame
        // higher-protected byte count; fail the super-frame instead of
        // indexing past that frame's payload.
        let lower_protected_bytes: Vec<usize> = frame_lengths
            .iter()
            .map(|&len| len.checked_sub(higher_protected_bytes).ok_or(ParseError::FrameLengthMismatch))
            .collect::<Result<_, _>>()?;

        // Higher-protected part, CRC interleaved per frame (EEP: higher_protected_bytes == 0,
        // so this loop degenerates to reading every frame's CRC back to back).
        for f in 0..num_frames {
            for b in 0..higher_protected_bytes {
                payloads[f][b] = cursor.separate(8)? as u8;
            }
            frame_crc[f] = cursor.separate(8)? as u8;
        }

        // Lower-protected part.
        for f in 0..num_frames {
            for b in 0..lower_protected_bytes[f] {
                payloads[f][higher_protected_bytes + b] = cursor.separate(8)? as u8;
            }
        }

        let frames = payloads
            .into_iter()
            .zip(frame_crc.into_iter())
            .map(|(payload, crc)| {
                let status = if CrcUnit::compute(CrcWidth::Eight, &payload) == crc as u32 {
                    BlockStatus::RxOk
                } else {
                    BlockStatus::CrcError
                };
                FrameRecord { payload, status }
            })
            .collect();

        Ok(SuperFrameOutput {
            frames,
            super_frame_ok: true,
        })
    }
}
