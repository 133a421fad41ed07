use drm_common::{RobustnessMode, SampleRate};

/// Super-frame layout derived from (robustness mode, sample rate): how
/// many audio frames make up one super-frame, and how long the
/// super-frame lasts on the air. See spec Table in component C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperFrameLayout {
    pub num_frames: usize,
    pub duration_ms: u32,
}

impl SuperFrameLayout {
    pub fn num_borders(&self) -> usize {
        self.num_frames - 1
    }

    /// AAC header size in bytes: `12 * (N-1)` bits, plus 4 reserved bits
    /// for the 9-border (10-frame) case, padded to the byte.
    pub fn aac_header_bytes(&self) -> usize {
        let borders = self.num_borders();
        let mut header_bits = 12 * borders;
        if borders == 9 {
            header_bits += 4;
        }
        header_bits / 8
    }

    /// Selects the layout for the AAC variant from (robustness, sample rate).
    ///
    /// | Robustness | 12 kHz | 24 kHz | 48 kHz |
    /// |---|---|---|---|
    /// | A/B/C/D | 5 frames, 400 ms | 10 frames, 400 ms | - |
    /// | E | - | 5 frames, 200 ms | 10 frames, 200 ms |
    pub fn select(robustness: RobustnessMode, sample_rate: SampleRate) -> Option<SuperFrameLayout> {
        use RobustnessMode::*;
        use SampleRate::*;

        match robustness {
            A | B | C | D => match sample_rate {
                Hz12000 => Some(SuperFrameLayout {
                    num_frames: 5,
                    duration_ms: 400,
                }),
                Hz24000 => Some(SuperFrameLayout {
                    num_frames: 10,
                    duration_ms: 400,
                }),
                _ => None,
            },
            E => match sample_rate {
                Hz24000 => Some(SuperFrameLayout {
                    num_frames: 5,
                    duration_ms: 200,
                }),
                Hz48000 => Some(SuperFrameLayout {
                    num_frames: 10,
                    duration_ms: 200,
                }),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_five_frame_layout() {
        let layout = SuperFrameLayout::select(RobustnessMode::A, SampleRate::Hz12000).unwrap();
        assert_eq!(layout.num_frames, 5);
        assert_eq!(layout.duration_ms, 400);
        assert_eq!(layout.aac_header_bytes(), 6);
    }

    #[test]
    fn selects_ten_frame_layout_with_reserved_bits() {
        let layout = SuperFrameLayout::select(RobustnessMode::D, SampleRate::Hz24000).unwrap();
        assert_eq!(layout.num_frames, 10);
        assert_eq!(layout.aac_header_bytes(), 14);
    }

    #[test]
    fn mode_e_selects_200ms_super_frames() {
        let layout = SuperFrameLayout::select(RobustnessMode::E, SampleRate::Hz48000).unwrap();
        assert_eq!(layout.num_frames, 10);
        assert_eq!(layout.duration_ms, 200);
    }

    #[test]
    fn invalid_combination_returns_none() {
        assert!(SuperFrameLayout::select(RobustnessMode::A, SampleRate::Hz48000).is_none());
        assert!(SuperFrameLayout::select(RobustnessMode::E, SampleRate::Hz12000).is_none());
    }
}
