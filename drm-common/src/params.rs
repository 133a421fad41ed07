use serde::{Deserialize, Serialize};

/// Audio coding family carried in a service's `AudioParameters`.
///
/// Once a super-frame has started being parsed, the coding family and
/// sample rate must not change mid-frame; a change is only permitted
/// between super-frames and forces the owning parser to reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodingFamily {
    Aac,
    XheAac,
    Opus,
    None,
}

/// Sample rates used for DRM audio services (Table 5 / Table 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleRate {
    Hz9600,
    Hz12000,
    Hz16000,
    Hz19200,
    Hz24000,
    Hz32000,
    Hz38400,
    Hz48000,
}

impl SampleRate {
    pub fn as_hz(self) -> u32 {
        match self {
            SampleRate::Hz9600 => 9_600,
            SampleRate::Hz12000 => 12_000,
            SampleRate::Hz16000 => 16_000,
            SampleRate::Hz19200 => 19_200,
            SampleRate::Hz24000 => 24_000,
            SampleRate::Hz32000 => 32_000,
            SampleRate::Hz38400 => 38_400,
            SampleRate::Hz48000 => 48_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StereoMode {
    Mono,
    Stereo,
    PStereo,
}

/// DRM transmission robustness mode. Together with the sample rate, this
/// selects the super-frame layout (see `drm_parser::SuperFrameLayout`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobustnessMode {
    A,
    B,
    C,
    D,
    E,
}

/// Per-service descriptor delivered by the (external) demodulator/SDC
/// decoder alongside each super-frame's payload bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioParameters {
    pub coding: CodingFamily,
    pub sample_rate: SampleRate,
    pub stereo_mode: StereoMode,
    pub text_flag: bool,
    pub sbr_flag: bool,
    /// Opaque "type-9" codec configuration bytes as published by the SDC.
    pub type9_config: Vec<u8>,
}

impl AudioParameters {
    /// Whether a change from `self` to `other` is audible mid-stream
    /// and must force the owning parser/decoder to reset rather than
    /// continue with stale frame-layout state.
    pub fn requires_reset(&self, other: &AudioParameters) -> bool {
        self.coding != other.coding || self.sample_rate != other.sample_rate
    }
}
