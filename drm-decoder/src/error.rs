use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecoderError {
    #[error("no parser layout for the service's coding family / sample rate")]
    NoLayoutForParameters,
    #[error("codec initialization failed: {0}")]
    CodecInitFail(String),
    #[error("resampler error: {0}")]
    Resampler(#[from] drm_dsp::DspError),
}

/// Init-time capability taxonomy (spec §4.4, §7): a receiver never
/// fails to start outright, it downgrades what it can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitCapability {
    /// Bitstream parseable and a codec is available: full audio + text.
    DecodeAudio,
    /// Bitstream parseable but no decoder for this coding family: pass
    /// text-message bits through, produce silence for audio.
    AudioDecoderUnavailable,
    /// Cannot process any data for this service at all.
    CannotProcess,
}
