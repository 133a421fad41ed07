use crate::error::DecoderError;

/// One codec-native PCM block: one `Vec<f64>` per channel (length
/// `frame_size`, all channels the same length). Mono output is expanded
/// to stereo by the caller, not by the codec.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub channels: Vec<Vec<f64>>,
    pub frame_size: usize,
}

/// Opaque decoder abstraction standing in for the external AAC/xHE-AAC
/// codec handle (FDK-AAC in the source system). `decode` is handed one
/// compressed audio frame's payload and returns PCM at the codec's
/// native rate; `frame_size` may legitimately vary call to call for
/// xHE-AAC, which is why the resampler re-inits against it every tick.
pub trait AudioCodec {
    fn native_sample_rate(&self) -> u32;
    fn channels(&self) -> usize;
    fn decode(&mut self, payload: &[u8]) -> Result<DecodedAudio, DecoderError>;
}

/// Deterministic stand-in codec used by decoder tests and anywhere a
/// real AAC/xHE-AAC library isn't wired in. Turns each payload byte
/// into a sample scaled to a plausible PCM range; every frame decodes
/// to a fixed-size block at a fixed rate, matching the AAC transport's
/// fixed-frame-size behavior.
pub struct MockCodec {
    sample_rate: u32,
    channels: usize,
    frame_size: usize,
}

impl MockCodec {
    pub fn new(sample_rate: u32, channels: usize, frame_size: usize) -> Self {
        MockCodec {
            sample_rate,
            channels,
            frame_size,
        }
    }
}

impl AudioCodec for MockCodec {
    fn native_sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn decode(&mut self, payload: &[u8]) -> Result<DecodedAudio, DecoderError> {
        let mut samples = vec![0.0f64; self.frame_size];
        for (i, slot) in samples.iter_mut().enumerate() {
            let byte = payload.get(i % payload.len().max(1)).copied().unwrap_or(0);
            *slot = (byte as f64 - 128.0) * 64.0;
        }
        let channels = (0..self.channels).map(|_| samples.clone()).collect();
        Ok(DecodedAudio {
            channels,
            frame_size: self.frame_size,
        })
    }
}
