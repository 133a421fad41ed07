//! Orchestrates the per-service audio pipeline: super-frame parser,
//! codec, resampler, and dropout concealment, yielding one stereo PCM
//! block per super-frame tick.

mod codec;
mod decoder;
mod error;
mod output_limiter;

pub use codec::{AudioCodec, DecodedAudio, MockCodec};
pub use decoder::{AudioSourceDecoder, DecodedBlock, TextMessageBits};
pub use error::{DecoderError, InitCapability};
pub use output_limiter::OutputLimiter;
