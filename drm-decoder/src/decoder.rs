use log::warn;

use drm_common::{AudioParameters, BlockStatus, RobustnessMode};
use drm_dsp::Resampler;
use drm_parser::{FrameSource, SuperFrameParser};
use drm_reverb::Reverb;

use crate::codec::AudioCodec;
use crate::error::{DecoderError, InitCapability};
use crate::output_limiter::OutputLimiter;

/// Trailing text-message bytes extracted from a super-frame whose
/// `AudioParameters::text_flag` is set (spec §4.4 step 1).
pub type TextMessageBits = [u8; 4];

/// Result of processing one super-frame tick: interleaved stereo PCM at
/// the output rate, the super-frame's aggregate status, and any
/// text-message bytes extracted for this tick.
pub struct DecodedBlock {
    pub pcm: Vec<i16>,
    pub status: BlockStatus,
    pub text_message: Option<TextMessageBits>,
}

/// Orchestrates `SuperFrameParser -> codec -> Resampler -> Reverb` into
/// one stereo PCM block per super-frame tick (spec §4.4, component H).
pub struct AudioSourceDecoder<C: AudioCodec> {
    params: AudioParameters,
    parser: SuperFrameParser,
    codec: C,
    resamplers: [Resampler; 2],
    reverb: Reverb,
    output_rate: u32,
    limiter: OutputLimiter,
    capability: InitCapability,
    last_frame_size: usize,
}

impl<C: AudioCodec> AudioSourceDecoder<C> {
    /// Builds the decoder for one service. `max_output_block_size` bounds
    /// `iDynamicMaxOutputBlockSize`; `default_frame_size` seeds the block
    /// length used for bad frames before any good frame has been decoded.
    pub fn new(
        params: AudioParameters,
        robustness: RobustnessMode,
        codec: C,
        output_rate: u32,
        max_output_block_size: usize,
        default_frame_size: usize,
    ) -> Result<Self, DecoderError> {
        let parser = SuperFrameParser::for_parameters(&params, robustness)
            .map_err(|_| DecoderError::NoLayoutForParameters)?;

        let native_rate = codec.native_sample_rate();
        let resamplers = [
            Resampler::new(native_rate, output_rate, default_frame_size)?,
            Resampler::new(native_rate, output_rate, default_frame_size)?,
        ];

        Ok(AudioSourceDecoder {
            params,
            parser,
            codec,
            resamplers,
            reverb: Reverb::new(output_rate as f64, true),
            output_rate,
            limiter: OutputLimiter::new(max_output_block_size),
            capability: InitCapability::DecodeAudio,
            last_frame_size: default_frame_size,
        })
    }

    pub fn capability(&self) -> InitCapability {
        self.capability
    }

    /// Resets the parser (and its frame-reassembly state) when the
    /// service's `AudioParameters` change audibly mid-stream.
    pub fn reset_for_parameters(
        &mut self,
        params: AudioParameters,
        robustness: RobustnessMode,
    ) -> Result<(), DecoderError> {
        self.parser = SuperFrameParser::for_parameters(&params, robustness)
            .map_err(|_| DecoderError::NoLayoutForParameters)?;
        self.params = params;
        Ok(())
    }

    /// Processes one super-frame's MSC payload into a stereo PCM block.
    pub fn process(
        &mut self,
        input_bits: &[u8],
        length_a: usize,
        length_b: usize,
    ) -> Result<DecodedBlock, DecoderError> {
        if self.capability == InitCapability::CannotProcess {
            return Ok(DecodedBlock {
                pcm: Vec::new(),
                status: BlockStatus::NotPresent,
                text_message: None,
            });
        }

        let (audio_bits, text_message) = if self.params.text_flag {
            extract_text_message(input_bits)
        } else {
            (input_bits, None)
        };

        let output = self
            .parser
            .parse_super_frame(audio_bits, length_a, length_b);

        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut all_ok = output.super_frame_ok;

        for frame in &output.frames {
            if frame.status != BlockStatus::RxOk {
                all_ok = false;
                let (mut l, mut r) = (vec![0.0; self.last_frame_size], vec![0.0; self.last_frame_size]);
                self.reverb.apply(&mut l, &mut r, false);
                left.extend(l);
                right.extend(r);
                continue;
            }

            let decoded = match self.codec.decode(&frame.payload) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warn!("codec decode failed, concealing frame: {err}");
                    all_ok = false;
                    let (mut l, mut r) =
                        (vec![0.0; self.last_frame_size], vec![0.0; self.last_frame_size]);
                    self.reverb.apply(&mut l, &mut r, false);
                    left.extend(l);
                    right.extend(r);
                    continue;
                }
            };

            self.last_frame_size = decoded.frame_size;
            for resampler in &mut self.resamplers {
                resampler.reinit_for_frame_size(decoded.frame_size)?;
            }

            let mut mono_or_left = self.resamplers[0].process(&decoded.channels[0])?;
            let mut right_channel = if decoded.channels.len() > 1 {
                self.resamplers[1].process(&decoded.channels[1])?
            } else {
                mono_or_left.clone()
            };

            self.reverb.apply(&mut mono_or_left, &mut right_channel, true);
            left.extend(mono_or_left);
            right.extend(right_channel);
        }

        let budget = self.limiter.update(all_ok);
        left.truncate(budget);
        right.truncate(budget);

        let status = if all_ok {
            BlockStatus::RxOk
        } else if output.super_frame_ok {
            BlockStatus::CrcError
        } else {
            BlockStatus::DataError
        };

        Ok(DecodedBlock {
            pcm: interleave_clamped(&left, &right),
            status,
            text_message,
        })
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }
}

/// Splits off the trailing 4 bytes of `data` as text-message bits,
/// returning the remaining bytes for audio parsing and the extracted
/// bytes (or `None` if the buffer is too short to hold them).
fn extract_text_message(data: &[u8]) -> (&[u8], Option<TextMessageBits>) {
    if data.len() < 4 {
        return (data, None);
    }
    let split = data.len() - 4;
    let mut text = [0u8; 4];
    text.copy_from_slice(&data[split..]);
    (&data[..split], Some(text))
}

/// Converts two equal-length real-valued channels to clamped 16-bit
/// signed interleaved stereo PCM.
fn interleave_clamped(left: &[f64], right: &[f64]) -> Vec<i16> {
    let n = left.len().min(right.len());
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        out.push(clamp_i16(left[i]));
        out.push(clamp_i16(right[i]));
    }
    out
}

fn clamp_i16(sample: f64) -> i16 {
    sample.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}
