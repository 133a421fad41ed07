use log::debug;
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};

use crate::error::DspError;

/// Rational-ratio resampler from the codec's native rate to the output
/// rate, one instance per channel. `None` means input and output rates
/// already match, so `process` is a pass-through.
pub struct Resampler {
    input_rate: u32,
    output_rate: u32,
    frame_size: usize,
    inner: Option<FastFixedIn<f64>>,
    output_buffer: Vec<f64>,
}

impl Resampler {
    pub fn new(input_rate: u32, output_rate: u32, frame_size: usize) -> Result<Self, DspError> {
        let inner = Self::build_inner(input_rate, output_rate, frame_size)?;
        Ok(Resampler {
            input_rate,
            output_rate,
            frame_size,
            output_buffer: vec![0.0; Self::max_output_len(input_rate, output_rate, frame_size)],
            inner,
        })
    }

    fn build_inner(
        input_rate: u32,
        output_rate: u32,
        frame_size: usize,
    ) -> Result<Option<FastFixedIn<f64>>, DspError> {
        if input_rate == output_rate {
            return Ok(None);
        }
        let ratio = output_rate as f64 / input_rate as f64;
        let sampler = FastFixedIn::new(ratio, 2.0, PolynomialDegree::Linear, frame_size, 1)?;
        Ok(Some(sampler))
    }

    fn max_output_len(input_rate: u32, output_rate: u32, frame_size: usize) -> usize {
        ((frame_size as f64 * output_rate as f64 / input_rate as f64).ceil() as usize) + 16
    }

    /// Re-initializes the resampler for a new per-call frame size.
    /// xHE-AAC frame sizes vary call to call; AAC's stays fixed so this
    /// is a no-op once built the first time.
    pub fn reinit_for_frame_size(&mut self, frame_size: usize) -> Result<(), DspError> {
        if frame_size == self.frame_size {
            return Ok(());
        }
        debug!(
            "resampler frame size changed {} -> {}, rebuilding",
            self.frame_size, frame_size
        );
        self.frame_size = frame_size;
        self.inner = Self::build_inner(self.input_rate, self.output_rate, frame_size)?;
        self.output_buffer = vec![0.0; Self::max_output_len(self.input_rate, self.output_rate, frame_size)];
        Ok(())
    }

    /// Resamples one channel's block. Pass-through (a cheap copy) when
    /// input and output rates are equal.
    pub fn process(&mut self, input: &[f64]) -> Result<Vec<f64>, DspError> {
        let Some(sampler) = &mut self.inner else {
            return Ok(input.to_vec());
        };
        let (_, size) =
            sampler.process_into_buffer(&[input], &mut [&mut self.output_buffer], None)?;
        Ok(self.output_buffer[..size].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_when_rates_match() {
        let mut r = Resampler::new(48_000, 48_000, 1024).unwrap();
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(r.process(&input).unwrap(), input);
    }

    #[test]
    fn upsamples_to_a_longer_block() {
        let mut r = Resampler::new(24_000, 48_000, 960).unwrap();
        let input = vec![0.0f64; 960];
        let out = r.process(&input).unwrap();
        assert!(out.len() > input.len());
    }

    #[test]
    fn reinit_rebuilds_for_new_frame_size() {
        let mut r = Resampler::new(24_000, 48_000, 960).unwrap();
        r.reinit_for_frame_size(480).unwrap();
        let out = r.process(&vec![0.0f64; 480]).unwrap();
        assert!(!out.is_empty());
    }
}
