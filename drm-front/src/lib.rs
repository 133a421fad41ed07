mod complex;
mod filters;

use std::collections::VecDeque;

use log::trace;

pub use complex::Complex64;

/// Virtual intermediate frequency the zero-IF channel-select modes
/// rotate the complex baseband to before Hilbert filtering, in Hz.
pub const VIRTUAL_INTERMED_FREQ: f64 = 6_000.0;
/// History length of the Hilbert (quadrature) filter.
pub const NUM_TAPS_IQ_INPUT_FILT: usize = 23;
/// Tap count of the 2x-upsample interpolation filter, rounded to a
/// multiple of 4 for even polyphase splitting.
pub const NUM_TAPS_UPSAMPLE_FILT: usize = 32;
/// Size of the sliding window feeding the PSD / spectrum-analyser tap.
pub const INPUT_DATA_VECTOR_SIZE: usize = 2048;

/// Channel-selection mode applied to the incoming stereo (or I/Q) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSelectMode {
    Left,
    Right,
    Mix,
    Sub,
    IqPos,
    IqNeg,
    IqPosZero,
    IqNegZero,
    IqPosSplit,
    IqNegSplit,
}

impl ChannelSelectMode {
    fn is_iq(self) -> bool {
        !matches!(self, ChannelSelectMode::Left | ChannelSelectMode::Right | ChannelSelectMode::Mix | ChannelSelectMode::Sub)
    }

    fn is_positive_sideband(self) -> bool {
        matches!(
            self,
            ChannelSelectMode::IqPos
                | ChannelSelectMode::IqPosZero
                | ChannelSelectMode::IqPosSplit
        )
    }
}

/// Stereo PCM ingest front-end: channel selection, optional zero-IF
/// rotation + Hilbert filtering for the I/Q modes, optional 2x
/// polyphase upsampling, a signal-level meter, and a PSD input window.
pub struct ReceiveFront {
    mode: ChannelSelectMode,
    sample_rate: f64,
    phase: Complex64,
    lo_step: Complex64,
    samples_since_renorm: u32,
    hilbert_history: VecDeque<f64>,
    hilbert_taps: Vec<f64>,
    upsample_enabled: bool,
    upsample_taps: Vec<f64>,
    upsample_history: VecDeque<f64>,
    level_peak: f64,
    psd_window: VecDeque<f64>,
}

impl ReceiveFront {
    pub fn new(mode: ChannelSelectMode, sample_rate: f64, upsample_enabled: bool) -> Self {
        let lo_angle = 2.0 * std::f64::consts::PI * VIRTUAL_INTERMED_FREQ / sample_rate;
        ReceiveFront {
            mode,
            sample_rate,
            phase: Complex64::new(1.0, 0.0),
            lo_step: Complex64::from_polar(1.0, lo_angle),
            samples_since_renorm: 0,
            hilbert_history: VecDeque::from(vec![0.0; NUM_TAPS_IQ_INPUT_FILT]),
            hilbert_taps: filters::hilbert_taps(NUM_TAPS_IQ_INPUT_FILT),
            upsample_enabled,
            upsample_taps: filters::kaiser_lowpass(NUM_TAPS_UPSAMPLE_FILT, 0.25, 6.0),
            upsample_history: VecDeque::from(vec![0.0; NUM_TAPS_UPSAMPLE_FILT / 2]),
            level_peak: 0.0,
            psd_window: VecDeque::from(vec![0.0; INPUT_DATA_VECTOR_SIZE]),
        }
    }

    pub fn set_mode(&mut self, mode: ChannelSelectMode) {
        self.mode = mode;
    }

    /// Processes one input stereo (or I/Q) sample pair, returns the
    /// selected (and possibly upsampled) real output samples.
    pub fn process_sample(&mut self, left: f64, right: f64) -> Vec<f64> {
        let selected = if self.mode.is_iq() {
            self.process_iq(left, right)
        } else {
            self.process_simple(left, right)
        };

        self.update_level_meter(selected);
        self.push_psd_window(selected);

        if self.upsample_enabled {
            self.upsample(selected)
        } else {
            vec![selected]
        }
    }

    fn process_simple(&self, left: f64, right: f64) -> f64 {
        match self.mode {
            ChannelSelectMode::Left => left,
            ChannelSelectMode::Right => right,
            ChannelSelectMode::Mix => (left + right) * 0.5,
            ChannelSelectMode::Sub => left - right,
            _ => unreachable!("non-IQ mode"),
        }
    }

    fn process_iq(&mut self, i: f64, q: f64) -> f64 {
        self.phase = self.phase * self.lo_step;
        self.samples_since_renorm += 1;
        if self.samples_since_renorm >= 4096 {
            self.phase = self.phase.renormalized();
            self.samples_since_renorm = 0;
        }

        let shifted = Complex64::new(i, q) * self.phase;

        self.hilbert_history.pop_front();
        self.hilbert_history.push_back(shifted.im);
        let quadrature: f64 = self
            .hilbert_taps
            .iter()
            .zip(self.hilbert_history.iter())
            .map(|(tap, sample)| tap * sample)
            .sum();

        if self.mode.is_positive_sideband() {
            shifted.re + quadrature
        } else {
            shifted.re - quadrature
        }
    }

    fn update_level_meter(&mut self, sample: f64) {
        // Peak-hold with slow exponential decay, as a cheap VU-style meter.
        let abs = sample.abs();
        if abs > self.level_peak {
            self.level_peak = abs;
        } else {
            self.level_peak *= 0.999;
        }
    }

    pub fn level_peak(&self) -> f64 {
        self.level_peak
    }

    fn push_psd_window(&mut self, sample: f64) {
        self.psd_window.pop_front();
        self.psd_window.push_back(sample);
    }

    /// Current contents of the PSD / spectrum-analyser input window,
    /// oldest sample first.
    pub fn psd_window(&self) -> Vec<f64> {
        self.psd_window.iter().copied().collect()
    }

    fn upsample(&mut self, sample: f64) -> Vec<f64> {
        let half = NUM_TAPS_UPSAMPLE_FILT / 2;
        self.upsample_history.pop_front();
        self.upsample_history.push_back(sample);

        // Polyphase split: even-indexed taps produce the on-sample
        // output, odd-indexed taps produce the interpolated half-sample.
        let mut even_sum = 0.0;
        let mut odd_sum = 0.0;
        for (k, hist) in self.upsample_history.iter().enumerate() {
            let tap_index = k * 2;
            if tap_index < self.upsample_taps.len() {
                even_sum += self.upsample_taps[tap_index] * hist;
            }
            let tap_index_odd = tap_index + 1;
            if tap_index_odd < self.upsample_taps.len() {
                odd_sum += self.upsample_taps[tap_index_odd] * hist;
            }
        }
        trace!("upsample history len {}", half);
        vec![even_sum, odd_sum]
    }
}
