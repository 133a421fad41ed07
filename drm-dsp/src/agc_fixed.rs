use crate::gain_smoother::{GainSmoother, SmoothingMode};

pub const DES_AV_AMPL_AM_SIGNAL: f64 = 8000.0;
pub const LOWER_BOUND_AMP_LEVEL: f64 = 10.0;
pub const AM_AMPL_CORR_FACTOR: f64 = 5.0;

/// Selectable fixed AGC mode. Each carries its own attack/decay time
/// constants (seconds) for the envelope follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgcMode {
    Slow,
    Medium,
    Fast,
    NoAgc,
}

impl AgcMode {
    fn time_constants(self) -> Option<(f64, f64)> {
        match self {
            AgcMode::Slow => Some((0.025, 4.0)),
            AgcMode::Medium => Some((0.015, 2.0)),
            AgcMode::Fast => Some((0.005, 0.2)),
            AgcMode::NoAgc => None,
        }
    }

    fn smoothing_mode(self) -> SmoothingMode {
        match self {
            AgcMode::Slow => SmoothingMode::Slow,
            AgcMode::Medium => SmoothingMode::Medium,
            AgcMode::Fast | AgcMode::NoAgc => SmoothingMode::Fast,
        }
    }
}

/// Fixed-mode AGC: a two-sided one-pole envelope follower over `|x|`
/// driving a `GainSmoother`-applied target gain.
pub struct AgcFixed {
    mode: AgcMode,
    sample_rate: f64,
    r_av_ampl_est: f64,
    smoother: GainSmoother,
}

impl AgcFixed {
    pub fn new(mode: AgcMode, sample_rate: f64) -> Self {
        AgcFixed {
            mode,
            sample_rate,
            r_av_ampl_est: LOWER_BOUND_AMP_LEVEL,
            smoother: GainSmoother::new(mode.smoothing_mode()),
        }
    }

    pub fn set_mode(&mut self, mode: AgcMode) {
        self.mode = mode;
        self.smoother.set_mode(mode.smoothing_mode());
    }

    fn one_pole_coefficient(&self, tau_s: f64) -> f64 {
        1.0 - (-1.0 / (self.sample_rate * tau_s)).exp()
    }

    /// Applies the AGC to one sample in place.
    pub fn process_sample(&mut self, x: &mut f64) {
        let Some((attack_tau, decay_tau)) = self.mode.time_constants() else {
            *x *= AM_AMPL_CORR_FACTOR;
            return;
        };

        let abs_x = x.abs();
        let coefficient = if abs_x > self.r_av_ampl_est {
            self.one_pole_coefficient(attack_tau)
        } else {
            self.one_pole_coefficient(decay_tau)
        };
        self.r_av_ampl_est += coefficient * (abs_x - self.r_av_ampl_est);
        self.r_av_ampl_est = self.r_av_ampl_est.max(LOWER_BOUND_AMP_LEVEL);

        let target = DES_AV_AMPL_AM_SIGNAL / self.r_av_ampl_est;
        *x *= self.smoother.process(target);
    }

    pub fn process_block(&mut self, block: &mut [f64]) {
        for x in block.iter_mut() {
            self.process_sample(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_agc_applies_fixed_correction_factor() {
        let mut agc = AgcFixed::new(AgcMode::NoAgc, 48_000.0);
        let mut x = 100.0;
        agc.process_sample(&mut x);
        assert_eq!(x, 500.0);
    }

    #[test]
    fn amplitude_estimate_never_drops_below_lower_bound() {
        let mut agc = AgcFixed::new(AgcMode::Fast, 48_000.0);
        let mut block = vec![0.0f64; 4096];
        agc.process_block(&mut block);
        assert!(agc.r_av_ampl_est >= LOWER_BOUND_AMP_LEVEL);
    }

    #[test]
    fn loud_signal_is_attenuated_toward_desired_level() {
        let mut agc = AgcFixed::new(AgcMode::Fast, 48_000.0);
        let mut last = 0.0;
        for _ in 0..20_000 {
            let mut x = 20_000.0;
            agc.process_sample(&mut x);
            last = x;
        }
        assert!(last < 20_000.0);
    }

    /// A step to a louder level should settle noticeably slower under
    /// `Slow` than under `Fast`: after a short, fixed number of samples
    /// `Fast` should have moved closer to its eventual attenuated level.
    #[test]
    fn slow_mode_converges_more_gradually_than_fast_mode_after_a_step() {
        fn settle_after(mode: AgcMode, samples: usize) -> f64 {
            let mut agc = AgcFixed::new(mode, 48_000.0);
            let mut x = 0.0;
            for _ in 0..samples {
                x = 20_000.0;
                agc.process_sample(&mut x);
            }
            x
        }

        let window = 200;
        let fast_after = settle_after(AgcMode::Fast, window);
        let slow_after = settle_after(AgcMode::Slow, window);

        // Both modes attenuate the step, but Slow's longer time constant
        // means it has pulled the sample down less after the same short
        // window of samples.
        assert!(fast_after < 20_000.0);
        assert!(slow_after < 20_000.0);
        assert!(
            slow_after > fast_after,
            "expected slow mode ({slow_after}) to lag fast mode ({fast_after}) after {window} samples"
        );
    }
}
