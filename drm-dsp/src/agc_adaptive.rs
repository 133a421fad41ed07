use std::collections::VecDeque;

use crate::agc_fixed::{DES_AV_AMPL_AM_SIGNAL, LOWER_BOUND_AMP_LEVEL};
use crate::gain_smoother::{GainSmoother, SmoothingMode};

/// Adaptive AGC: picks attack/decay time constants and a `GainSmoother`
/// mode per block from the signal's short-term statistics, rather than
/// a fixed operator-selected mode.
pub struct AgcAdaptive {
    sample_rate: f64,
    r_av_ampl_est: f64,
    smoother: GainSmoother,
    rms_history: VecDeque<f64>,
    history_capacity: usize,
}

const HISTORY_WINDOW_SECS: f64 = 0.5;

impl AgcAdaptive {
    pub fn new(sample_rate: f64) -> Self {
        AgcAdaptive {
            sample_rate,
            r_av_ampl_est: LOWER_BOUND_AMP_LEVEL,
            smoother: GainSmoother::new(SmoothingMode::Slow),
            rms_history: VecDeque::new(),
            history_capacity: 1,
        }
    }

    fn time_constants_for_cv(cv: f64) -> (f64, f64) {
        if cv > 0.3 {
            (0.005, 0.2)
        } else if cv > 0.1 {
            (0.015, 2.0)
        } else {
            (0.025, 4.0)
        }
    }

    fn smoothing_mode_for(crest: f64, cv: f64) -> SmoothingMode {
        if crest > 3.0 || cv > 0.3 {
            SmoothingMode::Fast
        } else if crest > 2.0 || cv > 0.1 {
            SmoothingMode::Medium
        } else {
            SmoothingMode::Slow
        }
    }

    fn one_pole_coefficient(&self, tau_s: f64) -> f64 {
        1.0 - (-1.0 / (self.sample_rate * tau_s)).exp()
    }

    fn resize_history(&mut self, block_len: usize) {
        let capacity = ((HISTORY_WINDOW_SECS * self.sample_rate) / block_len as f64)
            .ceil()
            .max(1.0) as usize;
        if capacity != self.history_capacity {
            self.history_capacity = capacity;
            while self.rms_history.len() > capacity {
                self.rms_history.pop_front();
            }
        }
    }

    pub fn process_block(&mut self, block: &mut [f64]) {
        if block.is_empty() {
            return;
        }
        self.resize_history(block.len());

        let sum_sq: f64 = block.iter().map(|x| x * x).sum();
        let rms = (sum_sq / block.len() as f64).sqrt();
        let peak = block.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));

        self.rms_history.push_back(rms);
        while self.rms_history.len() > self.history_capacity {
            self.rms_history.pop_front();
        }

        let n = self.rms_history.len() as f64;
        let mean: f64 = self.rms_history.iter().sum::<f64>() / n;
        let variance: f64 = self
            .rms_history
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;
        let cv = if mean > 0.0 {
            variance.sqrt() / mean
        } else {
            0.0
        };
        let crest = if rms > 0.0 { peak / rms } else { 0.0 };

        let (attack_tau, decay_tau) = Self::time_constants_for_cv(cv);
        self.smoother.set_mode(Self::smoothing_mode_for(crest, cv));

        for x in block.iter_mut() {
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_fast_mode_for_high_crest_factor() {
        assert_eq!(AgcAdaptive::smoothing_mode_for(5.0, 0.0), SmoothingMode::Fast);
        assert_eq!(AgcAdaptive::smoothing_mode_for(0.0, 0.35), SmoothingMode::Fast);
    }

    #[test]
    fn selects_slow_mode_for_steady_low_crest_signal() {
        assert_eq!(AgcAdaptive::smoothing_mode_for(1.2, 0.02), SmoothingMode::Slow);
    }

    #[test]
    fn processes_block_without_panicking_and_bounds_estimate() {
        let mut agc = AgcAdaptive::new(48_000.0);
        let mut block: Vec<f64> = (0..960).map(|i| (i as f64 * 0.1).sin() * 12000.0).collect();
        agc.process_block(&mut block);
        assert!(agc.r_av_ampl_est >= LOWER_BOUND_AMP_LEVEL);
    }
}
