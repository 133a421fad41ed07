/// Single feedback comb filter: `y[n] = x[n] + feedback * y[n - delay]`.
struct CombFilter {
    buffer: Vec<f64>,
    index: usize,
    feedback: f64,
}

impl CombFilter {
    fn new(delay: usize, feedback: f64) -> Self {
        CombFilter {
            buffer: vec![0.0; delay.max(1)],
            index: 0,
            feedback,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let delayed = self.buffer[self.index];
        let output = input + delayed * self.feedback;
        self.buffer[self.index] = output;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

/// Single all-pass filter stage, used after the comb bank to diffuse
/// the tail into something less metallic.
struct AllPassFilter {
    buffer: Vec<f64>,
    index: usize,
    feedback: f64,
}

impl AllPassFilter {
    fn new(delay: usize, feedback: f64) -> Self {
        AllPassFilter {
            buffer: vec![0.0; delay.max(1)],
            index: 0,
            feedback,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let delayed = self.buffer[self.index];
        let output = -input + delayed;
        self.buffer[self.index] = input + delayed * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

/// Small Schroeder-style reverb network: four comb filters in parallel,
/// summed and fed through one all-pass stage. Used only to produce a
/// plausible diffuse tail while concealing a dropout; it is not a
/// general-purpose audio effect.
pub struct ReverbEngine {
    combs: [CombFilter; 4],
    allpass: AllPassFilter,
    enabled: bool,
}

impl ReverbEngine {
    pub fn new(sample_rate: f64, enabled: bool) -> Self {
        let scale = sample_rate / 48_000.0;
        let delay = |ms: f64| ((ms / 1000.0) * sample_rate).round().max(1.0) as usize;
        let _ = scale;
        ReverbEngine {
            combs: [
                CombFilter::new(delay(29.7), 0.77),
                CombFilter::new(delay(37.1), 0.74),
                CombFilter::new(delay(41.1), 0.71),
                CombFilter::new(delay(43.7), 0.68),
            ],
            allpass: AllPassFilter::new(delay(5.0), 0.5),
            enabled,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn process(&mut self, input: f64) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        let comb_sum: f64 = self.combs.iter_mut().map(|c| c.process(input)).sum::<f64>() / 4.0;
        self.allpass.process(comb_sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_engine_is_silent() {
        let mut engine = ReverbEngine::new(48_000.0, false);
        for _ in 0..100 {
            assert_eq!(engine.process(1.0), 0.0);
        }
    }

    #[test]
    fn enabled_engine_produces_bounded_output() {
        let mut engine = ReverbEngine::new(48_000.0, true);
        let mut max_abs = 0.0f64;
        for _ in 0..2000 {
            let y = engine.process(1.0);
            max_abs = max_abs.max(y.abs());
        }
        assert!(max_abs.is_finite());
        assert!(max_abs < 100.0);
    }
}
