/// Maximum change in applied gain per sample, shared by `GainSmoother`
/// and any direct consumer of `GainState`. Bounding this guarantees a
/// single call can never produce an audible "zipper click".
pub const MAX_GAIN_CHANGE_PER_SAMPLE: f64 = 0.5;

/// Current/target gain pair. `current_gain` is always clamped so that it
/// moves toward `target_gain` by at most `MAX_GAIN_CHANGE_PER_SAMPLE`
/// per call to `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainState {
    pub current_gain: f64,
    pub target_gain: f64,
}

impl GainState {
    pub fn new(initial_gain: f64) -> Self {
        debug_assert!(initial_gain > 0.0);
        GainState {
            current_gain: initial_gain,
            target_gain: initial_gain,
        }
    }

    /// Moves `current_gain` at most `MAX_GAIN_CHANGE_PER_SAMPLE` toward
    /// `target_gain`, scaled by `rate` (the remaining fraction of the
    /// gap to close this step, in `[0, 1]`).
    pub fn step(&mut self, rate: f64) {
        let delta = (self.target_gain - self.current_gain).clamp(
            -MAX_GAIN_CHANGE_PER_SAMPLE,
            MAX_GAIN_CHANGE_PER_SAMPLE,
        );
        self.current_gain += delta * rate;
        debug_assert!(self.current_gain > 0.0);
    }
}

impl Default for GainState {
    fn default() -> Self {
        GainState::new(1.0)
    }
}
