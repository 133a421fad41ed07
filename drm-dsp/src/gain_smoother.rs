use drm_common::GainState;

/// Smoothing mode for `GainSmoother`, shared by both AGC variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingMode {
    Fast,
    Medium,
    Slow,
}

impl SmoothingMode {
    fn alpha(self) -> f64 {
        match self {
            SmoothingMode::Fast => 0.7,
            SmoothingMode::Medium => 0.9,
            SmoothingMode::Slow => 0.95,
        }
    }
}

/// One-pole gain limiter: moves the applied gain toward a per-call
/// target, bounded to `MAX_GAIN_CHANGE_PER_SAMPLE` so a single call can
/// never produce an audible zipper-click.
pub struct GainSmoother {
    state: GainState,
    mode: SmoothingMode,
}

impl GainSmoother {
    pub fn new(mode: SmoothingMode) -> Self {
        GainSmoother {
            state: GainState::default(),
            mode,
        }
    }

    pub fn set_mode(&mut self, mode: SmoothingMode) {
        self.mode = mode;
    }

    /// Moves the current gain toward `target` and returns the applied
    /// value for this sample.
    pub fn process(&mut self, target: f64) -> f64 {
        self.state.target_gain = target;
        self.state.step(1.0 - self.mode.alpha());
        self.state.current_gain
    }
}
