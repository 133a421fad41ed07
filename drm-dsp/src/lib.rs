mod agc_adaptive;
mod agc_fixed;
mod error;
mod gain_smoother;
mod resampler;

pub use agc_adaptive::AgcAdaptive;
pub use agc_fixed::{AgcFixed, AgcMode, AM_AMPL_CORR_FACTOR, DES_AV_AMPL_AM_SIGNAL, LOWER_BOUND_AMP_LEVEL};
pub use error::DspError;
pub use gain_smoother::{GainSmoother, SmoothingMode};
pub use resampler::Resampler;
