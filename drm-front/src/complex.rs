use std::ops::Mul;

/// Minimal complex number, just enough for the virtual-IF rotator. Not
/// a general-purpose numeric type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex64 {
    pub re: f64,
    pub im: f64,
}

impl Complex64 {
    pub fn new(re: f64, im: f64) -> Self {
        Complex64 { re, im }
    }

    pub fn from_polar(magnitude: f64, phase: f64) -> Self {
        Complex64::new(magnitude * phase.cos(), magnitude * phase.sin())
    }

    pub fn magnitude(self) -> f64 {
        (self.re * self.re + self.im * self.im).sqrt()
    }

    /// Rescales back onto the unit circle; called periodically on the
    /// running oscillator so floating-point drift doesn't creep in.
    pub fn renormalized(self) -> Self {
        let m = self.magnitude();
        if m > 0.0 {
            Complex64::new(self.re / m, self.im / m)
        } else {
            self
        }
    }
}

impl Mul for Complex64 {
    type Output = Complex64;

    fn mul(self, rhs: Complex64) -> Complex64 {
        Complex64::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}
