/// Zeroth-order modified Bessel function, series approximation used to
/// build Kaiser window coefficients.
fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let half_x_sq = (x / 2.0) * (x / 2.0);
    for k in 1..=20 {
        term *= half_x_sq / (k as f64 * k as f64);
        sum += term;
    }
    sum
}

fn kaiser_window(num_taps: usize, beta: f64) -> Vec<f64> {
    if num_taps == 1 {
        return vec![1.0];
    }
    let denom = bessel_i0(beta);
    let m = (num_taps - 1) as f64;
    (0..num_taps)
        .map(|n| {
            let x = 2.0 * n as f64 / m - 1.0;
            bessel_i0(beta * (1.0 - x * x).max(0.0).sqrt()) / denom
        })
        .collect()
}

/// Windowed-sinc low-pass filter at normalized cutoff `fc` (fraction of
/// the Nyquist rate), Kaiser-windowed with the given beta. Used for the
/// 2x upsample interpolation filter.
pub fn kaiser_lowpass(num_taps: usize, fc: f64, beta: f64) -> Vec<f64> {
    let window = kaiser_window(num_taps, beta);
    let m = (num_taps - 1) as f64 / 2.0;
    let mut taps: Vec<f64> = (0..num_taps)
        .map(|n| {
            let x = n as f64 - m;
            let sinc = if x.abs() < 1e-9 {
                2.0 * fc
            } else {
                (2.0 * std::f64::consts::PI * fc * x).sin() / (std::f64::consts::PI * x)
            };
            sinc * window[n]
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    if sum.abs() > 1e-12 {
        for t in taps.iter_mut() {
            *t /= sum;
        }
    }
    taps
}

/// Windowed ideal discrete Hilbert transformer: zero on even-offset
/// taps, `2 / (pi * n)` on odd-offset taps around the center, Hamming
/// windowed to control sidelobes.
pub fn hilbert_taps(num_taps: usize) -> Vec<f64> {
    let center = (num_taps - 1) as f64 / 2.0;
    (0..num_taps)
        .map(|k| {
            let n = k as f64 - center;
            if n == 0.0 || n.abs().fract() != 0.0 {
                0.0
            } else if (n as i64) % 2 == 0 {
                0.0
            } else {
                let ideal = 2.0 / (std::f64::consts::PI * n);
                let window = 0.54 - 0.46 * (2.0 * std::f64::consts::PI * k as f64 / (num_taps - 1) as f64).cos();
                ideal * window
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kaiser_lowpass_is_normalized_to_unity_dc_gain() {
        let taps = kaiser_lowpass(32, 0.25, 6.0);
        let sum: f64 = taps.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hilbert_taps_are_antisymmetric_about_center() {
        let taps = hilbert_taps(23);
        let n = taps.len();
        for i in 0..n {
            assert!((taps[i] + taps[n - 1 - i]).abs() < 1e-9);
        }
    }
}
