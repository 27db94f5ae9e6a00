//! Analysis windows.

use std::f64::consts::TAU;

/// Symmetric Hann window of `len` points: zero at both ends, one in the
/// middle. A single point is `[1.0]`.
pub fn hann_window(len: usize) -> Vec<f32> {
    if len < 2 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f64;
    (0..len)
        .map(|i| (0.5 - 0.5 * (TAU * i as f64 / denom).cos()) as f32)
        .collect()
}
