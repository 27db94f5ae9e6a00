use rustfft::{num_complex::Complex, FftPlanner};

use crate::core::window::hann_window;

/// Estimate the strongest frequency in a signal.
///
/// Takes the first `fft_size` samples (zero-padded if the signal is
/// shorter), applies a Hann window and returns the frequency of the largest
/// magnitude bin above DC, refined by parabolic interpolation over the
/// neighbouring log magnitudes. Returns `None` for an empty or silent input.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32, fft_size: usize) -> Option<f32> {
    if samples.is_empty() || fft_size < 4 || sample_rate == 0 {
        return None;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);

    let window = hann_window(fft_size);
    let mut buffer: Vec<Complex<f32>> = window
        .iter()
        .enumerate()
        .map(|(i, &w)| Complex::new(samples.get(i).copied().unwrap_or(0.0) * w, 0.0))
        .collect();

    fft.process(&mut buffer);

    let half = fft_size / 2;
    let mags: Vec<f32> = buffer[..=half].iter().map(|c| c.norm()).collect();

    let (peak_bin, &peak_mag) = mags
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|a, b| a.1.total_cmp(b.1))?;
    if peak_mag <= 0.0 {
        return None;
    }

    // Parabolic refinement on log magnitudes.
    let mut bin = peak_bin as f32;
    if peak_bin < half {
        let l = mags[peak_bin - 1].max(1e-12).ln();
        let c = peak_mag.ln();
        let r = mags[peak_bin + 1].max(1e-12).ln();
        let denom = l - 2.0 * c + r;
        if denom.abs() > f32::EPSILON {
            bin += 0.5 * (l - r) / denom;
        }
    }

    Some(bin * sample_rate as f32 / fft_size as f32)
}

/// Root mean square level of a signal; 0 for an empty slice.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sr: u32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f32 / sr as f32).sin())
            .collect()
    }

    #[test]
    fn test_dominant_frequency_of_sine() {
        for freq in [220.0f32, 440.0, 660.0, 3000.0] {
            let signal = sine(freq, 48000, 16384);
            let est = dominant_frequency(&signal, 48000, 16384).unwrap();
            assert!((est - freq).abs() < 2.0, "{} Hz estimated as {}", freq, est);
        }
    }

    #[test]
    fn test_dominant_frequency_picks_louder_tone() {
        let a = sine(300.0, 44100, 8192);
        let b = sine(1200.0, 44100, 8192);
        let mix: Vec<f32> = a.iter().zip(&b).map(|(x, y)| 0.3 * x + y).collect();
        let est = dominant_frequency(&mix, 44100, 8192).unwrap();
        assert!((est - 1200.0).abs() < 5.0, "estimated {}", est);
    }

    #[test]
    fn test_dominant_frequency_silence() {
        assert_eq!(dominant_frequency(&[0.0; 1024], 48000, 1024), None);
        assert_eq!(dominant_frequency(&[], 48000, 1024), None);
    }

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[1.0, -1.0, 1.0, -1.0]) - 1.0).abs() < 1e-6);
        let s = sine(440.0, 48000, 48000);
        assert!((rms(&s) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3);
    }
}
