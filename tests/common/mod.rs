#![allow(dead_code)]

use std::f32::consts::PI;

use dafx::Effect;

pub fn gen_sine<F>(freq_hz: f32, sr: u32, n: usize, amp_fn: F) -> Vec<f32>
where
    F: Fn(usize) -> f32,
{
    (0..n)
        .map(|i| {
            let phase = 2.0 * PI * freq_hz * i as f32 / sr as f32;
            amp_fn(i) * phase.sin()
        })
        .collect()
}

pub fn gen_two_tone(
    freq_a: f32,
    amp_a: f32,
    freq_b: f32,
    amp_b: f32,
    sr: u32,
    n: usize,
) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            amp_a * (2.0 * PI * freq_a * t).sin() + amp_b * (2.0 * PI * freq_b * t).sin()
        })
        .collect()
}

/// RMS of `signal[start..start + len]`, clipped to the signal.
pub fn windowed_rms(signal: &[f32], start: usize, len: usize) -> f64 {
    let end = start.saturating_add(len).min(signal.len());
    let window = match signal.get(start..end) {
        Some(w) if !w.is_empty() => w,
        _ => return 0.0,
    };
    let sum_sq: f64 = window.iter().map(|&s| s as f64 * s as f64).sum();
    (sum_sq / window.len() as f64).sqrt()
}

/// Upward zero crossings in `signal[start..end]`.
pub fn count_positive_zero_crossings(signal: &[f32], start: usize, end: usize) -> usize {
    let end = end.min(signal.len());
    signal
        .get(start..end)
        .unwrap_or(&[])
        .windows(2)
        .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
        .count()
}

/// Frequency estimate from upward zero crossings per second.
pub fn estimate_freq_zero_crossings(signal: &[f32], sr: u32, start: usize, end: usize) -> f64 {
    let end = end.min(signal.len());
    if end <= start + 1 {
        return 0.0;
    }
    let secs = (end - start) as f64 / sr as f64;
    count_positive_zero_crossings(signal, start, end) as f64 / secs
}

/// Largest sample-to-sample step in `signal[start..]`.
pub fn max_step(signal: &[f32], start: usize) -> f32 {
    signal
        .get(start..)
        .unwrap_or(&[])
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0, f32::max)
}

/// Feeds `signal` through `effect` in blocks cycling through `schedule`,
/// failing the test on any processing error. Returns the output and the
/// start offset of every block.
pub fn process_in_blocks(
    effect: &mut dyn Effect,
    signal: &[f32],
    schedule: &[usize],
) -> (Vec<f32>, Vec<usize>) {
    let mut output = vec![0.0f32; signal.len()];
    let mut starts = Vec::new();
    let mut pos = 0;
    for &len in schedule.iter().cycle() {
        if pos >= signal.len() {
            break;
        }
        let end = (pos + len).min(signal.len());
        effect
            .process(&signal[pos..end], &mut output[pos..end])
            .expect("block processing should succeed");
        starts.push(pos);
        pos = end;
    }
    (output, starts)
}
