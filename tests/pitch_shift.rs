mod common;

use common::{estimate_freq_zero_crossings, gen_sine, max_step, process_in_blocks, windowed_rms};
use dafx::analysis::dominant_frequency;
use dafx::shift::params::{overlap_len, MAX_BLOCK_LIMIT, MIN_HISTORY_LEN};
use dafx::{PitchShiftConfig, PitchShifter};

const SR: u32 = 48_000;

fn shifter(max_block: usize, ratio: f32) -> PitchShifter {
    PitchShifter::new(
        PitchShiftConfig::new(SR)
            .with_max_block_len(max_block)
            .with_ratio(ratio),
    )
    .expect("valid config")
}

#[test]
fn fifth_up_moves_440_to_660_and_keeps_duration() {
    let input = gen_sine(440.0, SR, SR as usize, |_| 0.5);
    let mut ps = shifter(1024, 1.5);
    let (output, _) = process_in_blocks(&mut ps, &input, &[1024]);

    assert_eq!(output.len(), input.len());
    assert!(output[..1024].iter().all(|&s| s == 0.0), "first block must be silent");

    let steady = &output[3 * 1024..];
    let freq = dominant_frequency(steady, SR, 16384).expect("non-silent output");
    assert!((freq - 660.0).abs() < 15.0, "dominant frequency {:.1} Hz", freq);
}

#[test]
fn octave_down_halves_the_pitch() {
    let input = gen_sine(880.0, SR, SR as usize, |_| 0.5);
    let mut ps = shifter(1024, 0.5);
    let (output, _) = process_in_blocks(&mut ps, &input, &[1024]);

    let freq = dominant_frequency(&output[3 * 1024..], SR, 16384).expect("non-silent output");
    assert!((freq - 440.0).abs() < 15.0, "dominant frequency {:.1} Hz", freq);
}

#[test]
fn identity_ratio_reproduces_input_with_fixed_delay() {
    let input = gen_sine(440.0, SR, SR as usize, |_| 1.0);
    let mut ps = shifter(1024, 1.0);
    let (output, _) = process_in_blocks(&mut ps, &input, &[1024]);

    let rms = windowed_rms(&output, 2 * 1024, 40_000);
    assert!((rms - 0.707).abs() < 0.05, "rms {:.3}", rms);
    let freq = estimate_freq_zero_crossings(&output, SR, 2 * 1024, output.len());
    assert!((freq - 440.0).abs() < 5.0, "zero-crossing frequency {:.1} Hz", freq);

    // After the splice point settles the output is the input delayed by
    // one block minus the splice offset.
    let delay = 1024 - ps.last_splice_offset();
    for i in 3 * 1024..output.len() {
        let expected = input[i - delay];
        assert!(
            (output[i] - expected).abs() < 1e-3,
            "sample {}: {} vs {}",
            i,
            output[i],
            expected
        );
    }
}

#[test]
fn varying_block_lengths_stay_continuous_at_identity() {
    let input = gen_sine(440.0, SR, SR as usize, |_| 0.5);
    let schedule = [384, 1024, 512, 700, 1000, 431, 896];
    let mut ps = shifter(1024, 1.0);
    let (output, starts) = process_in_blocks(&mut ps, &input, &schedule);

    let input_step = max_step(&input, 0);
    let step = max_step(&output, starts[2]);
    assert!(
        step <= 1.1 * input_step + 1e-4,
        "largest step {:.4} vs input {:.4}",
        step,
        input_step
    );
}

#[test]
fn varying_block_lengths_stay_continuous_when_shifting() {
    let ratio = 1.5;
    let input = gen_sine(440.0, SR, SR as usize, |_| 0.5);
    let schedule = [1024, 800, 960, 768, 1000, 900];
    let mut ps = shifter(1024, ratio);
    let (output, starts) = process_in_blocks(&mut ps, &input, &schedule);

    let input_step = max_step(&input, 0);
    let step = max_step(&output, starts[2]);
    assert!(
        step <= 1.1 * ratio * input_step + 1e-4,
        "largest step {:.4} vs input {:.4}",
        step,
        input_step
    );

    let freq = dominant_frequency(&output[starts[3]..], SR, 16384).expect("non-silent output");
    assert!((freq - 660.0).abs() < 15.0, "dominant frequency {:.1} Hz", freq);
}

#[test]
fn short_blocks_stay_continuous_and_keep_their_level() {
    let input = gen_sine(440.0, SR, 24_000, |_| 0.5);
    let input_step = max_step(&input, 0);
    let expected_rms = 0.5 / std::f64::consts::SQRT_2;

    let schedules: [&[usize]; 4] = [&[32], &[64], &[128], &[128, 37, 256]];
    for schedule in schedules {
        for ratio in [1.0f32, 1.5, 2.0] {
            let mut ps = shifter(256, ratio);
            let (output, _) = process_in_blocks(&mut ps, &input, schedule);

            // Past the start-up latency the output is a steady tone.
            let settled = 4096;
            let step = max_step(&output, settled);
            assert!(
                step <= 1.25 * ratio * input_step + 1e-4,
                "blocks {:?}, ratio {}: largest step {:.4} vs input {:.4}",
                schedule,
                ratio,
                step,
                input_step
            );

            let rms = windowed_rms(&output, settled, output.len() - settled);
            assert!(
                (rms - expected_rms).abs() < 0.1 * expected_rms,
                "blocks {:?}, ratio {}: rms {:.3}",
                schedule,
                ratio,
                rms
            );

            let freq = dominant_frequency(&output[settled..], SR, 16384).expect("non-silent output");
            assert!(
                (freq - 440.0 * ratio).abs() < 15.0,
                "blocks {:?}, ratio {}: dominant frequency {:.1} Hz",
                schedule,
                ratio,
                freq
            );
        }
    }
}

#[test]
fn short_blocks_at_identity_are_a_pure_delay() {
    let input = gen_sine(440.0, SR, 12_000, |_| 0.8);
    let mut ps = shifter(64, 1.0);
    let (output, _) = process_in_blocks(&mut ps, &input, &[64]);

    let delay = output.iter().position(|&s| s != 0.0).expect("signal comes through");
    assert!(delay <= 2 * MIN_HISTORY_LEN, "delay {}", delay);
    let settled = delay + 2048;
    // Every call works on the minimum history; the output starts at the
    // splice offset into it.
    let lag = MIN_HISTORY_LEN - ps.last_splice_offset();
    for i in settled..output.len() {
        assert!(
            (output[i] - input[i - lag]).abs() < 1e-3,
            "sample {}: {} vs {}",
            i,
            output[i],
            input[i - lag]
        );
    }
}

#[test]
fn max_block_length_back_to_back_at_extreme_ratios() {
    for ratio in [0.25f32, 2.0] {
        let input = gen_sine(1000.0, SR, 4 * 4096, |_| 0.9);
        let mut ps = shifter(4096, ratio);
        let (output, _) = process_in_blocks(&mut ps, &input, &[4096]);
        assert!(output.iter().all(|s| s.is_finite()), "ratio {}", ratio);
        assert!(output[4096..].iter().any(|&s| s != 0.0), "ratio {}", ratio);
    }

    let input = gen_sine(300.0, SR, 3 * MAX_BLOCK_LIMIT, |_| 0.9);
    let mut ps = shifter(MAX_BLOCK_LIMIT, 2.0);
    let (output, _) = process_in_blocks(&mut ps, &input, &[MAX_BLOCK_LIMIT]);
    assert!(output.iter().all(|s| s.is_finite()));
}

#[test]
fn alternating_tiny_and_huge_blocks() {
    let input = gen_sine(523.25, SR, 20_000, |_| 0.7);
    for ratio in [0.25f32, 0.8, 1.0, 1.7, 2.0] {
        let mut ps = shifter(4096, ratio);
        let (output, starts) = process_in_blocks(&mut ps, &input, &[1, 4096, 2, 3, 4096, 17]);
        assert!(output.iter().all(|s| s.is_finite() && s.abs() <= 0.7 + 1e-4), "ratio {}", ratio);

        let step = max_step(&output, starts[4]);
        let input_step = max_step(&input, 0);
        assert!(
            step <= 1.25 * ratio.max(1.0) * input_step + 1e-4,
            "ratio {}: largest step {:.4} vs input {:.4}",
            ratio,
            step,
            input_step
        );
    }
}

#[test]
fn first_call_primes_continuity_and_is_silent() {
    let input = gen_sine(440.0, SR, 512, |_| 0.5);
    let mut ps = shifter(1024, 1.25);
    let mut output = vec![1.0f32; 512];
    ps.process(&input, &mut output).unwrap();

    assert!(output.iter().all(|&s| s == 0.0));
    let store = ps.continuity();
    assert!(!store.is_first_call());
    assert_eq!(store.previous_block(), &input[..]);
    assert_eq!(store.previous_overlap_len(), overlap_len(1.25));
    assert!(store.previous_tail().iter().all(|&s| s == 0.0));
}

#[test]
fn overlap_length_follows_the_latest_ratio() {
    let input = gen_sine(440.0, SR, 4096, |_| 0.5);
    let mut ps = shifter(1024, 1.0);
    let mut output = vec![0.0f32; 1024];

    ps.process(&input[..1024], &mut output).unwrap();
    ps.set_ratio(2.0);
    ps.process(&input[1024..2048], &mut output).unwrap();
    assert_eq!(ps.continuity().previous_overlap_len(), overlap_len(2.0));
    ps.set_ratio(0.25);
    ps.process(&input[2048..3072], &mut output).unwrap();
    assert_eq!(ps.continuity().previous_overlap_len(), overlap_len(0.25));
    assert!(output.iter().all(|s| s.is_finite()));
}

#[test]
fn reset_matches_a_fresh_instance() {
    let a = gen_sine(330.0, SR, 8000, |_| 0.8);
    let b = gen_sine(740.0, SR, 8000, |i| 0.3 + i as f32 / 16000.0);
    let schedule = [1000, 640, 512];

    let mut used = shifter(1024, 1.3);
    process_in_blocks(&mut used, &a, &schedule);
    used.reset();
    let (from_reset, _) = process_in_blocks(&mut used, &b, &schedule);

    let mut fresh = shifter(1024, 1.3);
    let (from_fresh, _) = process_in_blocks(&mut fresh, &b, &schedule);

    assert_eq!(from_reset, from_fresh);
}

#[test]
fn processing_is_deterministic() {
    let input = gen_sine(612.0, SR, 10_000, |i| ((i as f32) * 0.001).sin().abs());
    let mut first = shifter(2048, 0.7);
    let mut second = shifter(2048, 0.7);
    let (a, _) = process_in_blocks(&mut first, &input, &[2048, 999]);
    let (b, _) = process_in_blocks(&mut second, &input, &[2048, 999]);
    assert_eq!(a, b);
}
