//! Synchronized overlap-add (SOLA) time-scale modification over a fixed arena.

use super::align::interior_offset;
use super::params::{frame_count, Hops, ANALYSIS_HOP, GRAIN_LEN};

/// Time-scales `input[..data_len]` by `hops.ratio` into `result`.
///
/// `result` starts as a copy of the input. Grains of [`GRAIN_LEN`] samples
/// are taken every [`ANALYSIS_HOP`] samples and spliced in every
/// `hops.synthesis` samples, each nudged by the interior alignment search so
/// its head lines up with what is already there, then crossfaded linearly
/// over the region it overlaps.
///
/// `input` must hold at least `data_len + GRAIN_LEN` samples, zero past
/// `data_len`, and `result` must be sized with
/// [`synthesis_capacity`](super::params::synthesis_capacity). Past the
/// synthesized content `result` holds the untouched input copy, then zeros.
/// Returns the end of the last spliced grain. Does not allocate.
pub fn synthesize(input: &[f32], data_len: usize, hops: Hops, result: &mut [f32]) -> usize {
    debug_assert!(input.len() >= data_len + GRAIN_LEN);
    debug_assert!(result.len() >= data_len);

    let cap = result.len();
    let data_len = data_len.min(cap);
    result[..data_len].copy_from_slice(&input[..data_len]);
    result[data_len..].fill(0.0);

    let overlap = hops.overlap;
    let mut res_len = GRAIN_LEN;

    for i in 1..frame_count(data_len) {
        let start = i * ANALYSIS_HOP;
        let Some(grain) = input.get(start..start + GRAIN_LEN) else {
            break;
        };

        let pos = i * hops.synthesis;
        if pos + overlap > cap {
            break;
        }
        let offset = interior_offset(&grain[..overlap], &result[pos..pos + overlap]);
        let cut = (pos as isize + offset).max(0) as usize;
        if cut + GRAIN_LEN > cap {
            break;
        }

        // When the cut lands past the current end there is nothing to fade.
        let fade_len = res_len.saturating_sub(cut).min(GRAIN_LEN);
        crossfade_in(&mut result[cut..cut + fade_len], &grain[..fade_len]);
        result[cut + fade_len..cut + GRAIN_LEN].copy_from_slice(&grain[fade_len..]);

        res_len = cut + GRAIN_LEN;
    }

    res_len
}

/// Linear crossfade from `dst` to `incoming`, weight `j / len` on the
/// incoming side.
#[inline]
fn crossfade_in(dst: &mut [f32], incoming: &[f32]) {
    let len = dst.len() as f32;
    for (j, (d, &x)) in dst.iter_mut().zip(incoming).enumerate() {
        let w = j as f32 / len;
        *d = *d * (1.0 - w) + x * w;
    }
}
