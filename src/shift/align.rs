//! Integer-offset alignment search by sum of absolute differences.
//!
//! Both searches slide window `a` across window `b` and score each shift by
//! summing `|a[k] - b[shift + k]|`. Samples outside `b` are read as zero.
//! Neither search allocates.

/// Finds the shift in `[-a.len(), b.len())` that best aligns `a` against `b`.
///
/// Used to place each grain inside the growing synthesis buffer. Every term
/// whose absolute difference is exactly zero scores `-1` rather than `0`,
/// so exact (phase-locked) matches beat shifts that merely line up low
/// energy. The chosen shift can differ from a plain SAD search.
///
/// Ties keep the first (most negative) shift. Returns 0 for an empty `a`.
pub fn interior_offset(a: &[f32], b: &[f32]) -> isize {
    let la = a.len() as isize;
    let lb = b.len() as isize;
    if la == 0 {
        return 0;
    }

    let mut best_shift = -la;
    let mut best_cost = f32::INFINITY;

    for shift in -la..lb {
        let mut cost = 0.0f32;
        for (k, &av) in a.iter().enumerate() {
            let term = (av - sample_at(b, shift + k as isize)).abs();
            cost += if term == 0.0 { -1.0 } else { term };
        }
        if cost < best_cost {
            best_cost = cost;
            best_shift = shift;
        }
    }

    best_shift
}

/// Finds the shift in `[0, min(b.len(), max_shifts))` that best aligns `a`
/// against `b`.
///
/// Plain SAD without the exact-match bonus. Used once per block to splice
/// the carried output tail onto the new resampled signal. `max_shifts` only
/// cuts the candidate shifts short; reads still see all of `b`. Ties keep
/// the smallest shift; returns 0 when either window is empty.
pub fn boundary_offset(a: &[f32], b: &[f32], max_shifts: usize) -> usize {
    let shifts = max_shifts.min(b.len());
    if a.is_empty() || shifts == 0 {
        return 0;
    }

    let mut best_shift = 0usize;
    let mut best_cost = f32::INFINITY;

    for shift in 0..shifts {
        let mut cost = 0.0f32;
        for (k, &av) in a.iter().enumerate() {
            cost += (av - b.get(shift + k).copied().unwrap_or(0.0)).abs();
        }
        if cost < best_cost {
            best_cost = cost;
            best_shift = shift;
        }
    }

    best_shift
}

#[inline]
fn sample_at(b: &[f32], idx: isize) -> f32 {
    if idx < 0 {
        return 0.0;
    }
    b.get(idx as usize).copied().unwrap_or(0.0)
}
