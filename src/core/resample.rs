//! Linear-interpolation playback-rate conversion.

/// Resamples `input` into `output` by reading it at a fixed rate.
///
/// Output sample `i` is taken at fractional position `i * span / output.len()`
/// of `input`, interpolating linearly between the two neighbouring samples.
/// Playing a time-stretched signal back this way restores the original
/// duration and moves the pitch by the stretch factor.
///
/// The read one sample past the integer position requires
/// `input.len() > span`; positions that would read past the end of `input`
/// read zero instead. Does not allocate.
pub fn resample_linear_into(input: &[f32], span: usize, output: &mut [f32]) {
    let out_len = output.len();
    if out_len == 0 {
        return;
    }
    let step = span as f64 / out_len as f64;
    let at = |idx: usize| input.get(idx).copied().unwrap_or(0.0);

    for (i, out) in output.iter_mut().enumerate() {
        let pos = i as f64 * step;
        let idx = pos.floor() as usize;
        let frac = (pos - idx as f64) as f32;
        *out = at(idx) * (1.0 - frac) + at(idx + 1) * frac;
    }
}

/// Number of stretched samples that cover `len` output samples at `ratio`.
///
/// This is `floor(len * ratio)`, the span passed to [`resample_linear_into`].
#[inline]
pub fn stretched_span(len: usize, ratio: f32) -> usize {
    (len as f64 * ratio as f64).floor().max(0.0) as usize
}
