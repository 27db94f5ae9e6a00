use crate::core::types::ParamRange;

/// Analysis hop `Sa`: spacing of grain extraction points in the input.
pub const ANALYSIS_HOP: usize = 128;
/// Grain length `N`, a fixed multiple of the analysis hop.
pub const GRAIN_LEN: usize = 4 * ANALYSIS_HOP;

/// Lowest supported pitch ratio (two octaves down).
pub const RATIO_MIN: f32 = 0.25;
/// Highest supported pitch ratio (one octave up).
///
/// Above 2.0 the synthesis hop exceeds half a grain and successive grains
/// stop overlapping.
pub const RATIO_MAX: f32 = 2.0;
/// Range of the pitch ratio control.
pub const RATIO_RANGE: ParamRange = ParamRange::new(RATIO_MIN, RATIO_MAX, 1.0);

/// Overlap length at [`RATIO_MAX`]; sizes the carried output tail.
pub const MAX_OVERLAP_LEN: usize = ANALYSIS_HOP * RATIO_MAX as usize / 2;

/// Least history a call works on, whatever the block length.
///
/// Long enough for a full grain plus the widest carried tail, so short
/// blocks still give the splice search room and cut their tail from
/// synthesized data.
pub const MIN_HISTORY_LEN: usize = GRAIN_LEN + MAX_OVERLAP_LEN;

/// Largest maximum block length an engine can be configured for.
pub const MAX_BLOCK_LIMIT: usize = 8192;

/// Per-call quantities derived from the pitch ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hops {
    /// The pitch ratio these hops were derived from.
    pub ratio: f32,
    /// Synthesis hop `Ss = round(Sa * ratio)`.
    pub synthesis: usize,
    /// Overlap length `L = round(Sa * ratio / 2)`.
    pub overlap: usize,
}

impl Hops {
    /// Derive the hops for a pitch ratio. The ratio is sanitized first.
    pub fn for_ratio(ratio: f32) -> Self {
        let ratio = sanitize_ratio(ratio);
        Self {
            ratio,
            synthesis: synthesis_hop(ratio),
            overlap: overlap_len(ratio),
        }
    }
}

/// Maps a raw control value onto a usable pitch ratio.
///
/// Non-finite and non-positive values degrade to identity (1.0); anything
/// else is clamped into [`RATIO_MIN`]..=[`RATIO_MAX`].
#[inline]
pub fn sanitize_ratio(ratio: f32) -> f32 {
    if !ratio.is_finite() || ratio <= 0.0 {
        return 1.0;
    }
    ratio.clamp(RATIO_MIN, RATIO_MAX)
}

/// `round(Sa * ratio)`
#[inline]
pub fn synthesis_hop(ratio: f32) -> usize {
    (ANALYSIS_HOP as f64 * ratio as f64).round() as usize
}

/// `round(Sa * ratio / 2)`
#[inline]
pub fn overlap_len(ratio: f32) -> usize {
    (ANALYSIS_HOP as f64 * ratio as f64 / 2.0).round() as usize
}

/// Number of analysis frames `M = ceil(len / Sa)`.
#[inline]
pub fn frame_count(len: usize) -> usize {
    len.div_ceil(ANALYSIS_HOP)
}

/// Samples of history the continuity store keeps for blocks of up to
/// `max_block_len` samples.
#[inline]
pub fn history_capacity(max_block_len: usize) -> usize {
    max_block_len.max(MIN_HISTORY_LEN)
}

/// Samples of history plus current block the engine must hold.
#[inline]
pub fn data_capacity(max_block_len: usize) -> usize {
    history_capacity(max_block_len) + max_block_len
}

/// Capacity of the synthesis arena for `data_cap` samples of input.
///
/// Covers the longest synthesis result (`(M-1)·Ss + L + N`) at
/// [`RATIO_MAX`], the initial copy of the input, and one guard sample for
/// the resampler.
pub fn synthesis_capacity(data_cap: usize) -> usize {
    let stretched = (data_cap as f64 * RATIO_MAX as f64).ceil() as usize;
    stretched.max(data_cap) + frame_count(data_cap) + MAX_OVERLAP_LEN + GRAIN_LEN + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hops_at_identity() {
        let hops = Hops::for_ratio(1.0);
        assert_eq!(hops.synthesis, 128);
        assert_eq!(hops.overlap, 64);
    }

    #[test]
    fn test_hops_fifth_up() {
        let hops = Hops::for_ratio(1.5);
        assert_eq!(hops.synthesis, 192);
        assert_eq!(hops.overlap, 96);
    }

    #[test]
    fn test_max_overlap_matches_ratio_max() {
        assert_eq!(MAX_OVERLAP_LEN, overlap_len(RATIO_MAX));
        assert_eq!(MAX_OVERLAP_LEN, 128);
    }

    #[test]
    fn test_sanitize_ratio() {
        assert_eq!(sanitize_ratio(f32::NAN), 1.0);
        assert_eq!(sanitize_ratio(0.0), 1.0);
        assert_eq!(sanitize_ratio(-2.0), 1.0);
        assert_eq!(sanitize_ratio(8.0), RATIO_MAX);
        assert_eq!(sanitize_ratio(0.01), RATIO_MIN);
        assert_eq!(sanitize_ratio(1.25), 1.25);
    }

    #[test]
    fn test_frame_count_rounds_up() {
        assert_eq!(frame_count(0), 0);
        assert_eq!(frame_count(1), 1);
        assert_eq!(frame_count(128), 1);
        assert_eq!(frame_count(129), 2);
        assert_eq!(frame_count(2048), 16);
    }

    #[test]
    fn test_history_never_shorter_than_minimum() {
        assert_eq!(history_capacity(32), MIN_HISTORY_LEN);
        assert_eq!(history_capacity(4096), 4096);
        assert_eq!(data_capacity(32), MIN_HISTORY_LEN + 32);
        // Room for the emitted block, the widest tail and one synthesis hop.
        assert!(MIN_HISTORY_LEN >= MAX_OVERLAP_LEN + synthesis_hop(RATIO_MAX));
    }

    #[test]
    fn test_synthesis_capacity_covers_stretch() {
        let data_cap = data_capacity(1024);
        let cap = synthesis_capacity(data_cap);
        assert!(cap > (data_cap as f64 * RATIO_MAX as f64) as usize + GRAIN_LEN);
    }
}
