//! Block-streaming pitch shifter: SOLA stretch, resample, splice.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::align::boundary_offset;
use super::continuity::ContinuityStore;
use super::params::{
    data_capacity, sanitize_ratio, synthesis_capacity, Hops, GRAIN_LEN, MAX_BLOCK_LIMIT,
    MAX_OVERLAP_LEN,
};
use super::sola::synthesize;
use crate::core::resample::{resample_linear_into, stretched_span};
use crate::error::{FxError, Result};

/// Maximum block length used when none is configured.
pub const DEFAULT_MAX_BLOCK_LEN: usize = 4096;

/// Construction parameters for a [`PitchShifter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchShiftConfig {
    /// Sample rate in Hz. Fixed for the lifetime of the engine.
    pub sample_rate: u32,
    /// Longest block `process` will accept.
    #[serde(default = "default_max_block_len")]
    pub max_block_len: usize,
    /// Initial pitch ratio.
    #[serde(default = "default_ratio")]
    pub ratio: f32,
}

fn default_max_block_len() -> usize {
    DEFAULT_MAX_BLOCK_LEN
}

fn default_ratio() -> f32 {
    1.0
}

impl PitchShiftConfig {
    /// Configuration at `sample_rate` with the default block limit and an
    /// identity ratio.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            max_block_len: DEFAULT_MAX_BLOCK_LEN,
            ratio: 1.0,
        }
    }

    /// Set the longest block the engine will be asked to process.
    pub fn with_max_block_len(mut self, max_block_len: usize) -> Self {
        self.max_block_len = max_block_len;
        self
    }

    /// Set the initial pitch ratio.
    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// `InvalidSampleRate` for a zero rate, `InvalidMaxBlockLen` when the
    /// block limit is zero or above [`MAX_BLOCK_LIMIT`].
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(FxError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_len == 0 || self.max_block_len > MAX_BLOCK_LIMIT {
            return Err(FxError::InvalidMaxBlockLen {
                requested: self.max_block_len,
                limit: MAX_BLOCK_LIMIT,
            });
        }
        Ok(())
    }
}

impl Default for PitchShiftConfig {
    fn default() -> Self {
        Self::new(48000)
    }
}

/// Streaming pitch shifter.
///
/// Each call time-scales the previous block plus the current one by the
/// pitch ratio with SOLA, plays the result back at the ratio to restore
/// the duration, then splices it onto the output tail carried from the
/// previous call and emits one block. Output therefore trails input by one
/// block. Blocks shorter than
/// [`MIN_HISTORY_LEN`](super::params::MIN_HISTORY_LEN) are spliced against
/// that much history instead, which then sets the latency. The first call
/// primes the history and emits silence.
///
/// All working memory is sized from the maximum block length at
/// construction; [`process`](Self::process) never allocates.
///
/// # Example
/// ```
/// use dafx::{PitchShiftConfig, PitchShifter};
///
/// let config = PitchShiftConfig::new(48000).with_max_block_len(1024).with_ratio(1.5);
/// let mut shifter = PitchShifter::new(config).unwrap();
///
/// let input = vec![0.0f32; 1024];
/// let mut output = vec![0.0f32; 1024];
/// shifter.process(&input, &mut output).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PitchShifter {
    max_block_len: usize,
    ratio: f32,
    continuity: ContinuityStore,
    /// History followed by the current block, zero-padded by a grain.
    input: Vec<f32>,
    /// SOLA synthesis result.
    stretched: Vec<f32>,
    /// Resampled signal plus room for the spliced tail.
    resampled: Vec<f32>,
    last_offset: usize,
}

impl PitchShifter {
    /// Creates an engine, allocating every buffer it will use.
    ///
    /// # Errors
    /// See [`PitchShiftConfig::validate`].
    pub fn new(config: PitchShiftConfig) -> Result<Self> {
        config.validate()?;

        let max_block_len = config.max_block_len;
        let data_cap = data_capacity(max_block_len);
        let ratio = sanitize_ratio(config.ratio);
        if ratio != config.ratio {
            warn!(requested = config.ratio, ratio, "pitch ratio adjusted");
        }

        debug!(
            sample_rate = config.sample_rate,
            max_block_len,
            ratio,
            "pitch shifter created"
        );

        Ok(Self {
            max_block_len,
            ratio,
            continuity: ContinuityStore::new(max_block_len),
            input: vec![0.0; data_cap + GRAIN_LEN],
            stretched: vec![0.0; synthesis_capacity(data_cap)],
            resampled: vec![0.0; data_cap + GRAIN_LEN + MAX_OVERLAP_LEN],
            last_offset: 0,
        })
    }

    /// Sets the pitch ratio used from the next call on.
    ///
    /// Non-finite and non-positive values fall back to 1.0; others are
    /// clamped into the supported range. Either adjustment is logged.
    pub fn set_ratio(&mut self, ratio: f32) {
        let sanitized = sanitize_ratio(ratio);
        if sanitized != ratio {
            warn!(requested = ratio, ratio = sanitized, "pitch ratio adjusted");
        }
        self.ratio = sanitized;
    }

    /// Current (sanitized) pitch ratio.
    #[inline]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    #[inline]
    pub fn max_block_len(&self) -> usize {
        self.max_block_len
    }

    /// State carried between calls.
    #[inline]
    pub fn continuity(&self) -> &ContinuityStore {
        &self.continuity
    }

    /// Offset at which the last call spliced the carried tail.
    #[inline]
    pub fn last_splice_offset(&self) -> usize {
        self.last_offset
    }

    /// Returns to the freshly constructed state. The ratio is kept.
    pub fn reset(&mut self) {
        self.continuity.reset();
        self.input.fill(0.0);
        self.stretched.fill(0.0);
        self.resampled.fill(0.0);
        self.last_offset = 0;
        debug!("pitch shifter reset");
    }

    /// Processes one block.
    ///
    /// `input` and `output` must have the same length, at most the
    /// configured maximum. An empty block is a no-op.
    ///
    /// # Errors
    /// `BlockLengthMismatch` or `BlockTooLong`. `output` is silenced and
    /// the engine state is left as it was.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        if input.len() != output.len() {
            output.fill(0.0);
            return Err(FxError::BlockLengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        let n = input.len();
        if n > self.max_block_len {
            output.fill(0.0);
            return Err(FxError::BlockTooLong {
                len: n,
                max: self.max_block_len,
            });
        }
        if n == 0 {
            return Ok(());
        }

        let hops = Hops::for_ratio(self.ratio);

        if self.continuity.is_first_call() {
            self.continuity.prime(input, hops.overlap);
            output.fill(0.0);
            return Ok(());
        }

        // History followed by the current block, zero past the data.
        let history = self.continuity.history();
        let history_len = history.len();
        let data_len = history_len + n;
        self.input[..history_len].copy_from_slice(history);
        self.input[history_len..data_len].copy_from_slice(input);
        self.input[data_len..].fill(0.0);

        synthesize(&self.input, data_len, hops, &mut self.stretched);

        let span = stretched_span(data_len, hops.ratio);
        resample_linear_into(&self.stretched, span, &mut self.resampled[..data_len]);
        self.resampled[data_len..].fill(0.0);

        // Keep the emitted block, the new tail and one synthesis hop inside
        // the resampled data. The history is at least MIN_HISTORY_LEN long,
        // so this leaves several hundred candidate shifts.
        let overlap = hops.overlap;
        let max_shifts = history_len - overlap - hops.synthesis + 1;
        let prev_tail = self.continuity.previous_tail();
        let offset = boundary_offset(
            prev_tail,
            &self.resampled[..GRAIN_LEN - overlap],
            max_shifts,
        );
        blend_tail(
            &mut self.resampled[offset..offset + prev_tail.len()],
            prev_tail,
        );

        output.copy_from_slice(&self.resampled[offset..offset + n]);

        let tail_start = offset + n;
        self.continuity.store(
            input,
            &self.resampled[tail_start..tail_start + overlap],
            overlap,
        );
        self.last_offset = offset;
        Ok(())
    }
}

/// Crossfades `tail` into the start of `dst`: the tail fades out as `dst`
/// fades in, weight `i / (len - 1)` on `dst`. A single-sample tail keeps
/// `dst` as is.
fn blend_tail(dst: &mut [f32], tail: &[f32]) {
    let len = tail.len();
    for (i, (d, &t)) in dst.iter_mut().zip(tail).enumerate() {
        let w = if len > 1 {
            i as f32 / (len - 1) as f32
        } else {
            1.0
        };
        *d = t * (1.0 - w) + *d * w;
    }
}
