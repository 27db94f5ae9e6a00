//! Block effects and the trait a host drives them through.
//!
//! Every effect processes one mono block per call into a caller-provided
//! output of the same length, exposes its controls as named parameters with
//! static ranges, and never allocates while processing.

pub mod fuzz;
pub mod overdrive;
pub mod pitch;
pub mod tube;
pub mod wah;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::ParamInfo;
use crate::error::{FxError, Result};
use crate::shift::{PitchShiftConfig, PitchShifter};

pub use fuzz::Fuzz;
pub use overdrive::{Overdrive, Overdrive2};
pub use tube::Tube;
pub use wah::Wah;

/// Audio effect processor.
///
/// Effects must be `Send` so they can be moved to an audio thread.
/// `process` must be real-time safe: no allocation, no blocking, no I/O.
pub trait Effect: Send {
    /// Registry name of the effect.
    fn name(&self) -> &'static str;

    /// Descriptors of every control parameter, in port order.
    fn params(&self) -> &'static [ParamInfo];

    /// Sets a parameter by name. Values are clamped into the parameter's
    /// range; non-finite values select the default.
    ///
    /// # Errors
    /// `UnknownParam` if the effect has no parameter called `name`.
    fn set_param(&mut self, name: &str, value: f32) -> Result<()>;

    /// Current value of a parameter, or `None` for an unknown name.
    fn param(&self, name: &str) -> Option<f32>;

    /// Processes one block. `input` and `output` must have equal lengths.
    fn process(&mut self, input: &[f32], output: &mut [f32]) -> Result<()>;

    /// Clears all signal history, keeping parameter values.
    fn reset(&mut self);
}

/// The effects this crate can build by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Fuzz,
    Tube,
    Wah,
    Overdrive,
    Overdrive2,
    #[serde(rename = "pitch")]
    PitchShift,
}

impl EffectKind {
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Fuzz,
        EffectKind::Tube,
        EffectKind::Wah,
        EffectKind::Overdrive,
        EffectKind::Overdrive2,
        EffectKind::PitchShift,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Fuzz => "fuzz",
            EffectKind::Tube => "tube",
            EffectKind::Wah => "wah",
            EffectKind::Overdrive => "overdrive",
            EffectKind::Overdrive2 => "overdrive2",
            EffectKind::PitchShift => "pitch",
        }
    }

    /// Builds the effect with default parameters.
    ///
    /// `max_block_len` bounds the blocks the effect will be given; only
    /// effects with block-sized state use it.
    ///
    /// # Errors
    /// Construction errors of the effect, e.g. an invalid sample rate.
    pub fn build(self, sample_rate: u32, max_block_len: usize) -> Result<Box<dyn Effect>> {
        if sample_rate == 0 {
            return Err(FxError::InvalidSampleRate(sample_rate));
        }
        Ok(match self {
            EffectKind::Fuzz => Box::new(Fuzz::new()),
            EffectKind::Tube => Box::new(Tube::new()),
            EffectKind::Wah => Box::new(Wah::new(sample_rate)),
            EffectKind::Overdrive => Box::new(Overdrive::new()),
            EffectKind::Overdrive2 => Box::new(Overdrive2::new()),
            EffectKind::PitchShift => Box::new(PitchShifter::new(
                PitchShiftConfig::new(sample_rate).with_max_block_len(max_block_len),
            )?),
        })
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self> {
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FxError::UnknownEffect(s.to_string()))
    }
}

pub(crate) fn check_block(input: &[f32], output: &[f32]) -> Result<()> {
    if input.len() != output.len() {
        return Err(FxError::BlockLengthMismatch {
            input: input.len(),
            output: output.len(),
        });
    }
    Ok(())
}

pub(crate) fn unknown_param(effect: &str, param: &str) -> FxError {
    FxError::UnknownParam {
        effect: effect.to_string(),
        param: param.to_string(),
    }
}

/// Largest absolute sample value.
#[inline]
pub(crate) fn peak(buf: &[f32]) -> f32 {
    buf.iter().fold(0.0f32, |m, &s| m.max(s.abs()))
}
