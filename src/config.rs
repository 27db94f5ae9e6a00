//! JSON settings naming an effect, its parameters and a block schedule.
//!
//! ```json
//! {
//!   "effect": "pitch",
//!   "params": { "ratio": 1.5 },
//!   "block_schedule": [1024, 512, 768]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::effects::{Effect, EffectKind};
use crate::error::Result;
use crate::host::validate_schedule;

/// Block length used when a settings file gives no schedule.
pub const DEFAULT_BLOCK_LEN: usize = 1024;

fn default_schedule() -> Vec<usize> {
    vec![DEFAULT_BLOCK_LEN]
}

/// Which effect to run and how to drive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectSettings {
    pub effect: EffectKind,
    /// Parameter values by name; unset parameters keep their defaults.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
    /// Block lengths the host cycles through.
    #[serde(default = "default_schedule")]
    pub block_schedule: Vec<usize>,
}

impl EffectSettings {
    pub fn new(effect: EffectKind) -> Self {
        Self {
            effect,
            params: BTreeMap::new(),
            block_schedule: default_schedule(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: f32) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    pub fn with_block_schedule(mut self, schedule: Vec<usize>) -> Self {
        self.block_schedule = schedule;
        self
    }

    /// Parses and validates settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        validate_schedule(&self.block_schedule)
    }

    /// Longest block in the schedule.
    pub fn max_block_len(&self) -> usize {
        self.block_schedule
            .iter()
            .copied()
            .max()
            .unwrap_or(DEFAULT_BLOCK_LEN)
    }

    /// Builds the effect sized for the schedule and applies every
    /// parameter.
    ///
    /// # Errors
    /// Construction errors, or `UnknownParam` for a parameter the effect
    /// does not have.
    pub fn build(&self, sample_rate: u32) -> Result<Box<dyn Effect>> {
        self.validate()?;
        let mut effect = self.effect.build(sample_rate, self.max_block_len())?;
        for (name, &value) in &self.params {
            effect.set_param(name, value)?;
        }
        Ok(effect)
    }
}
