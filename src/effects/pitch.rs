//! The streaming pitch shifter as a host-driven [`Effect`].

use super::{unknown_param, Effect};
use crate::core::types::{param_index, ParamInfo};
use crate::error::Result;
use crate::shift::params::RATIO_RANGE;
use crate::shift::PitchShifter;

const PARAMS: &[ParamInfo] = &[ParamInfo::new("ratio", RATIO_RANGE)];

impl Effect for PitchShifter {
    fn name(&self) -> &'static str {
        "pitch"
    }

    fn params(&self) -> &'static [ParamInfo] {
        PARAMS
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        let idx = param_index(PARAMS, name).ok_or_else(|| unknown_param("pitch", name))?;
        self.set_ratio(PARAMS[idx].range.clamp(value));
        Ok(())
    }

    fn param(&self, name: &str) -> Option<f32> {
        param_index(PARAMS, name).map(|_| self.ratio())
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        PitchShifter::process(self, input, output)
    }

    fn reset(&mut self) {
        PitchShifter::reset(self)
    }
}
