//! Exponential fuzz distortion.

use super::{check_block, peak, unknown_param, Effect};
use crate::core::types::{param_index, ParamInfo, ParamRange};
use crate::error::Result;

const PARAMS: &[ParamInfo] = &[
    ParamInfo::new("gain", ParamRange::new(1.0, 20.0, 5.0)),
    ParamInfo::new("mix", ParamRange::new(0.0, 1.0, 1.0)),
];

/// Fuzz with an exponential transfer curve.
///
/// The block is normalized to its peak and driven by `gain` into
/// `sign(q) * (1 - e^-|q|)`, then mixed with the dry signal. Both the
/// distorted signal and the mix are rescaled so the output peak equals the
/// input peak. Because the normalization uses the whole block, the amount
/// of distortion does not depend on the input level.
#[derive(Debug, Clone)]
pub struct Fuzz {
    gain: f32,
    mix: f32,
}

impl Fuzz {
    pub fn new() -> Self {
        Self {
            gain: PARAMS[0].range.default,
            mix: PARAMS[1].range.default,
        }
    }
}

impl Default for Fuzz {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Fuzz {
    fn name(&self) -> &'static str {
        "fuzz"
    }

    fn params(&self) -> &'static [ParamInfo] {
        PARAMS
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        let idx = param_index(PARAMS, name).ok_or_else(|| unknown_param(self.name(), name))?;
        let value = PARAMS[idx].range.clamp(value);
        match idx {
            0 => self.gain = value,
            _ => self.mix = value,
        }
        Ok(())
    }

    fn param(&self, name: &str) -> Option<f32> {
        match param_index(PARAMS, name)? {
            0 => Some(self.gain),
            _ => Some(self.mix),
        }
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        check_block(input, output)?;

        let max_x = peak(input);
        if max_x == 0.0 {
            output.fill(0.0);
            return Ok(());
        }

        for (out, &x) in output.iter_mut().zip(input) {
            let q = x * self.gain / max_x;
            *out = q.signum() * -(-q.abs()).exp_m1();
        }

        let max_z = peak(output);
        if max_z == 0.0 {
            output.fill(0.0);
            return Ok(());
        }
        for (out, &x) in output.iter_mut().zip(input) {
            *out = self.mix * *out * max_x / max_z + (1.0 - self.mix) * x;
        }

        let max_y = peak(output);
        if max_y == 0.0 {
            output.fill(0.0);
            return Ok(());
        }
        let scale = max_x / max_y;
        output.iter_mut().for_each(|s| *s *= scale);
        Ok(())
    }

    fn reset(&mut self) {}
}
