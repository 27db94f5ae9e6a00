//! Band-pass wah built on a second-order all-pass.

use std::f32::consts::PI;

use super::{check_block, unknown_param, Effect};
use crate::core::types::{param_index, ParamInfo, ParamRange};
use crate::error::Result;

const CENTER: usize = 0;
const BANDWIDTH: usize = 1;
const MIX: usize = 2;

const PARAMS: &[ParamInfo] = &[
    ParamInfo::new("center_hz", ParamRange::new(100.0, 8000.0, 1000.0)),
    ParamInfo::new("bandwidth_hz", ParamRange::new(20.0, 2000.0, 200.0)),
    ParamInfo::new("mix", ParamRange::new(0.0, 1.0, 1.0)),
];

/// Frequencies are kept below this fraction of the sample rate so the
/// tangent stays finite.
const MAX_NORMALIZED_FREQ: f32 = 0.45;

/// Wah filter.
///
/// The all-pass
/// `A(z) = (-c + d(1-c)z^-1 + z^-2) / (1 + d(1-c)z^-1 - c z^-2)`
/// with `d = -cos(2π fc/fs)` and `c = (tan(π fb/fs) - 1) / (tan(π fb/fs) + 1)`
/// turns into a band-pass around `fc` as `0.5 (1 - A(z))`.
#[derive(Debug, Clone)]
pub struct Wah {
    sample_rate: f32,
    values: [f32; 3],
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Wah {
    pub fn new(sample_rate: u32) -> Self {
        let mut values = [0.0; 3];
        for (v, info) in values.iter_mut().zip(PARAMS) {
            *v = info.range.default;
        }
        Self {
            sample_rate: sample_rate as f32,
            values,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// All-pass coefficients `(c, d)` for the current settings.
    fn coefficients(&self) -> (f32, f32) {
        let limit = MAX_NORMALIZED_FREQ * self.sample_rate;
        let fc = self.values[CENTER].min(limit);
        let fb = self.values[BANDWIDTH].min(limit);

        let d = -(2.0 * PI * fc / self.sample_rate).cos();
        let t = (PI * fb / self.sample_rate).tan();
        let c = (t - 1.0) / (t + 1.0);
        (c, d)
    }
}

impl Effect for Wah {
    fn name(&self) -> &'static str {
        "wah"
    }

    fn params(&self) -> &'static [ParamInfo] {
        PARAMS
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        let idx = param_index(PARAMS, name).ok_or_else(|| unknown_param(self.name(), name))?;
        self.values[idx] = PARAMS[idx].range.clamp(value);
        Ok(())
    }

    fn param(&self, name: &str) -> Option<f32> {
        param_index(PARAMS, name).map(|idx| self.values[idx])
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        check_block(input, output)?;
        let (c, d) = self.coefficients();
        let dc = d * (1.0 - c);
        let mix = self.values[MIX];

        for (out, &x) in output.iter_mut().zip(input) {
            let ap = -c * x + dc * self.x1 + self.x2 - dc * self.y1 + c * self.y2;
            self.x2 = self.x1;
            self.x1 = x;
            self.y2 = self.y1;
            self.y1 = ap;

            let bp = 0.5 * (x - ap);
            *out = (1.0 - mix) * x + mix * bp;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
