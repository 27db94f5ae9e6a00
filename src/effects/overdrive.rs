//! Piecewise soft-clipping overdrives.

use super::{check_block, unknown_param, Effect};
use crate::core::types::{param_index, ParamInfo, ParamRange};
use crate::error::Result;

const OVERDRIVE_PARAMS: &[ParamInfo] = &[ParamInfo::new(
    "drive",
    ParamRange::new(0.0, 0.99, 0.5),
)];

const OVERDRIVE2_PARAMS: &[ParamInfo] = &[
    ParamInfo::new("drive", ParamRange::new(0.01, 0.99, 0.5)),
    ParamInfo::new("knee", ParamRange::new(0.0, 1.0, 0.5)),
];

/// Symmetric soft clipper with threshold `th = 1 - drive`.
///
/// Linear below `th`, quadratic up to `2·th`, hard limited at ±1 above.
/// The pieces join without jumps.
#[derive(Debug, Clone)]
pub struct Overdrive {
    drive: f32,
}

impl Overdrive {
    pub fn new() -> Self {
        Self {
            drive: OVERDRIVE_PARAMS[0].range.default,
        }
    }
}

impl Default for Overdrive {
    fn default() -> Self {
        Self::new()
    }
}

/// Curve shared by both overdrives: `a·x` below `th`, `±(e + d|x| + c x²)`
/// up to `top`, `±1` beyond.
#[derive(Debug, Clone, Copy)]
struct SoftClip {
    th: f32,
    top: f32,
    a: f32,
    c: f32,
    d: f32,
    e: f32,
}

impl SoftClip {
    #[inline]
    fn apply(&self, x: f32) -> f32 {
        let ax = x.abs();
        if ax > self.top {
            x.signum()
        } else if ax < self.th {
            self.a * x
        } else {
            x.signum() * (self.e + self.d * ax + self.c * ax * ax)
        }
    }

    fn run(&self, input: &[f32], output: &mut [f32]) {
        for (out, &x) in output.iter_mut().zip(input) {
            *out = self.apply(x);
        }
    }
}

impl Overdrive {
    fn curve(&self) -> SoftClip {
        let th = 1.0 - self.drive;
        let k = (2.0 + th) * th;
        SoftClip {
            th,
            top: 2.0 * th,
            a: 2.0 / k,
            c: -1.0 / k,
            d: 4.0 / (2.0 + th),
            e: (2.0 - 3.0 * th) / (2.0 + th),
        }
    }
}

impl Effect for Overdrive {
    fn name(&self) -> &'static str {
        "overdrive"
    }

    fn params(&self) -> &'static [ParamInfo] {
        OVERDRIVE_PARAMS
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        let idx = param_index(OVERDRIVE_PARAMS, name)
            .ok_or_else(|| unknown_param(self.name(), name))?;
        self.drive = OVERDRIVE_PARAMS[idx].range.clamp(value);
        Ok(())
    }

    fn param(&self, name: &str) -> Option<f32> {
        param_index(OVERDRIVE_PARAMS, name).map(|_| self.drive)
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        check_block(input, output)?;
        self.curve().run(input, output);
        Ok(())
    }

    fn reset(&mut self) {}
}

/// Soft clipper with an adjustable knee.
///
/// `knee` moves the saturation point `th2` between `th` (hard corner at 1)
/// and 1 (widest quadratic knee).
#[derive(Debug, Clone)]
pub struct Overdrive2 {
    drive: f32,
    knee: f32,
}

impl Overdrive2 {
    pub fn new() -> Self {
        Self {
            drive: OVERDRIVE2_PARAMS[0].range.default,
            knee: OVERDRIVE2_PARAMS[1].range.default,
        }
    }

    fn curve(&self) -> SoftClip {
        // Computed in f64: the denominator cancels badly as th2 nears 1.
        let th = 1.0 - self.drive as f64;
        let th2 = th + (1.0 - self.knee as f64) * (1.0 - th);
        let th_sq = th * th;
        let e = th_sq / (th_sq - 2.0 * th2 + th2 * th2);
        let d = -2.0 * e / th_sq;
        let c = e / th_sq;
        let a = d + 2.0 * th * c;
        SoftClip {
            th: th as f32,
            top: th2 as f32,
            a: a as f32,
            c: c as f32,
            d: d as f32,
            e: e as f32,
        }
    }
}

impl Default for Overdrive2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Overdrive2 {
    fn name(&self) -> &'static str {
        "overdrive2"
    }

    fn params(&self) -> &'static [ParamInfo] {
        OVERDRIVE2_PARAMS
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        let idx = param_index(OVERDRIVE2_PARAMS, name)
            .ok_or_else(|| unknown_param(self.name(), name))?;
        let value = OVERDRIVE2_PARAMS[idx].range.clamp(value);
        match idx {
            0 => self.drive = value,
            _ => self.knee = value,
        }
        Ok(())
    }

    fn param(&self, name: &str) -> Option<f32> {
        match param_index(OVERDRIVE2_PARAMS, name)? {
            0 => Some(self.drive),
            _ => Some(self.knee),
        }
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        check_block(input, output)?;
        self.curve().run(input, output);
        Ok(())
    }

    fn reset(&mut self) {}
}
