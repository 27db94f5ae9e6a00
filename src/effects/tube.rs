//! Valve-style asymmetric distortion with output filtering.

use super::{check_block, peak, unknown_param, Effect};
use crate::core::types::{param_index, ParamInfo, ParamRange};
use crate::error::Result;

const GAIN: usize = 0;
const Q: usize = 1;
const DIST: usize = 2;
const RH: usize = 3;
const RL: usize = 4;
const MIX: usize = 5;

const PARAMS: &[ParamInfo] = &[
    ParamInfo::new("gain", ParamRange::new(1.0, 20.0, 5.0)),
    ParamInfo::new("q", ParamRange::new(-1.0, 0.0, -0.2)),
    ParamInfo::new("dist", ParamRange::new(0.1, 20.0, 8.0)),
    ParamInfo::new("rh", ParamRange::new(0.0, 0.999, 0.97)),
    ParamInfo::new("rl", ParamRange::new(0.0, 0.999, 0.3)),
    ParamInfo::new("mix", ParamRange::new(0.0, 1.0, 1.0)),
];

/// Tube distortion.
///
/// The peak-normalized block runs through an exponential curve whose work
/// point `q` shifts it off centre, producing even harmonics. The distorted
/// signal is mixed with the dry input and restored to the input peak, then
/// a two-pole high-pass (poles at `rh`) removes the DC the asymmetry
/// introduces and a one-pole low-pass (pole at `rl`) softens the top end.
#[derive(Debug, Clone)]
pub struct Tube {
    values: [f32; 6],
    hp_x1: f32,
    hp_x2: f32,
    hp_y1: f32,
    hp_y2: f32,
    lp_y1: f32,
}

impl Tube {
    pub fn new() -> Self {
        let mut values = [0.0; 6];
        for (v, info) in values.iter_mut().zip(PARAMS) {
            *v = info.range.default;
        }
        Self {
            values,
            hp_x1: 0.0,
            hp_x2: 0.0,
            hp_y1: 0.0,
            hp_y2: 0.0,
            lp_y1: 0.0,
        }
    }
}

impl Default for Tube {
    fn default() -> Self {
        Self::new()
    }
}

/// Transfer curve `z(x)` for work point `q` and distortion `dist`.
///
/// `1 - e^-u` is evaluated as `-expm1(-u)` so points near `q` stay
/// accurate; `x == q` takes the analytic limit.
fn curve(x: f32, q: f32, dist: f32) -> f32 {
    if q == 0.0 {
        if x == 0.0 {
            return 1.0 / dist;
        }
        return x / -(-dist * x).exp_m1();
    }
    let offset = q / -(dist * q).exp_m1();
    if x == q {
        return 1.0 / dist + offset;
    }
    (x - q) / -(-dist * (x - q)).exp_m1() + offset
}

impl Effect for Tube {
    fn name(&self) -> &'static str {
        "tube"
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
        let v = self.values;

        let max_x = peak(input);
        if max_x > 0.0 {
            for (out, &x) in output.iter_mut().zip(input) {
                *out = curve(x * v[GAIN] / max_x, v[Q], v[DIST]);
            }
            let max_z = peak(output);
            if max_z > 0.0 {
                for (out, &x) in output.iter_mut().zip(input) {
                    *out = v[MIX] * *out * max_x / max_z + (1.0 - v[MIX]) * x;
                }
            } else {
                output.fill(0.0);
            }
            let max_y = peak(output);
            if max_y > 0.0 {
                let scale = max_x / max_y;
                output.iter_mut().for_each(|s| *s *= scale);
            } else {
                output.fill(0.0);
            }
        } else {
            output.fill(0.0);
        }

        // The filters run even on silent blocks so their history decays.
        let rh = v[RH];
        let rl = v[RL];
        for s in output.iter_mut() {
            let x = *s;
            let hp = x - 2.0 * self.hp_x1 + self.hp_x2 + 2.0 * rh * self.hp_y1
                - rh * rh * self.hp_y2;
            self.hp_x2 = self.hp_x1;
            self.hp_x1 = x;
            self.hp_y2 = self.hp_y1;
            self.hp_y1 = hp;

            let lp = (1.0 - rl) * hp + rl * self.lp_y1;
            self.lp_y1 = lp;
            *s = lp;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.hp_x1 = 0.0;
        self.hp_x2 = 0.0;
        self.hp_y1 = 0.0;
        self.hp_y2 = 0.0;
        self.lp_y1 = 0.0;
    }
}
