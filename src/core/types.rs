/// Valid range and default of a control parameter.
///
/// Values set by a host are clamped into `[min, max]`; non-finite values fall
/// back to the default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Default value.
    pub default: f32,
}

impl ParamRange {
    /// Create a new parameter range.
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Clamp a host-provided value into the range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

/// Static description of one control port of an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamInfo {
    /// Port name, as used by settings files and the CLI.
    pub name: &'static str,
    /// Valid range and default.
    pub range: ParamRange,
}

impl ParamInfo {
    pub const fn new(name: &'static str, range: ParamRange) -> Self {
        Self { name, range }
    }
}

/// Finds the index of the parameter called `name`.
pub fn param_index(params: &[ParamInfo], name: &str) -> Option<usize> {
    params.iter().position(|p| p.name == name)
}
