//! Error types for the dafx crate.

use thiserror::Error;

/// Errors reported by effect construction, block processing and file I/O.
///
/// Processing errors never leave an output block half-written when routed
/// through [`crate::host::run_block`]: the runner silences the block instead.
#[derive(Error, Debug)]
pub enum FxError {
    /// Sample rate must be positive.
    #[error("invalid sample rate: {0}. Must be greater than 0")]
    InvalidSampleRate(u32),

    /// The requested maximum block length does not fit the working arena.
    #[error("invalid maximum block length: {requested} (supported: 1..={limit})")]
    InvalidMaxBlockLen { requested: usize, limit: usize },

    /// A block longer than the engine was sized for.
    #[error("block of {len} samples exceeds the configured maximum of {max}")]
    BlockTooLong { len: usize, max: usize },

    /// Input and output buffers passed to `process` differ in length.
    #[error("block length mismatch: input has {input} samples, output has {output}")]
    BlockLengthMismatch { input: usize, output: usize },

    /// No effect is registered under this name.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// The effect has no parameter with this name.
    #[error("effect '{effect}' has no parameter '{param}'")]
    UnknownParam { effect: String, param: String },

    /// A block schedule contained a zero length or was empty.
    #[error("invalid block schedule: {0}")]
    InvalidBlockSchedule(String),

    /// WAV decoding or encoding failed.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A settings file could not be parsed.
    #[error("invalid settings: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FxError>;
