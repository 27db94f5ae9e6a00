//! Core types, windowing, and resampling utilities.

pub mod resample;
pub mod types;
pub mod window;

pub use types::*;
