//! Streaming SOLA pitch shifting.
//!
//! A call time-scales the previous block plus the current one with
//! synchronized overlap-add ([`sola`]), resamples the result back to its
//! original duration ([`crate::core::resample`]) and splices it onto the
//! output tail carried from the previous call ([`engine`]).

pub mod align;
pub mod continuity;
pub mod engine;
pub mod params;
pub mod sola;

pub use continuity::ContinuityStore;
pub use engine::{PitchShiftConfig, PitchShifter, DEFAULT_MAX_BLOCK_LEN};
pub use params::{Hops, RATIO_MAX, RATIO_MIN};
