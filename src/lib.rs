#![forbid(unsafe_code)]
//! Block-based real-time audio effects with a streaming SOLA pitch shifter.
//!
//! `dafx` implements a small family of mono effects behind one
//! block-processing [`Effect`] trait: fuzz, tube, wah, two overdrives and a
//! pitch shifter. The pitch shifter is the core: every call time-scales the
//! previous and current block with synchronized overlap-add (SOLA), plays the
//! result back at the pitch ratio so the duration is restored, and splices it
//! onto the output carried from the previous call. Block lengths may change
//! from call to call, and processing never allocates.
//!
//! # Quick Start
//!
//! ```
//! use dafx::{PitchShiftConfig, PitchShifter};
//!
//! let sample_rate = 48000;
//! let input: Vec<f32> = (0..sample_rate as usize)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate as f32).sin())
//!     .collect();
//!
//! let config = PitchShiftConfig::new(sample_rate)
//!     .with_max_block_len(1024)
//!     .with_ratio(1.5);
//! let mut shifter = PitchShifter::new(config).unwrap();
//!
//! let mut output = vec![0.0f32; input.len()];
//! for (inp, out) in input.chunks(1024).zip(output.chunks_mut(1024)) {
//!     shifter.process(inp, out).unwrap();
//! }
//! assert_eq!(output.len(), input.len()); // same duration, a fifth higher
//! ```
//!
//! # Any effect by name
//!
//! ```
//! use dafx::{EffectKind, host};
//!
//! let mut wah = EffectKind::Wah.build(44100, 512).unwrap();
//! wah.set_param("center_hz", 700.0).unwrap();
//!
//! let signal = vec![0.1f32; 2000];
//! let rendered = host::render(wah.as_mut(), &signal, &[512, 300]).unwrap();
//! assert_eq!(rendered.len(), signal.len());
//! ```

pub mod analysis;
pub mod config;
pub mod core;
pub mod effects;
pub mod error;
pub mod host;
pub mod io;
pub mod shift;

pub use config::EffectSettings;
pub use crate::core::types::{ParamInfo, ParamRange};
pub use effects::{Effect, EffectKind, Fuzz, Overdrive, Overdrive2, Tube, Wah};
pub use error::{FxError, Result};
pub use shift::{ContinuityStore, PitchShiftConfig, PitchShifter};
