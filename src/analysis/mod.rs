pub mod frequency;

pub use frequency::{dominant_frequency, rms};
