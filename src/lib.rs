//! A real-time stereo chorus pedal.
//!
//! The crate is layered leaf-first:
//!
//! - [`dsp`]: delay lines, LFO, filters, smoothing, mixing and the chorus
//!   itself. Allocation-free after construction.
//! - [`pedal`]: [`ChorusPedal`](pedal::ChorusPedal) wires the DSP blocks into
//!   the full signal chain and maps control frames onto it.
//! - [`io`]: control snapshots coming in and LED intensities going out.
//! - [`engine`]: the context object the audio callback owns.
//! - [`config`]: construction-time tuning, binding tables and validation.

pub mod config;
pub mod dsp;
pub mod engine;
pub mod io;
pub mod pedal;

pub use config::{ConfigError, PedalConfig};
pub use engine::PedalEngine;
pub use pedal::ChorusPedal;

/// Largest block the host binary hands to the engine in one callback.
pub const MAX_BLOCK_SIZE: usize = 2048;
