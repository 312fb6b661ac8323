//! Low-level DSP primitives the pedal is assembled from.
//!
//! Everything here is allocation-free once constructed and safe to run
//! inside the audio callback. The only heap allocations are the delay
//! buffers, made once in their constructors.

/// Stereo chorus built from two multi-tap delays.
pub mod chorus;
/// Knob tapers and small float helpers.
pub mod curve;
/// Fractional circular delay buffer.
pub mod delay;
/// Sinusoidal soft clipping.
pub mod distortion;
/// Biquad and one-pole IIR filters.
pub mod filter;
/// Wet/dry mixing curves.
pub mod mix;
/// Multi-tap modulated delay with feedback.
pub mod multitap;
/// Phase-accumulating LFO.
pub mod oscillator;
/// Linear parameter ramps with hysteresis.
pub mod smooth;

pub use chorus::{Chorus, DelayRange};
pub use filter::{BiquadFilter, BiquadType, OnePoleFilter, OnePoleType};
pub use mix::{MixCurve, Mixer};
pub use smooth::SmoothValue;
