//! Output Saturation
//!
//! The last stage of the pedal. Feedback, stereo widening and shelf boosts
//! can all push the sum past full scale, and a hard clamp at that point
//! folds harsh aliasing products into the audio band. A soft clip bends the
//! peaks over gradually instead.
//!
//! # Sinusoidal soft clip
//!
//! Below the threshold `t` the signal passes untouched. Above it, the
//! excess `e = |x| - t` is pushed through a quarter sine:
//!
//! ```text
//! h   = 1 - t                          headroom above the knee
//! out = t + h · (2/π) · sin(π/2 · min(e/h, 1))
//! ```
//!
//! The slope is exactly 1 at the knee (no kink where clipping starts) and 0
//! when the excess reaches `h`, after which the output holds at the ceiling
//! `t + 2h/π`. Sign is preserved.
//!
//! ```text
//!   out
//!    │            ceiling ─────────
//!    │          ╭─╯
//!  t │────────╱                       (slope 1 below t)
//!    │      ╱
//!    │    ╱
//!    └──────────────────────── |x|
//! ```

use std::f32::consts::{FRAC_2_PI, FRAC_PI_2};

const MIN_THRESHOLD: f32 = 0.05;

/// Sinusoidal soft clip of a single sample at `threshold`.
///
/// ```
/// use petal_chorus::dsp::distortion::sinusoidal;
/// assert_eq!(sinusoidal(0.3, 0.8), 0.3);
/// assert!(sinusoidal(5.0, 0.8) < 1.0);
/// ```
#[inline]
pub fn sinusoidal(sample: f32, threshold: f32) -> f32 {
    let magnitude = sample.abs();
    if magnitude <= threshold {
        return sample;
    }

    let headroom = 1.0 - threshold;
    if headroom <= 0.0 {
        return sample.clamp(-threshold, threshold);
    }

    let excess = ((magnitude - threshold) / headroom).min(1.0);
    let shaped = threshold + headroom * FRAC_2_PI * (excess * FRAC_PI_2).sin();
    shaped.copysign(sample)
}

/// Soft clipper with a fixed threshold.
#[derive(Debug, Clone, Copy)]
pub struct SoftClip {
    threshold: f32,
}

impl SoftClip {
    /// `threshold` is clamped to `[0.05, 1.0]`. At 1.0 the stage is a plain
    /// clamp to ±1.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(MIN_THRESHOLD, 1.0),
        }
    }

    #[inline]
    pub fn process(&self, sample: f32) -> f32 {
        sinusoidal(sample, self.threshold)
    }

    pub fn process_block(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Largest magnitude the clipper can output.
    pub fn ceiling(&self) -> f32 {
        self.threshold + (1.0 - self.threshold) * FRAC_2_PI
    }
}
