//! Wet/dry blending.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::FRAC_PI_2;

/*
Wet/Dry Mixing
==============

  dry   the unprocessed input
  wet   the effect output
  mix   0.0 = all dry, 1.0 = all wet


Linear
------

    out = dry·(1 - mix) + wet·mix

Weights sum to 1.0, so two identical signals never boost. Two UNCORRELATED
signals dip in loudness around mix = 0.5 though, because power adds and
amplitude does not.

    Level
      1.0 ──────╲      ╱──────
                 ╲    ╱
      0.5         ╲  ╱  ← loudness dip
                   ╲╱
          0.0     0.5     1.0


Equal-power
-----------

    out = dry·cos(mix·π/2) + wet·sin(mix·π/2)

Squared weights sum to 1.0, so perceived loudness holds steady across the
blend. At mix = 0.5 both sides sit at √0.5 ≈ 0.707.


Sqrt
----

    out = dry·√(1 - mix) + wet·√mix

Also equal-power (squared weights sum to 1.0) with a slightly different
taper: it leaves the dry side faster near mix = 0. Chorus wet signals are
strongly correlated with the dry signal, so this curve tends to sound
closest to "more effect" as the knob turns.

The curve is chosen explicitly; nothing here guesses it from the signal.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixCurve {
    #[default]
    Linear,
    EqualPower,
    Sqrt,
}

#[derive(Debug, Clone, Copy)]
pub struct Mixer {
    mix: f32,
    curve: MixCurve,
    dry_gain: f32,
    wet_gain: f32,
}

impl Mixer {
    pub fn new(curve: MixCurve) -> Self {
        let mut mixer = Self {
            mix: 0.5,
            curve,
            dry_gain: 0.0,
            wet_gain: 0.0,
        };
        mixer.update_gains();
        mixer
    }

    /// Blend one dry and one wet sample.
    #[inline]
    pub fn process(&self, dry: f32, wet: f32) -> f32 {
        dry * self.dry_gain + wet * self.wet_gain
    }

    /// Blend `wet` into `dry` in place.
    pub fn process_block(&self, dry: &mut [f32], wet: &[f32]) {
        debug_assert_eq!(dry.len(), wet.len());

        for (d, &w) in dry.iter_mut().zip(wet.iter()) {
            *d = self.process(*d, w);
        }
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
        self.update_gains();
    }

    pub fn set_curve(&mut self, curve: MixCurve) {
        self.curve = curve;
        self.update_gains();
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn curve(&self) -> MixCurve {
        self.curve
    }

    fn update_gains(&mut self) {
        let (dry, wet) = match self.curve {
            MixCurve::Linear => (1.0 - self.mix, self.mix),
            MixCurve::EqualPower => {
                let angle = self.mix * FRAC_PI_2;
                (angle.cos(), angle.sin())
            }
            MixCurve::Sqrt => ((1.0 - self.mix).sqrt(), self.mix.sqrt()),
        };
        self.dry_gain = dry;
        self.wet_gain = wet;
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(MixCurve::default())
    }
}
