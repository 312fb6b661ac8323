//! Control curves: knob scaling, the mix bell and small float helpers.

/// Map a normalized knob `[0, 1]` onto `[lo, hi]` with a quadratic taper.
///
/// Spends more of the knob travel at the low end, which is where rate and
/// cutoff changes are most audible.
///
/// ```
/// use petal_chorus::dsp::curve::quadratic_scale;
/// assert_eq!(quadratic_scale(0.1, 10.0, 0.0), 0.1);
/// assert!((quadratic_scale(0.1, 10.0, 1.0) - 10.0).abs() < 1e-5);
/// assert!((quadratic_scale(0.0, 100.0, 0.5) - 25.0).abs() < 1e-6);
/// ```
#[inline]
pub fn quadratic_scale(lo: f32, hi: f32, knob: f32) -> f32 {
    lo + (hi - lo) * knob * knob
}

/// Map a normalized knob `[0, 1]` onto `[lo, hi]` linearly.
#[inline]
pub fn linear_scale(lo: f32, hi: f32, knob: f32) -> f32 {
    lo + (hi - lo) * knob
}

/// Gaussian bell over the mix control, centred on 0.5.
///
/// `exp(-(mix - 0.5)² / 0.02)`: 1.0 at an even blend, under 1e-5 at either end.
#[inline]
pub fn mix_bell(mix: f32) -> f32 {
    let offset = mix - 0.5;
    (-(offset * offset) / 0.02).exp()
}

/// True when `a` and `b` differ by less than `epsilon`.
#[inline]
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Convert decibels to a linear gain factor.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}
