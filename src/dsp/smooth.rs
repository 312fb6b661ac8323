use std::ops::{Add, Div, Sub};

/*
Parameter Smoothing
===================

Control inputs arrive once per block (or slower) and in steps. Feeding a
step straight into a delay time or gain produces a click, so the value is
ramped linearly to its new target over a fixed number of samples.

    set_target(T):   delta   = (T - current) / duration
                     counter = duration

    each sample:     if counter > 0 { current += delta; counter -= 1 }
                     the last step lands on T exactly

Every ramp lasts `duration` samples regardless of how far it travels.

Hysteresis
----------

A new target only re-arms the ramp if it differs from the CURRENT TARGET by
at least epsilon. ADC jitter on a resting knob would otherwise restart a
fresh ramp every block and the audible result is a faint stepping.

Read-then-advance
-----------------

`next_value()` returns the value from BEFORE this tick's step, then steps.
The first sample after a target change is therefore still the old value,
and the ramp shows up one sample later rather than as a jump.

Precondition
------------

`init()` must be called with a positive duration before the first target
change. With a zero duration the delta is a division by zero and the
counter stays at zero, so the value never moves. `init()` asserts this in
debug builds; configuration validation rejects it up front.
*/

/// Numeric types a [`SmoothValue`] can ramp.
pub trait Smoothable:
    Copy + Default + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Div<Output = Self>
{
    const DEFAULT_EPSILON: Self;

    fn from_count(count: u32) -> Self;

    fn abs(self) -> Self;
}

macro_rules! impl_smoothable {
    ($t:ty) => {
        impl Smoothable for $t {
            const DEFAULT_EPSILON: Self = 0.0001;

            #[inline]
            fn from_count(count: u32) -> Self {
                count as $t
            }

            #[inline]
            fn abs(self) -> Self {
                <$t>::abs(self)
            }
        }
    };
}

impl_smoothable!(f32);
impl_smoothable!(f64);

#[derive(Debug, Clone, Copy)]
pub struct SmoothValue<T: Smoothable> {
    current: T,
    target: T,
    delta: T,
    duration: u32,
    counter: u32,
}

impl<T: Smoothable> SmoothValue<T> {
    /// Start resting at `initial`. Call [`init`](Self::init) before use.
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            target: initial,
            delta: T::default(),
            duration: 0,
            counter: 0,
        }
    }

    /// Set the ramp length from a duration in seconds.
    pub fn init(&mut self, duration_secs: f32, sample_rate: f32) {
        let samples = (duration_secs * sample_rate).round().max(0.0) as u32;
        debug_assert!(samples > 0, "smoothing duration must be at least one sample");

        self.duration = samples;
        self.counter = 0;
    }

    /// Return the current value, then advance one sample.
    #[inline]
    pub fn next_value(&mut self) -> T {
        let previous = self.current;
        self.advance();
        previous
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.counter > 0 {
            self.counter -= 1;
            self.current = if self.counter == 0 {
                self.target
            } else {
                self.current + self.delta
            };
        }
    }

    pub fn set_target(&mut self, target: T) {
        self.set_target_with_epsilon(target, T::DEFAULT_EPSILON);
    }

    /// Re-arm the ramp only if `target` moved at least `epsilon` away from
    /// the current target.
    pub fn set_target_with_epsilon(&mut self, target: T, epsilon: T) {
        if (target - self.target).abs() >= epsilon {
            self.target = target;
            self.update_delta();
        }
    }

    /// Jump to `value` with no ramp.
    pub fn set_value(&mut self, value: T) {
        self.current = value;
        self.target = value;
        self.delta = T::default();
        self.counter = 0;
    }

    pub fn value(&self) -> T {
        self.current
    }

    pub fn target(&self) -> T {
        self.target
    }

    /// True while the value is still travelling toward its target.
    pub fn is_active(&self) -> bool {
        self.counter > 0
    }

    pub fn duration_samples(&self) -> u32 {
        self.duration
    }

    fn update_delta(&mut self) {
        self.delta = (self.target - self.current) / T::from_count(self.duration);
        self.counter = self.duration;
    }
}

impl<T: Smoothable> Default for SmoothValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother(duration_samples: u32) -> SmoothValue<f32> {
        let mut value = SmoothValue::new(0.0);
        // 1 Hz "sample rate" makes seconds equal samples
        value.init(duration_samples as f32, 1.0);
        value
    }

    #[test]
    fn test_ramp_completes_after_duration() {
        let mut value = smoother(100);
        value.set_target(1.0);

        let mut previous = value.value();
        for _ in 0..100 {
            let sample = value.next_value();
            assert!(sample >= previous, "ramp must not move backwards");
            previous = sample;
        }

        assert_eq!(value.value(), 1.0);
        assert!(!value.is_active());
        for _ in 0..50 {
            assert_eq!(value.next_value(), 1.0);
        }
    }

    #[test]
    fn test_next_value_reads_before_stepping() {
        let mut value = smoother(4);
        value.set_target(1.0);

        assert_eq!(value.next_value(), 0.0);
        assert!((value.next_value() - 0.25).abs() < 1e-6);
        assert!((value.next_value() - 0.5).abs() < 1e-6);
        assert!((value.next_value() - 0.75).abs() < 1e-6);
        assert_eq!(value.next_value(), 1.0);
    }

    #[test]
    fn test_small_target_change_is_ignored() {
        let mut value = smoother(10);
        value.set_target(1.0);
        value.next_value();
        value.next_value();
        let in_flight = (value.value(), value.is_active());

        value.set_target(1.0 + 0.00005);
        value.set_target(1.0 - 0.00005);
        assert_eq!(value.target(), 1.0);

        // ramp continues exactly as before: 8 steps left of 0.1
        for _ in 0..7 {
            value.next_value();
        }
        assert!(in_flight.1);
        assert!((value.value() - 0.9).abs() < 1e-5, "got {}", value.value());
        value.next_value();
        assert_eq!(value.value(), 1.0);
    }

    #[test]
    fn test_custom_epsilon() {
        let mut value = smoother(10);
        value.set_target_with_epsilon(0.05, 0.1);
        assert_eq!(value.target(), 0.0);
        assert!(!value.is_active());

        value.set_target_with_epsilon(0.2, 0.1);
        assert_eq!(value.target(), 0.2);
        assert!(value.is_active());
    }

    #[test]
    fn test_retarget_mid_ramp_runs_full_duration() {
        let mut value = smoother(10);
        value.set_target(1.0);
        for _ in 0..5 {
            value.next_value();
        }
        let start = value.value();
        value.set_target(0.0);

        for step in 0..10 {
            assert!(value.is_active(), "ramp ended early at step {step}");
            value.next_value();
        }
        assert_eq!(value.value(), 0.0);
        assert!(start > 0.4);
    }

    #[test]
    fn test_set_value_jumps() {
        let mut value = smoother(10);
        value.set_target(1.0);
        value.set_value(0.3);
        assert_eq!(value.next_value(), 0.3);
        assert_eq!(value.target(), 0.3);
        assert!(!value.is_active());
    }

    #[test]
    fn test_duration_from_seconds() {
        let mut value = SmoothValue::<f64>::new(0.0);
        value.init(0.025, 48_000.0);
        assert_eq!(value.duration_samples(), 1200);
    }
}
