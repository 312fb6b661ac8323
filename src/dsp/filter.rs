use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Tone-Shaping Filters
====================

| type       | order | passes             | shapes                          |
| ---------- | ----- | ------------------ | ------------------------------- |
| low-pass   | 1, 2  | below cutoff       | rolls off highs                 |
| high-pass  | 1, 2  | above cutoff       | rolls off lows                  |
| low shelf  | 2     | everything         | boosts/cuts below cutoff by dB  |
| high shelf | 2     | everything         | boosts/cuts above cutoff by dB  |
| peak       | 2     | everything         | boosts/cuts a band around cutoff|

Biquad
------

Coefficients follow the RBJ audio EQ cookbook, normalized by a0:

    w0    = 2π · cutoff / sample_rate
    alpha = sin(w0) / (2Q)
    A     = 10^(gain_db / 40)

The difference equation runs in transposed direct form II, which needs two
state registers:

    y  = b0·x + z1
    z1 = b1·x - a1·y + z2
    z2 = b2·x - a2·y

Coefficients are only recomputed when cutoff, Q or gain actually change,
so calling a setter every block with the same value costs a compare.

One-pole
--------

    a  = e^(-2π · cutoff / sample_rate)
    lp = (1 - a)·x + a·lp
    hp = x - lp

One register, 6 dB/octave. Used for the tone control, where a gentle slope
sounds less like a filter and more like a darker or brighter guitar.
*/

const MIN_CUTOFF_HZ: f32 = 10.0;
const MIN_Q: f32 = 0.01;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiquadType {
    LowPass,
    HighPass,
    LowShelf,
    HighShelf,
    Peak,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BiquadCoeffs {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl BiquadCoeffs {
    const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct BiquadFilter {
    filter_type: BiquadType,
    sample_rate: f32,
    cutoff_hz: f32,
    q: f32,
    gain_db: f32,
    coeffs: BiquadCoeffs,
    z1: f32,
    z2: f32,
}

impl BiquadFilter {
    pub fn new(sample_rate: f32, filter_type: BiquadType) -> Self {
        let mut filter = Self {
            filter_type,
            sample_rate,
            cutoff_hz: 1_000.0,
            q: std::f32::consts::FRAC_1_SQRT_2,
            gain_db: 0.0,
            coeffs: BiquadCoeffs::IDENTITY,
            z1: 0.0,
            z2: 0.0,
        };
        filter.update_coeffs();
        filter
    }

    pub fn low_shelf(sample_rate: f32, cutoff_hz: f32, q: f32, gain_db: f32) -> Self {
        let mut filter = Self::new(sample_rate, BiquadType::LowShelf);
        filter.set_params(cutoff_hz, q, gain_db);
        filter
    }

    pub fn high_pass(sample_rate: f32, cutoff_hz: f32, q: f32) -> Self {
        let mut filter = Self::new(sample_rate, BiquadType::HighPass);
        filter.set_params(cutoff_hz, q, 0.0);
        filter
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + self.z1;
        self.z1 = c.b1 * input - c.a1 * output + self.z2;
        self.z2 = c.b2 * input - c.a2 * output;
        output
    }

    pub fn set_params(&mut self, cutoff_hz: f32, q: f32, gain_db: f32) {
        let cutoff_hz = self.clamp_cutoff(cutoff_hz);
        let q = q.max(MIN_Q);
        if cutoff_hz != self.cutoff_hz || q != self.q || gain_db != self.gain_db {
            self.cutoff_hz = cutoff_hz;
            self.q = q;
            self.gain_db = gain_db;
            self.update_coeffs();
        }
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.set_params(cutoff_hz, self.q, self.gain_db);
    }

    pub fn set_q(&mut self, q: f32) {
        self.set_params(self.cutoff_hz, q, self.gain_db);
    }

    pub fn set_gain(&mut self, gain_db: f32) {
        self.set_params(self.cutoff_hz, self.q, gain_db);
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn gain(&self) -> f32 {
        self.gain_db
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    fn clamp_cutoff(&self, cutoff_hz: f32) -> f32 {
        cutoff_hz.clamp(MIN_CUTOFF_HZ, self.sample_rate * 0.49)
    }

    fn update_coeffs(&mut self) {
        let w0 = TAU * self.cutoff_hz / self.sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * self.q);
        let a = 10.0_f32.powf(self.gain_db / 40.0);

        let (b0, b1, b2, a0, a1, a2) = match self.filter_type {
            BiquadType::LowPass => (
                (1.0 - cos_w0) * 0.5,
                1.0 - cos_w0,
                (1.0 - cos_w0) * 0.5,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadType::HighPass => (
                (1.0 + cos_w0) * 0.5,
                -(1.0 + cos_w0),
                (1.0 + cos_w0) * 0.5,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadType::Peak => (
                1.0 + alpha * a,
                -2.0 * cos_w0,
                1.0 - alpha * a,
                1.0 + alpha / a,
                -2.0 * cos_w0,
                1.0 - alpha / a,
            ),
            BiquadType::LowShelf => {
                let k = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 + k),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 - k),
                    (a + 1.0) + (a - 1.0) * cos_w0 + k,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    (a + 1.0) + (a - 1.0) * cos_w0 - k,
                )
            }
            BiquadType::HighShelf => {
                let k = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 + k),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 - k),
                    (a + 1.0) - (a - 1.0) * cos_w0 + k,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                    (a + 1.0) - (a - 1.0) * cos_w0 - k,
                )
            }
        };

        self.coeffs = BiquadCoeffs {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        };
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnePoleType {
    LowPass,
    HighPass,
}

#[derive(Debug, Clone, Copy)]
pub struct OnePoleFilter {
    filter_type: OnePoleType,
    sample_rate: f32,
    cutoff_hz: f32,
    coefficient: f32,
    state: f32,
}

impl OnePoleFilter {
    pub fn new(sample_rate: f32, filter_type: OnePoleType, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            filter_type,
            sample_rate,
            cutoff_hz: 0.0,
            coefficient: 0.0,
            state: 0.0,
        };
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn lowpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self::new(sample_rate, OnePoleType::LowPass, cutoff_hz)
    }

    pub fn highpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self::new(sample_rate, OnePoleType::HighPass, cutoff_hz)
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = (1.0 - self.coefficient) * input + self.coefficient * self.state;
        match self.filter_type {
            OnePoleType::LowPass => self.state,
            OnePoleType::HighPass => input - self.state,
        }
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        let cutoff_hz = cutoff_hz.clamp(MIN_CUTOFF_HZ, self.sample_rate * 0.49);
        if cutoff_hz != self.cutoff_hz {
            self.cutoff_hz = cutoff_hz;
            self.coefficient = (-TAU * cutoff_hz / self.sample_rate).exp();
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Oscillator;

    const SR: f32 = 48_000.0;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(512);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn sine_through(freq: f32, len: usize, mut filter: impl FnMut(f32) -> f32) -> Vec<f32> {
        let mut osc = Oscillator::new(SR).with_frequency(freq);
        (0..len).map(|_| filter(osc.process())).collect()
    }

    #[test]
    fn test_zero_gain_shelf_is_transparent() {
        let mut shelf = BiquadFilter::low_shelf(SR, 250.0, 0.707, 0.0);
        for i in 0..256 {
            let x = (i as f32 * 0.37).sin();
            let y = shelf.process(x);
            assert!((x - y).abs() < 1e-4, "sample {i}: {x} became {y}");
        }
    }

    #[test]
    fn test_low_shelf_dc_gain_matches_db() {
        let mut shelf = BiquadFilter::low_shelf(SR, 250.0, 0.707, 6.0);
        let mut last = 0.0;
        for _ in 0..48_000 {
            last = shelf.process(1.0);
        }
        let expected = 10.0_f32.powf(6.0 / 20.0);
        assert!((last - expected).abs() < 0.01, "expected {expected}, got {last}");
    }

    #[test]
    fn test_low_shelf_leaves_highs_alone() {
        let mut shelf = BiquadFilter::low_shelf(SR, 200.0, 0.707, -9.0);
        let out = sine_through(7_919.0, 4096, |x| shelf.process(x));
        let peak = peak_after_transient(&out);
        assert!((peak - 1.0).abs() < 0.05, "got {peak}");
    }

    #[test]
    fn test_biquad_highpass_blocks_dc() {
        let mut hp = BiquadFilter::high_pass(SR, 100.0, 0.707);
        let mut last = 1.0;
        for _ in 0..48_000 {
            last = hp.process(1.0);
        }
        assert!(last.abs() < 1e-3, "got {last}");
    }

    #[test]
    fn test_biquad_lowpass_attenuates_highs() {
        let mut lp = BiquadFilter::new(SR, BiquadType::LowPass);
        lp.set_cutoff(500.0);
        let out = sine_through(8_000.0, 4096, |x| lp.process(x));
        assert!(peak_after_transient(&out) < 0.05);
    }

    #[test]
    fn test_peak_boosts_centre() {
        let mut peak = BiquadFilter::new(SR, BiquadType::Peak);
        peak.set_params(1_000.0, 1.0, 12.0);
        let out = sine_through(1_000.0, 8192, |x| peak.process(x));
        let level = peak_after_transient(&out);
        assert!((level - 10.0_f32.powf(12.0 / 20.0)).abs() < 0.2, "got {level}");
    }

    #[test]
    fn test_high_shelf_boosts_highs() {
        let mut shelf = BiquadFilter::new(SR, BiquadType::HighShelf);
        shelf.set_params(2_000.0, 0.707, 6.0);
        let out = sine_through(15_000.0, 4096, |x| shelf.process(x));
        assert!(peak_after_transient(&out) > 1.8);
    }

    #[test]
    fn test_set_gain_only_touches_gain() {
        let mut shelf = BiquadFilter::low_shelf(SR, 250.0, 0.707, 0.0);
        shelf.set_gain(-3.0);
        assert_eq!(shelf.gain(), -3.0);
        assert_eq!(shelf.cutoff(), 250.0);
    }

    #[test]
    fn test_cutoff_is_clamped_below_nyquist() {
        let mut lp = OnePoleFilter::lowpass(SR, 1_000.0);
        lp.set_cutoff(90_000.0);
        assert!(lp.cutoff() < SR * 0.5);
        let mut bq = BiquadFilter::new(SR, BiquadType::LowPass);
        bq.set_cutoff(0.0);
        assert_eq!(bq.cutoff(), MIN_CUTOFF_HZ);
    }

    #[test]
    fn test_one_pole_lowpass_passes_dc() {
        let mut lp = OnePoleFilter::lowpass(SR, 800.0);
        let mut last = 0.0;
        for _ in 0..4_800 {
            last = lp.process(1.0);
        }
        assert!((last - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_one_pole_lowpass_darkens() {
        let mut bright = OnePoleFilter::lowpass(SR, 20_000.0);
        let mut dark = OnePoleFilter::lowpass(SR, 800.0);
        let bright_out = sine_through(6_000.0, 2048, |x| bright.process(x));
        let dark_out = sine_through(6_000.0, 2048, |x| dark.process(x));
        assert!(peak_after_transient(&dark_out) < peak_after_transient(&bright_out) * 0.5);
    }

    #[test]
    fn test_one_pole_highpass_blocks_dc() {
        let mut hp = OnePoleFilter::highpass(SR, 100.0);
        let mut last = 1.0;
        for _ in 0..48_000 {
            last = hp.process(1.0);
        }
        assert!(last.abs() < 1e-3, "got {last}");
    }

    #[test]
    fn test_filter_copies_keep_separate_state() {
        let shelf = BiquadFilter::low_shelf(SR, 250.0, 0.707, 6.0);
        let tone = OnePoleFilter::lowpass(SR, 2_000.0);
        let mut shelves = [shelf; 2];
        let mut tones = [tone; 2];

        for _ in 0..64 {
            shelves[0].process(1.0);
            tones[0].process(1.0);
        }

        // The untouched copies still start from silence.
        assert_eq!(shelves[1].process(0.0), 0.0);
        assert_eq!(tones[1].process(0.0), 0.0);
        assert_eq!(shelves[1].gain(), 6.0);
        assert_ne!(shelves[0].process(0.0), 0.0);
    }
}
