use crate::dsp::curve::bipolar_to_unipolar;

/// LED intensities in `[0, 1]`, computed once per block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Indicators {
    pub bypass: f32,
    pub tap: f32,
}

impl Indicators {
    /// Engaged-or-pressed, optionally breathing with the LFO.
    ///
    /// `lfo` is the bipolar LFO sample; `None` gives a steady LED.
    pub fn bypass_led(lit: bool, lfo: Option<f32>) -> f32 {
        if !lit {
            return 0.0;
        }
        match lfo {
            Some(value) => bipolar_to_unipolar(value.clamp(-1.0, 1.0)),
            None => 1.0,
        }
    }

    /// On while held; otherwise, with `period_ms`, a short blink at the
    /// start of every period.
    pub fn tap_led(pressed: bool, now_ms: u32, period_ms: Option<u32>) -> f32 {
        if pressed {
            return 1.0;
        }
        match period_ms {
            Some(period) if period > 0 && now_ms % period < period.div_ceil(4) => 1.0,
            _ => 0.0,
        }
    }
}
