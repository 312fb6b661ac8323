use std::f32::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulating Oscillator
=============================

Every waveform is computed directly from the phase; there are no tables.

    sine       sin(phase)
    triangle   (2/π) · asin(sin(phase))
    saw        1 - phase/π              (falls from +1 to -1 over one cycle)
    pulse      +1 while phase < π, else -1

    delta = 2π · frequency / sample_rate

`process()` evaluates the waveform at the CURRENT phase, then advances the
phase by delta and wraps it back into [0, 2π). Output is scaled by the
amplitude, so it always lies in [-|amplitude|, |amplitude|].

Frequency changes take effect on the next sample with no smoothing. If the
rate needs to glide, ramp it upstream with a SmoothValue.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorWaveform {
    #[default]
    Sine,
    Triangle,
    Saw,
    Pulse,
}

pub struct Oscillator {
    waveform: OscillatorWaveform,
    amplitude: f32,
    frequency: f32,
    phase: f32,
    delta: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            waveform: OscillatorWaveform::Sine,
            amplitude: 1.0,
            frequency: 1.0,
            phase: 0.0,
            delta: 0.0,
            sample_rate,
        };
        osc.update_delta();
        osc
    }

    pub fn with_waveform(mut self, waveform: OscillatorWaveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.set_frequency(frequency);
        self
    }

    #[inline]
    pub fn process(&mut self) -> f32 {
        let sample = match self.waveform {
            OscillatorWaveform::Sine => self.phase.sin(),
            OscillatorWaveform::Triangle => (2.0 / PI) * self.phase.sin().asin(),
            OscillatorWaveform::Saw => 1.0 - self.phase / PI,
            OscillatorWaveform::Pulse => {
                if self.phase < PI {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += self.delta;
        if self.phase >= TAU {
            self.phase -= TAU;
        }

        self.amplitude * sample
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.update_delta();
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    pub fn set_waveform(&mut self, waveform: OscillatorWaveform) {
        self.waveform = waveform;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    fn update_delta(&mut self) {
        // Keep the increment inside one cycle so a single subtraction wraps.
        self.delta = (TAU * self.frequency / self.sample_rate).rem_euclid(TAU);
    }
}
