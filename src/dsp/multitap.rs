use super::delay::DelayLine;
use super::oscillator::{Oscillator, OscillatorWaveform};

/*
Multi-tap Modulated Delay
=========================

One delay line read at several points ("taps") at once. Each tap is a
copy of the input at a slightly different delay, and a shared sine LFO
sweeps every tap's read position, so the copies drift in pitch together.
Summed, they sound like a small ensemble rather than one echo.

Tap layout
----------

A single target delay D (in samples) is divided evenly among the taps and
each tap is pulled slightly earlier by a fixed random amount:

    spacing = D / TAPS
    tap[i]  = spacing·(i + 1) - spread[i]·spacing·0.1

    D = 400, TAPS = 4:

    0        100       200       300       400   samples
    |---------|---------|---------|---------|
             ^         ^        ^          ^
           tap0      tap1     tap2       tap3    (each up to 10% early)

The spread values come from a seeded LCG so the layout is identical on
every run and every platform. Two instances with different seeds produce
uncorrelated layouts, which is what keeps the stereo channels apart.

Per sample
----------

    fb = previous · feedback
    line.write(input + fb)
    m  = lfo.process()                       depth is the LFO amplitude
    out = Σ line.read(tap[i] + tap[i]·m·0.5) · gain[i]     i < active_taps
    previous = out

    gain[0] = 1, gain[i] = gain[i-1] / TAPS

Modulation scales each tap by up to ±50%, so the longest read is 1.5 times
the longest tap. Capping the delay at CAPACITY/2 keeps every read inside
the buffer.

Feedback stability
------------------

The loop gain is feedback · Σ gain[i]. Feedback is held below
0.99 / Σ gain[i] for the active taps, so the loop always decays.
*/

/// ANSI C reference `rand()`: 15-bit output from a 32-bit LCG.
#[derive(Debug, Clone, Copy)]
struct Lcg {
    state: u32,
}

impl Lcg {
    const MAX: u32 = 32_767;

    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_u15(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (self.state / 65_536) % 32_768
    }

    /// Uniform in `[0, 1]`.
    fn next_unit(&mut self) -> f32 {
        self.next_u15() as f32 / Self::MAX as f32
    }
}

const STABLE_LOOP_GAIN: f32 = 0.99;

pub struct MultitapDelay<const TAPS: usize, const CAPACITY: usize> {
    line: DelayLine<CAPACITY>,
    lfo: Oscillator,
    sample_rate: f32,
    delay_samples: f32,
    taps: [f32; TAPS],
    spread: [f32; TAPS],
    gains: [f32; TAPS],
    active_taps: usize,
    requested_feedback: f32,
    feedback: f32,
    previous: f32,
    last_modulation: f32,
}

impl<const TAPS: usize, const CAPACITY: usize> MultitapDelay<TAPS, CAPACITY> {
    /// Build a delay with its tap spread drawn from `seed`.
    ///
    /// All taps start active with zero delay, zero feedback and a 1 Hz
    /// full-depth LFO.
    pub fn new(sample_rate: f32, seed: u32) -> Self {
        let mut rng = Lcg::new(seed);
        let spread = std::array::from_fn(|_| rng.next_unit());

        let decay = 1.0 / TAPS as f32;
        let mut gains = [0.0; TAPS];
        let mut gain = 1.0;
        for slot in gains.iter_mut() {
            *slot = gain;
            gain *= decay;
        }

        Self {
            line: DelayLine::new(),
            lfo: Oscillator::new(sample_rate).with_waveform(OscillatorWaveform::Sine),
            sample_rate,
            delay_samples: 0.0,
            taps: [0.0; TAPS],
            spread,
            gains,
            active_taps: TAPS,
            requested_feedback: 0.0,
            feedback: 0.0,
            previous: 0.0,
            last_modulation: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let fb = self.previous * self.feedback;
        self.line.write(input + fb);

        let modulation = self.lfo.process();
        self.last_modulation = modulation;

        let mut output = 0.0;
        for (&tap, &gain) in self.taps.iter().zip(self.gains.iter()).take(self.active_taps) {
            let position = tap + tap * modulation * 0.5;
            output += self.line.read(position) * gain;
        }

        self.previous = output;
        output
    }

    /// Clear the line, restart the LFO and drop the feedback memory.
    pub fn reset(&mut self) {
        self.line.clear();
        self.lfo.reset();
        self.previous = 0.0;
        self.last_modulation = 0.0;
    }

    /// Target delay in seconds, clamped to `[0, max_delay()]` samples.
    pub fn set_delay_time(&mut self, seconds: f32) {
        let samples = (seconds * self.sample_rate).clamp(0.0, self.max_delay() as f32);
        if samples == self.delay_samples {
            return;
        }
        self.delay_samples = samples;

        let spacing = samples / TAPS as f32;
        for (i, (tap, &spread)) in self.taps.iter_mut().zip(self.spread.iter()).enumerate() {
            *tap = spacing * (i + 1) as f32 - spread * spacing * 0.1;
        }
    }

    /// Requested feedback, clamped to `[-1, 1]` and then to `0.99 / Σ gain`
    /// over the active taps. The limit follows `set_num_active_taps`, so a
    /// single voice at 1.0 runs at 0.99.
    pub fn set_feedback_level(&mut self, feedback: f32) {
        self.requested_feedback = feedback;
        self.update_feedback();
    }

    /// LFO rate in Hz.
    pub fn set_rate(&mut self, hz: f32) {
        self.lfo.set_frequency(hz);
    }

    /// Modulation depth, clamped to `[-1, 1]`. Negative depth inverts the
    /// sweep.
    pub fn set_depth(&mut self, depth: f32) {
        self.lfo.set_amplitude(depth.clamp(-1.0, 1.0));
    }

    /// Number of taps summed into the output, shortest first. Clamped to
    /// `[1, TAPS]`.
    pub fn set_num_active_taps(&mut self, taps: usize) {
        self.active_taps = taps.clamp(1, TAPS);
        self.update_feedback();
    }

    /// Longest delay in samples.
    pub const fn max_delay(&self) -> usize {
        CAPACITY / 2
    }

    pub const fn max_num_taps(&self) -> usize {
        TAPS
    }

    pub fn num_active_taps(&self) -> usize {
        self.active_taps
    }

    pub fn delay_samples(&self) -> f32 {
        self.delay_samples
    }

    /// Per-tap read offsets in samples before modulation.
    pub fn taps(&self) -> &[f32; TAPS] {
        &self.taps
    }

    /// Feedback actually applied after clamping.
    pub fn feedback_level(&self) -> f32 {
        self.feedback
    }

    pub fn depth(&self) -> f32 {
        self.lfo.amplitude()
    }

    pub fn rate(&self) -> f32 {
        self.lfo.frequency()
    }

    /// The LFO sample used on the most recent tick.
    pub fn last_modulation(&self) -> f32 {
        self.last_modulation
    }

    fn update_feedback(&mut self) {
        let loop_gain: f32 = self.gains[..self.active_taps].iter().sum();
        let limit = STABLE_LOOP_GAIN / loop_gain;
        self.feedback = self.requested_feedback.clamp(-1.0, 1.0).clamp(-limit, limit);
    }
}
