//! The chorus pedal: controls in, stereo audio out.

use tracing::{info, warn};

use crate::config::{ConfigError, KnobParam, PedalConfig, SwitchAction};
use crate::dsp::chorus::Chorus;
use crate::dsp::curve::{approx_eq, mix_bell, quadratic_scale};
use crate::dsp::distortion::SoftClip;
use crate::dsp::filter::{BiquadFilter, OnePoleFilter};
use crate::dsp::mix::Mixer;
use crate::dsp::smooth::SmoothValue;
use crate::io::{ControlFrame, Indicators};

/*
Signal Flow
===========

Wet and dry run side by side for each channel:

    in ──► cut shelf ──► chorus ──► tone LP ──► [high-pass] ──► wet
     └───► boost shelf ───────────────────────────────────────► dry

    out_l = clip(mix(dry_l, wet_l - wet_r · s))
    out_r = clip(mix(dry_r, wet_r - wet_l · s))

`s` is the mix bell, exp(-(mix - 0.5)² / 0.02). It peaks at an even blend
and almost vanishes at either end of the mix knob. It scales two things:

  - the shelves: the wet path is cut and the dry path boosted by
    s · shelf_gain_db at the low end, so the blend does not go muddy
  - the cross-feed: subtracting some of the opposite wet channel widens
    the image, most strongly where the effect is most audible

Bypassed, the input is copied straight through.

Control Flow
============

`apply_controls` runs once per block with a whole ControlFrame. Every knob
and switch goes through the binding table, so the same pedal serves any
layout. Delay time and depth go to smoothers and ramp per sample; the rest
change at block rate.

Delay time has two writers: the delay knob and tap tempo. Both cover the
same span, `min + k · max_delay` for the knob and up to `max_delay` for a
tapped interval. The knob only writes when it actually moves (by at least
0.001), otherwise a resting knob would overwrite a tapped tempo on the very
next block.
*/

const KNOB_EPSILON: f32 = 0.001;
const DOUBLE_VOICE_FEEDBACK: f32 = 0.6;
const WARP_FACTOR: f32 = 100.0;
const HIGH_PASS_Q: f32 = 0.707;

/// Delay time from the interval between two footswitch presses.
#[derive(Debug, Clone, Copy)]
pub struct TapTempo {
    previous_ms: u32,
    max_interval_ms: f32,
}

impl TapTempo {
    /// Intervals of `max_delay_secs` or longer are ignored.
    pub fn new(max_delay_secs: f32) -> Self {
        Self {
            previous_ms: 0,
            max_interval_ms: max_delay_secs * 1000.0,
        }
    }

    /// Register an edge at `now_ms`. Returns the new delay in seconds when
    /// the interval since the previous edge is usable.
    ///
    /// ```
    /// use petal_chorus::pedal::TapTempo;
    ///
    /// let mut tap = TapTempo::new(1.0);
    /// tap.on_edge(10_000);
    /// assert_eq!(tap.on_edge(10_500), Some(0.5));
    /// assert_eq!(tap.on_edge(12_500), None);
    /// ```
    pub fn on_edge(&mut self, now_ms: u32) -> Option<f32> {
        let interval = now_ms.wrapping_sub(self.previous_ms);
        self.previous_ms = now_ms;

        let interval_ms = interval as f32;
        (interval > 0 && interval_ms < self.max_interval_ms).then(|| interval_ms * 0.001)
    }

    pub fn reset(&mut self) {
        self.previous_ms = 0;
    }
}

pub struct ChorusPedal {
    config: PedalConfig,
    chorus: Chorus,
    cut: [BiquadFilter; 2],
    boost: [BiquadFilter; 2],
    tone: [OnePoleFilter; 2],
    high_pass: [BiquadFilter; 2],
    mixer: Mixer,
    clip: SoftClip,
    delay_time: SmoothValue<f32>,
    depth: SmoothValue<f32>,
    tap: TapTempo,

    engaged: bool,
    double_voice: bool,
    high_pass_on: bool,
    warp: f32,
    mix_scale: f32,
    delay_knob: Option<f32>,
    voices_knob: Option<f32>,
    last_frame: ControlFrame,
}

impl ChorusPedal {
    pub fn new(config: PedalConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let sr = config.sample_rate;
        let mut chorus = Chorus::with_range(sr, config.delay_range);

        let max_voices = chorus.max_voices();
        if config.initial_voices > max_voices {
            warn!(
                requested = config.initial_voices,
                max_voices, "initial voice count clamped"
            );
        }
        chorus.set_num_voices(config.initial_voices);

        if config.tone_max_hz > sr * 0.49 {
            warn!(
                tone_max_hz = config.tone_max_hz,
                sample_rate = sr,
                "tone range reaches past the filter limit; cutoff will be clamped"
            );
        }

        let shelf = BiquadFilter::low_shelf(sr, config.shelf_cutoff_hz, config.shelf_q, 0.0);
        let tone = OnePoleFilter::lowpass(sr, config.tone_max_hz);
        let high_pass = BiquadFilter::high_pass(sr, config.high_pass_hz, HIGH_PASS_Q);

        let mut delay_time = SmoothValue::new(0.0);
        delay_time.init(config.smoothing_secs, sr);
        let mut depth = SmoothValue::new(0.0);
        depth.init(config.smoothing_secs, sr);

        let mut mixer = Mixer::new(config.mix_curve);
        mixer.set_mix(0.5);

        let mut pedal = Self {
            tap: TapTempo::new(chorus.max_delay()),
            chorus,
            cut: [shelf; 2],
            boost: [shelf; 2],
            tone: [tone; 2],
            high_pass: [high_pass; 2],
            mixer,
            clip: SoftClip::new(config.clip_threshold),
            delay_time,
            depth,
            engaged: true,
            double_voice: false,
            high_pass_on: false,
            warp: 1.0,
            mix_scale: mix_bell(0.5),
            delay_knob: None,
            voices_knob: None,
            last_frame: ControlFrame::default(),
            config,
        };

        // Start from centred knobs with no ramp in flight.
        pedal.apply_controls(&ControlFrame::default());
        pedal.delay_time.set_value(pedal.delay_time.target());
        pedal.depth.set_value(pedal.depth.target());
        pedal.delay_knob = None;
        pedal.voices_knob = None;

        info!(
            sample_rate = sr,
            max_delay_secs = pedal.chorus.max_delay(),
            voices = pedal.chorus.num_voices(),
            high_pass = pedal.config.features.high_pass,
            "chorus pedal ready"
        );

        Ok(pedal)
    }

    /// Map one control snapshot onto the pedal. Call once per block, before
    /// rendering it.
    pub fn apply_controls(&mut self, frame: &ControlFrame) {
        let bindings = self.config.bindings;

        for (slot, action) in bindings.switches.iter().enumerate() {
            if let Some(action) = action {
                self.apply_switch(*action, frame.is_pressed(slot), frame.is_rising(slot), frame.now_ms);
            }
        }

        for (slot, param) in bindings.knobs.iter().enumerate() {
            if let Some(param) = param {
                self.apply_knob(*param, frame.knob(slot).clamp(0.0, 1.0));
            }
        }

        self.last_frame = *frame;
    }

    fn apply_switch(&mut self, action: SwitchAction, pressed: bool, rising: bool, now_ms: u32) {
        match action {
            SwitchAction::Bypass => {
                if rising {
                    self.engaged = !self.engaged;
                }
            }
            SwitchAction::TapTempo => {
                if rising {
                    if let Some(seconds) = self.tap.on_edge(now_ms) {
                        self.delay_time.set_target(seconds);
                    }
                }
            }
            SwitchAction::DoubleVoice => {
                if pressed != self.double_voice {
                    self.double_voice = pressed;
                    self.chorus.set_num_voices(if pressed { 2 } else { 1 });
                }
            }
            SwitchAction::DepthWarp => {
                self.warp = if pressed { WARP_FACTOR } else { 1.0 };
            }
            SwitchAction::HighPass => {
                self.high_pass_on = pressed && self.config.features.high_pass;
            }
        }
    }

    fn apply_knob(&mut self, param: KnobParam, value: f32) {
        match param {
            KnobParam::Mix => {
                self.mixer.set_mix(value);
                self.mix_scale = mix_bell(value);

                let gain = self.mix_scale * self.config.shelf_gain_db;
                for (cut, boost) in self.cut.iter_mut().zip(self.boost.iter_mut()) {
                    cut.set_gain(-gain);
                    boost.set_gain(gain);
                }
            }
            KnobParam::Tone => {
                let cutoff = quadratic_scale(self.config.tone_min_hz, self.config.tone_max_hz, value);
                for tone in self.tone.iter_mut() {
                    tone.set_cutoff(cutoff);
                }
            }
            KnobParam::Delay => {
                let moved = self
                    .delay_knob
                    .map_or(true, |last| !approx_eq(last, value, KNOB_EPSILON));
                if moved {
                    self.delay_knob = Some(value);
                    self.delay_time.set_target(self.knob_delay(value));
                }
            }
            KnobParam::Feedback => {
                let scale = if self.double_voice { DOUBLE_VOICE_FEEDBACK } else { 1.0 };
                self.chorus.set_feedback_level(value * scale);
            }
            KnobParam::Rate => {
                let hz = quadratic_scale(self.config.rate_min_hz, self.config.rate_max_hz, value);
                self.chorus.set_rate(hz);
            }
            KnobParam::Depth => {
                self.depth.set_target(value * self.warp);
            }
            KnobParam::Voices => {
                let moved = self
                    .voices_knob
                    .map_or(true, |last| !approx_eq(last, value, KNOB_EPSILON));
                if moved {
                    self.voices_knob = Some(value);
                    let extra = (value * (self.chorus.max_voices() - 1) as f32).round() as usize;
                    self.chorus.set_num_voices(1 + extra);
                }
            }
        }
    }

    /// Delay knob position to seconds. The knob shares its range with tap
    /// tempo: from the chorus minimum up to the full delay line, where the
    /// lines clamp it.
    fn knob_delay(&self, value: f32) -> f32 {
        self.config.delay_range.min + value * self.chorus.max_delay()
    }

    /// One stereo sample through the whole chain.
    #[inline]
    pub fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.chorus.set_delay_time_secs(self.delay_time.next_value());
        self.chorus.set_depth(self.depth.next_value());

        let (wet_l, wet_r) = self
            .chorus
            .process_stereo(self.cut[0].process(left), self.cut[1].process(right));

        let mut wet_l = self.tone[0].process(wet_l);
        let mut wet_r = self.tone[1].process(wet_r);
        if self.high_pass_on {
            wet_l = self.high_pass[0].process(wet_l);
            wet_r = self.high_pass[1].process(wet_r);
        }

        let dry_l = self.boost[0].process(left);
        let dry_r = self.boost[1].process(right);

        if !self.engaged {
            return (left, right);
        }

        let out_l = self.mixer.process(dry_l, wet_l - wet_r * self.mix_scale);
        let out_r = self.mixer.process(dry_r, wet_r - wet_l * self.mix_scale);
        (self.clip.process(out_l), self.clip.process(out_r))
    }

    /// Render a block of separate left/right channels. Processes as many
    /// samples as the shortest slice holds.
    pub fn process_block(
        &mut self,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        let frames = in_left
            .iter()
            .zip(in_right)
            .zip(out_left.iter_mut().zip(out_right.iter_mut()));

        for ((&l, &r), (out_l, out_r)) in frames {
            let (yl, yr) = self.process_frame(l, r);
            *out_l = yl;
            *out_r = yr;
        }
    }

    /// Render an interleaved stereo buffer in place. A trailing odd sample
    /// is left untouched.
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) {
        for frame in buffer.chunks_exact_mut(2) {
            let (l, r) = self.process_frame(frame[0], frame[1]);
            frame[0] = l;
            frame[1] = r;
        }
    }

    /// LED intensities for the most recently applied control frame.
    pub fn indicators(&self) -> Indicators {
        let bindings = &self.config.bindings;
        let features = self.config.features;
        let frame = &self.last_frame;

        let bypass_pressed = bindings
            .switch_for(SwitchAction::Bypass)
            .is_some_and(|slot| frame.is_pressed(slot));
        let tap_pressed = bindings
            .switch_for(SwitchAction::TapTempo)
            .is_some_and(|slot| frame.is_pressed(slot));

        let lfo = (features.lfo_led && self.engaged).then(|| self.chorus.lfo_value());
        let period_ms = features
            .tap_blink
            .then(|| (self.delay_time.value() * 1000.0).round() as u32);

        Indicators {
            bypass: Indicators::bypass_led(self.engaged || bypass_pressed, lfo),
            tap: Indicators::tap_led(tap_pressed, frame.now_ms, period_ms),
        }
    }

    /// Silence all audio state. Control state and parameter targets stay.
    pub fn reset(&mut self) {
        self.chorus.reset();
        for filter in self.cut.iter_mut().chain(self.boost.iter_mut()).chain(self.high_pass.iter_mut()) {
            filter.reset();
        }
        for tone in self.tone.iter_mut() {
            tone.reset();
        }
        self.delay_time.set_value(self.delay_time.target());
        self.depth.set_value(self.depth.target());
    }

    pub fn config(&self) -> &PedalConfig {
        &self.config
    }

    pub fn chorus(&self) -> &Chorus {
        &self.chorus
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn set_engaged(&mut self, engaged: bool) {
        self.engaged = engaged;
    }

    pub fn mix(&self) -> f32 {
        self.mixer.mix()
    }

    /// Current mix bell value.
    pub fn mix_scale(&self) -> f32 {
        self.mix_scale
    }

    /// Wet-path shelf gain in dB (negative: a cut).
    pub fn cut_gain_db(&self) -> f32 {
        self.cut[0].gain()
    }

    /// Dry-path shelf gain in dB.
    pub fn boost_gain_db(&self) -> f32 {
        self.boost[0].gain()
    }

    pub fn tone_hz(&self) -> f32 {
        self.tone[0].cutoff()
    }

    /// Delay time the smoother is heading for, in seconds.
    pub fn delay_target(&self) -> f32 {
        self.delay_time.target()
    }

    pub fn delay_time(&self) -> f32 {
        self.delay_time.value()
    }

    pub fn depth_target(&self) -> f32 {
        self.depth.target()
    }

    pub fn num_voices(&self) -> usize {
        self.chorus.num_voices()
    }

    pub fn is_double_voice(&self) -> bool {
        self.double_voice
    }

    pub fn is_high_pass_on(&self) -> bool {
        self.high_pass_on
    }
}
