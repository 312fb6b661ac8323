//! Pedal configuration: tuning constants, control bindings and feature flags.
//!
//! A [`PedalConfig`] is built once on the control side, validated, and handed
//! to [`ChorusPedal::new`](crate::pedal::ChorusPedal::new). Nothing in here
//! is read again after construction except the binding table, which the
//! pedal consults once per block.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::chorus::DelayRange;
use crate::dsp::mix::MixCurve;
use crate::io::{KNOB_COUNT, SWITCH_COUNT};

/// Pedal parameter a knob slot drives.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobParam {
    /// Wet/dry blend; also scales the cut/boost shelves.
    Mix,
    /// Wet-path low-pass cutoff.
    Tone,
    /// Chorus delay time across the delay range.
    Delay,
    Feedback,
    /// LFO rate.
    Rate,
    /// LFO depth.
    Depth,
    /// Active voice count, `1..=max_voices`.
    Voices,
}

/// What a switch slot does.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    /// Rising edge toggles the effect in and out.
    Bypass,
    /// Successive rising edges set the delay time.
    TapTempo,
    /// Held: two voices and reduced feedback.
    DoubleVoice,
    /// Held: depth multiplied far past its clamp.
    DepthWarp,
    /// Held: wet-path high-pass engaged. Needs [`Features::high_pass`].
    HighPass,
}

/// Which physical control slot maps to which parameter or action.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlBindings {
    pub knobs: [Option<KnobParam>; KNOB_COUNT],
    pub switches: [Option<SwitchAction>; SWITCH_COUNT],
}

impl ControlBindings {
    /// Six knobs in a row, footswitches 0/1 for bypass and tap, toggles 4/5
    /// for voice doubling and depth warp.
    pub fn petal() -> Self {
        let mut switches = [None; SWITCH_COUNT];
        switches[0] = Some(SwitchAction::Bypass);
        switches[1] = Some(SwitchAction::TapTempo);
        switches[4] = Some(SwitchAction::DoubleVoice);
        switches[5] = Some(SwitchAction::DepthWarp);

        Self {
            knobs: [
                Some(KnobParam::Mix),
                Some(KnobParam::Tone),
                Some(KnobParam::Delay),
                Some(KnobParam::Feedback),
                Some(KnobParam::Rate),
                Some(KnobParam::Depth),
            ],
            switches,
        }
    }

    /// Two rows of three knobs, footswitches on slots 4/5, three toggles.
    ///
    /// ```text
    ///   knob 0 Mix     knob 2 Tone    knob 4 Delay
    ///   knob 1 Feedback knob 3 Rate   knob 5 Depth
    /// ```
    pub fn terrarium() -> Self {
        let mut switches = [None; SWITCH_COUNT];
        switches[0] = Some(SwitchAction::HighPass);
        switches[1] = Some(SwitchAction::DepthWarp);
        switches[2] = Some(SwitchAction::DoubleVoice);
        switches[4] = Some(SwitchAction::Bypass);
        switches[5] = Some(SwitchAction::TapTempo);

        Self {
            knobs: [
                Some(KnobParam::Mix),
                Some(KnobParam::Feedback),
                Some(KnobParam::Tone),
                Some(KnobParam::Rate),
                Some(KnobParam::Delay),
                Some(KnobParam::Depth),
            ],
            switches,
        }
    }

    pub fn knob_for(&self, param: KnobParam) -> Option<usize> {
        self.knobs.iter().position(|&k| k == Some(param))
    }

    pub fn switch_for(&self, action: SwitchAction) -> Option<usize> {
        self.switches.iter().position(|&s| s == Some(action))
    }
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self::petal()
    }
}

/// Optional behaviours that differ between hardware builds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    /// A high-pass filter on the wet path, switchable by [`SwitchAction::HighPass`].
    pub high_pass: bool,
    /// The bypass LED pulses with the chorus LFO while engaged.
    pub lfo_led: bool,
    /// The tap LED blinks at the current delay period.
    pub tap_blink: bool,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PedalConfig {
    pub sample_rate: f32,
    /// Ramp length for the delay and depth smoothers, in seconds.
    pub smoothing_secs: f32,
    pub delay_range: DelayRange,
    /// Tone knob range for the wet low-pass cutoff, quadratic taper.
    pub tone_min_hz: f32,
    pub tone_max_hz: f32,
    /// Rate knob range for the LFO, quadratic taper.
    pub rate_min_hz: f32,
    pub rate_max_hz: f32,
    /// Corner of the cut/boost low shelves.
    pub shelf_cutoff_hz: f32,
    pub shelf_q: f32,
    /// Shelf gain at an even mix; the mix bell scales it toward zero at the
    /// extremes.
    pub shelf_gain_db: f32,
    pub high_pass_hz: f32,
    pub clip_threshold: f32,
    pub mix_curve: MixCurve,
    /// Voices before any switch or knob changes it.
    pub initial_voices: usize,
    pub bindings: ControlBindings,
    pub features: Features,
}

impl PedalConfig {
    /// Six-knob layout with LED extras off.
    pub fn petal(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            smoothing_secs: 0.025,
            delay_range: DelayRange::default(),
            tone_min_hz: 800.0,
            tone_max_hz: 20_000.0,
            rate_min_hz: 0.1,
            rate_max_hz: 10.0,
            shelf_cutoff_hz: 250.0,
            shelf_q: 0.707,
            shelf_gain_db: 6.0,
            high_pass_hz: 100.0,
            clip_threshold: 0.8,
            mix_curve: MixCurve::Sqrt,
            initial_voices: 1,
            bindings: ControlBindings::petal(),
            features: Features::default(),
        }
    }

    /// Two-row layout with the switchable high-pass and both LED extras.
    pub fn terrarium(sample_rate: f32) -> Self {
        Self {
            bindings: ControlBindings::terrarium(),
            features: Features {
                high_pass: true,
                lfo_led: true,
                tap_blink: true,
            },
            ..Self::petal(sample_rate)
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn with_bindings(mut self, bindings: ControlBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }

        // A ramp must span at least one sample.
        if !(self.smoothing_secs.is_finite() && self.smoothing_secs * self.sample_rate >= 0.5) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing_secs));
        }

        let range = &self.delay_range;
        check_range("delay", range.min, range.max)?;
        if range.min < 0.0 || !(range.channel_offset.is_finite() && range.channel_offset >= 0.0) {
            return Err(ConfigError::InvalidRange {
                name: "delay",
                min: range.min,
                max: range.max,
            });
        }
        check_range("tone", self.tone_min_hz, self.tone_max_hz)?;
        check_range("rate", self.rate_min_hz, self.rate_max_hz)?;

        let nyquist = self.sample_rate * 0.5;
        for (name, hz) in [
            ("shelf_cutoff_hz", self.shelf_cutoff_hz),
            ("high_pass_hz", self.high_pass_hz),
            ("tone_min_hz", self.tone_min_hz),
        ] {
            if !(hz.is_finite() && hz > 0.0 && hz < nyquist) {
                return Err(ConfigError::InvalidFrequency { name, hz });
            }
        }

        if self.initial_voices == 0 {
            return Err(ConfigError::InvalidVoices(self.initial_voices));
        }

        if !self.features.high_pass && self.bindings.switch_for(SwitchAction::HighPass).is_some() {
            return Err(ConfigError::MissingFeature {
                action: SwitchAction::HighPass,
                feature: "high_pass",
            });
        }

        Ok(())
    }
}

impl Default for PedalConfig {
    fn default() -> Self {
        Self::petal(48_000.0)
    }
}

fn check_range(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { name, min, max })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidSampleRate(f32),
    InvalidSmoothing(f32),
    InvalidRange { name: &'static str, min: f32, max: f32 },
    InvalidFrequency { name: &'static str, hz: f32 },
    InvalidVoices(usize),
    MissingFeature { action: SwitchAction, feature: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSampleRate(sr) => {
                write!(f, "sample rate must be positive and finite, got {sr}")
            }
            ConfigError::InvalidSmoothing(secs) => {
                write!(f, "smoothing time must cover at least one sample, got {secs}s")
            }
            ConfigError::InvalidRange { name, min, max } => {
                write!(f, "{name} range is invalid: min {min}, max {max}")
            }
            ConfigError::InvalidFrequency { name, hz } => {
                write!(f, "{name} must lie between 0 Hz and Nyquist, got {hz} Hz")
            }
            ConfigError::InvalidVoices(voices) => {
                write!(f, "initial voice count must be at least 1, got {voices}")
            }
            ConfigError::MissingFeature { action, feature } => {
                write!(f, "switch action {action:?} is bound but feature `{feature}` is disabled")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
