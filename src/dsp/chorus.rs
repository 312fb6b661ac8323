use super::multitap::MultitapDelay;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Stereo Chorus
=============

Two multi-tap delays, one per channel, driven from a single set of
controls. The channels differ in three ways so the image opens up instead
of collapsing to mono:

  1. Tap spread: each channel draws its spread from a different seed
     (666 left, 333 right), so the taps sit at different offsets.
  2. Depth: the right channel's depth is negated. Its LFO sweeps the
     opposite way, so while the left voice bends sharp the right bends flat.
  3. Delay: the right channel runs a fixed offset (2 ms by default) longer.

    in_l ──► MultitapDelay(seed 666, +depth, d)          ──► out_l
    in_r ──► MultitapDelay(seed 333, -depth, d + offset) ──► out_r

The chorus returns raw per-channel outputs. Cross-feeding the channels and
blending with the dry signal are left to the caller.

Delay range
-----------

`set_delay_time(t)` maps a normalized control onto the configured range:

    seconds = min + t · (max - min)        default 5 ms .. 25 ms

Values outside `[0, 1]` are accepted and end up clamped by the delay lines
to `[0, max_delay()]`.
*/

/// Number of taps (voices) per channel.
pub const CHORUS_TAPS: usize = 8;
/// Delay buffer length per channel in samples.
pub const CHORUS_CAPACITY: usize = 48_000;

const LEFT_SEED: u32 = 666;
const RIGHT_SEED: u32 = 333;

type ChannelDelay = MultitapDelay<CHORUS_TAPS, CHORUS_CAPACITY>;

/// Normalized delay control mapping, in seconds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    pub min: f32,
    pub max: f32,
    /// Extra delay on the right channel.
    pub channel_offset: f32,
}

impl DelayRange {
    pub fn seconds(&self, normalized: f32) -> f32 {
        self.min + normalized * (self.max - self.min)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: 0.005,
            max: 0.025,
            channel_offset: 0.002,
        }
    }
}

pub struct Chorus {
    channels: [ChannelDelay; 2],
    range: DelayRange,
    sample_rate: f32,
}

impl Chorus {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_range(sample_rate, DelayRange::default())
    }

    pub fn with_range(sample_rate: f32, range: DelayRange) -> Self {
        Self::with_seeds(sample_rate, range, [LEFT_SEED, RIGHT_SEED])
    }

    /// Spread seeds per channel, left then right. Equal seeds and a zero
    /// channel offset leave depth as the only difference between channels.
    pub fn with_seeds(sample_rate: f32, range: DelayRange, seeds: [u32; 2]) -> Self {
        let [left_seed, right_seed] = seeds;
        let mut chorus = Self {
            channels: [
                ChannelDelay::new(sample_rate, left_seed),
                ChannelDelay::new(sample_rate, right_seed),
            ],
            range,
            sample_rate,
        };
        chorus.set_delay_time(0.5);
        chorus
    }

    /// Process one sample on `channel` (0 = left, anything else = right).
    #[inline]
    pub fn process(&mut self, sample: f32, channel: usize) -> f32 {
        self.channels[channel.min(1)].process(sample)
    }

    #[inline]
    pub fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let [l, r] = &mut self.channels;
        (l.process(left), r.process(right))
    }

    pub fn reset(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.reset();
        }
    }

    /// Normalized delay in `[0, 1]` mapped through the delay range.
    pub fn set_delay_time(&mut self, normalized: f32) {
        self.set_delay_time_secs(self.range.seconds(normalized));
    }

    /// Absolute delay in seconds for the left channel; the right channel
    /// adds the range's channel offset.
    pub fn set_delay_time_secs(&mut self, seconds: f32) {
        let [l, r] = &mut self.channels;
        l.set_delay_time(seconds);
        r.set_delay_time(seconds + self.range.channel_offset);
    }

    pub fn set_delay_range(&mut self, range: DelayRange) {
        self.range = range;
    }

    pub fn delay_range(&self) -> DelayRange {
        self.range
    }

    /// Shortest delay the normalized control reaches, in seconds.
    pub fn min_delay(&self) -> f32 {
        self.range.min
    }

    /// Longest delay the lines can hold, in seconds.
    pub fn max_delay(&self) -> f32 {
        self.channels[0].max_delay() as f32 / self.sample_rate
    }

    pub fn max_voices(&self) -> usize {
        self.channels[0].max_num_taps()
    }

    /// Modulation depth; the right channel receives the negated value.
    pub fn set_depth(&mut self, depth: f32) {
        let [l, r] = &mut self.channels;
        l.set_depth(depth);
        r.set_depth(-depth);
    }

    pub fn set_rate(&mut self, hz: f32) {
        for channel in self.channels.iter_mut() {
            channel.set_rate(hz);
        }
    }

    pub fn set_feedback_level(&mut self, feedback: f32) {
        for channel in self.channels.iter_mut() {
            channel.set_feedback_level(feedback);
        }
    }

    pub fn set_num_voices(&mut self, voices: usize) {
        for channel in self.channels.iter_mut() {
            channel.set_num_active_taps(voices);
        }
    }

    pub fn num_voices(&self) -> usize {
        self.channels[0].num_active_taps()
    }

    pub fn depth(&self) -> f32 {
        self.channels[0].depth()
    }

    pub fn rate(&self) -> f32 {
        self.channels[0].rate()
    }

    pub fn feedback_level(&self) -> f32 {
        self.channels[0].feedback_level()
    }

    /// Left-channel delay in samples.
    pub fn delay_samples(&self) -> f32 {
        self.channels[0].delay_samples()
    }

    /// Access one channel's delay line state.
    pub fn channel(&self, channel: usize) -> &MultitapDelay<CHORUS_TAPS, CHORUS_CAPACITY> {
        &self.channels[channel.min(1)]
    }

    /// Left-channel LFO sample from the most recent tick, in `[-depth, depth]`.
    pub fn lfo_value(&self) -> f32 {
        self.channels[0].last_modulation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    fn sine(i: usize, hz: f32) -> f32 {
        (std::f32::consts::TAU * hz * i as f32 / SR).sin()
    }

    #[test]
    fn test_default_range() {
        let range = DelayRange::default();
        assert_eq!(range.seconds(0.0), 0.005);
        assert!((range.seconds(1.0) - 0.025).abs() < 1e-7);
        assert!((range.seconds(0.5) - 0.015).abs() < 1e-7);
    }

    #[test]
    fn test_right_channel_offset() {
        let mut chorus = Chorus::new(SR);
        chorus.set_delay_time_secs(0.010);
        assert!((chorus.channel(0).delay_samples() - 480.0).abs() < 1e-2);
        assert!((chorus.channel(1).delay_samples() - 576.0).abs() < 1e-2);
    }

    #[test]
    fn test_depth_mirrored() {
        let mut chorus = Chorus::new(SR);
        chorus.set_depth(0.7);
        assert_eq!(chorus.channel(0).depth(), 0.7);
        assert_eq!(chorus.channel(1).depth(), -0.7);

        chorus.set_depth(5.0);
        assert_eq!(chorus.channel(0).depth(), 1.0);
        assert_eq!(chorus.channel(1).depth(), -1.0);
    }

    #[test]
    fn test_setters_fan_out() {
        let mut chorus = Chorus::new(SR);
        chorus.set_rate(2.5);
        chorus.set_feedback_level(0.3);
        chorus.set_num_voices(3);
        for ch in 0..2 {
            assert_eq!(chorus.channel(ch).rate(), 2.5);
            assert_eq!(chorus.channel(ch).feedback_level(), 0.3);
            assert_eq!(chorus.channel(ch).num_active_taps(), 3);
        }
    }

    #[test]
    fn test_max_delay_and_voices() {
        let chorus = Chorus::new(SR);
        assert!((chorus.max_delay() - 0.5).abs() < 1e-6);
        assert_eq!(chorus.min_delay(), 0.005);
        assert_eq!(chorus.max_voices(), CHORUS_TAPS);
    }

    /// Max |l - r| after the first 100 ms of a 440 Hz sine on both inputs.
    fn channel_divergence(chorus: &mut Chorus) -> f32 {
        let mut max_diff = 0.0f32;
        for i in 0..SR as usize {
            let x = sine(i, 440.0);
            let (l, r) = chorus.process_stereo(x, x);
            if i > 4_800 {
                max_diff = max_diff.max((l - r).abs());
            }
        }
        max_diff
    }

    fn matched_channels() -> Chorus {
        let range = DelayRange {
            channel_offset: 0.0,
            ..DelayRange::default()
        };
        let mut chorus = Chorus::with_seeds(SR, range, [LEFT_SEED, LEFT_SEED]);
        chorus.set_rate(1.0);
        chorus
    }

    #[test]
    fn test_matched_channels_agree_without_depth() {
        let mut chorus = matched_channels();
        chorus.set_depth(0.0);
        assert_eq!(channel_divergence(&mut chorus), 0.0);
    }

    #[test]
    fn test_mirrored_depth_decorrelates() {
        let mut chorus = matched_channels();
        chorus.set_depth(0.5);
        let diff = channel_divergence(&mut chorus);
        assert!(diff > 0.1, "channels too similar: {diff}");
    }

    #[test]
    fn test_default_seeds_differ() {
        let mut chorus = Chorus::new(SR);
        chorus.set_depth(0.0);
        assert!(channel_divergence(&mut chorus) > 0.0);
    }

    #[test]
    fn test_process_matches_process_stereo() {
        let mut a = Chorus::new(SR);
        let mut b = Chorus::new(SR);
        for i in 0..2048 {
            let x = sine(i, 220.0);
            let (l, r) = a.process_stereo(x, -x);
            assert_eq!(l, b.process(x, 0));
            assert_eq!(r, b.process(-x, 1));
        }
    }

    #[test]
    fn test_custom_range() {
        let mut chorus = Chorus::with_range(
            SR,
            DelayRange {
                min: 0.001,
                max: 0.002,
                channel_offset: 0.0,
            },
        );
        chorus.set_delay_time(1.0);
        assert!((chorus.channel(0).delay_samples() - 96.0).abs() < 1e-2);
        assert_eq!(
            chorus.channel(0).delay_samples(),
            chorus.channel(1).delay_samples()
        );
    }

    #[test]
    fn test_reset_silences() {
        let mut chorus = Chorus::new(SR);
        chorus.set_feedback_level(0.5);
        for i in 0..4096 {
            chorus.process_stereo(sine(i, 330.0), sine(i, 330.0));
        }
        chorus.reset();
        assert_eq!(chorus.lfo_value(), 0.0);
        for _ in 0..4096 {
            assert_eq!(chorus.process_stereo(0.0, 0.0), (0.0, 0.0));
        }
    }
}
