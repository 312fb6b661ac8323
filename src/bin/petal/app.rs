//! Audio setup: device streams, cross-thread rings and the engine callback.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ratatui::DefaultTerminal;
use rtrb::{Consumer, PushError, RingBuffer};
use tracing::{info, warn};

use petal_chorus::{
    dsp::oscillator::{Oscillator, OscillatorWaveform},
    io::{ControlFrame, Indicators},
    ChorusPedal, PedalConfig, PedalEngine, MAX_BLOCK_SIZE,
};

use super::ui::{PetalUi, VIS_BUFFER_SIZE};

// Tunables
const AUDIO_RING_BLOCKS: usize = 16;
const CONTROL_RING_LEN: usize = 64;
const INDICATOR_RING_LEN: usize = 16;
/// Input ring holds this many seconds of stereo frames.
const INPUT_RING_SECS: f32 = 0.25;
const TEST_TONE_HZ: f32 = 220.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Petal,
    Terrarium,
}

impl Layout {
    pub fn config(self, sample_rate: f32) -> PedalConfig {
        match self {
            Layout::Petal => PedalConfig::petal(sample_rate),
            Layout::Terrarium => PedalConfig::terrarium(sample_rate),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Layout::Petal => "petal",
            Layout::Terrarium => "terrarium",
        }
    }
}

/// Where the pedal's input comes from.
enum Source {
    /// Stereo frames from the capture stream.
    Device(Consumer<[f32; 2]>),
    TestTone(Oscillator),
}

impl Source {
    fn next_frame(&mut self) -> (f32, f32) {
        match self {
            Source::Device(rx) => {
                let [l, r] = rx.pop().unwrap_or([0.0; 2]);
                (l, r)
            }
            Source::TestTone(osc) => {
                let s = osc.process();
                (s, s)
            }
        }
    }
}

pub fn run(mut terminal: DefaultTerminal, layout: Layout) -> EyreResult<()> {
    // --- Set up CPAL ---

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let pedal_config = layout.config(sample_rate);
    let bindings = pedal_config.bindings;
    let pedal = ChorusPedal::new(pedal_config).wrap_err("invalid pedal configuration")?;

    // --- Cross-thread rings ---
    let (control_tx, control_rx) = RingBuffer::<ControlFrame>::new(CONTROL_RING_LEN);
    let (audio_tx, audio_rx) = RingBuffer::<[f32; 2]>::new(VIS_BUFFER_SIZE * AUDIO_RING_BLOCKS);
    let (leds_tx, leds_rx) = RingBuffer::<Indicators>::new(INDICATOR_RING_LEN);

    // --- Input: capture device or test tone ---
    let (input_stream, mut source) = match open_input(&host, sample_rate)? {
        Some((stream, rx)) => (Some(stream), Source::Device(rx)),
        None => {
            let mut tone = Oscillator::new(sample_rate)
                .with_waveform(OscillatorWaveform::Triangle)
                .with_frequency(TEST_TONE_HZ);
            tone.set_amplitude(0.3);
            (None, Source::TestTone(tone))
        }
    };
    let input_name = match source {
        Source::Device(_) => "input device",
        Source::TestTone(_) => "test tone",
    };
    info!(sample_rate, channels, source = input_name, layout = layout.name(), "audio configured");

    // Buffers reused by the audio callback
    let mut in_l = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut in_r = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut out_l = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut out_r = vec![0.0f32; MAX_BLOCK_SIZE];

    // Move into callback
    let output_stream = device
        .build_output_stream(
            &config.into(),
            {
                let mut engine = PedalEngine::new(pedal, control_rx);
                let mut audio_tx = audio_tx;
                let mut leds_tx = leds_tx;
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;
                    while frames_written < total_frames {
                        let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                        for i in 0..frames_to_render {
                            let (l, r) = source.next_frame();
                            in_l[i] = l;
                            in_r[i] = r;
                        }

                        let leds = engine.process_block(
                            &in_l[..frames_to_render],
                            &in_r[..frames_to_render],
                            &mut out_l[..frames_to_render],
                            &mut out_r[..frames_to_render],
                        );

                        let out_off = frames_written * channels;
                        for i in 0..frames_to_render {
                            let frame = &mut data[out_off + i * channels..out_off + (i + 1) * channels];
                            write_frame(frame, out_l[i], out_r[i]);
                        }

                        // Stereo scope feed, non-blocking (drop on overflow)
                        for (&l, &r) in out_l[..frames_to_render].iter().zip(&out_r[..frames_to_render]) {
                            if let Err(PushError::Full(_)) = audio_tx.push([l, r]) {
                                break;
                            }
                        }
                        let _ = leds_tx.push(leds);

                        frames_written += frames_to_render;
                    }
                }
            },
            move |err| eprintln!("Stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    output_stream.play().wrap_err("failed to start output stream")?;
    if let Some(stream) = &input_stream {
        stream.play().wrap_err("failed to start input stream")?;
    }

    let mut ui = PetalUi::new(control_tx, audio_rx, leds_rx, bindings, sample_rate)
        .with_labels(layout.name(), input_name);
    ui.run(&mut terminal)
}

/// Stereo to any channel count: L/R on the first two, L elsewhere, the
/// average on mono devices.
fn write_frame(frame: &mut [f32], l: f32, r: f32) {
    match frame {
        [mono] => *mono = 0.5 * (l + r),
        [first, second, rest @ ..] => {
            *first = l;
            *second = r;
            rest.fill(l);
        }
        [] => {}
    }
}

/// Open the default capture device at `sample_rate`, if there is one.
fn open_input(host: &cpal::Host, sample_rate: f32) -> EyreResult<Option<(cpal::Stream, Consumer<[f32; 2]>)>> {
    let Some(device) = host.default_input_device() else {
        warn!("no input device; using test tone");
        return Ok(None);
    };
    let config = match device.default_input_config() {
        Ok(config) => config,
        Err(err) => {
            warn!(%err, "input device has no usable config; using test tone");
            return Ok(None);
        }
    };

    let input_rate = config.sample_rate().0 as f32;
    if input_rate != sample_rate {
        warn!(input_rate, output_rate = sample_rate, "input sample rate differs; using test tone");
        return Ok(None);
    }

    let channels = config.channels() as usize;
    let capacity = (sample_rate * INPUT_RING_SECS) as usize;
    let (mut tx, rx) = RingBuffer::<[f32; 2]>::new(capacity);

    let stream = device
        .build_input_stream(
            &config.into(),
            move |data: &[f32], _| {
                for frame in data.chunks(channels.max(1)) {
                    if tx.push(capture_frame(frame)).is_err() {
                        break;
                    }
                }
            },
            move |err| eprintln!("Input stream error: {err}"),
            None,
        )
        .wrap_err("failed to build input stream")?;

    Ok(Some((stream, rx)))
}

/// One capture frame as a stereo pair; mono devices feed both sides.
fn capture_frame(frame: &[f32]) -> [f32; 2] {
    match frame {
        [] => [0.0; 2],
        [mono] => [*mono; 2],
        [l, r, ..] => [*l, *r],
    }
}
