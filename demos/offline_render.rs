//! Render a test signal through the pedal without an audio device.
//!
//! Usage: cargo run --example offline_render [seconds]
//!
//! Sweeps the mix knob across the render, taps a tempo halfway through and
//! prints peak/RMS per second for each channel. Set RUST_LOG=debug to see
//! control-side logging.

use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use petal_chorus::{
    config::SwitchAction,
    dsp::oscillator::{Oscillator, OscillatorWaveform},
    io::ControlFrame,
    ChorusPedal, PedalConfig, PedalEngine, MAX_BLOCK_SIZE,
};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 256;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let seconds: f32 = match std::env::args().nth(1) {
        Some(arg) => arg.parse().wrap_err_with(|| format!("invalid duration: {arg}"))?,
        None => 4.0,
    };
    let total = (seconds.max(0.1) * SAMPLE_RATE) as usize;

    let pedal = ChorusPedal::new(PedalConfig::terrarium(SAMPLE_RATE)).wrap_err("invalid pedal configuration")?;
    let mut engine = PedalEngine::new(pedal, ());

    let mut source = Oscillator::new(SAMPLE_RATE)
        .with_waveform(OscillatorWaveform::Saw)
        .with_frequency(110.0);
    source.set_amplitude(0.4);

    let tap_slot = engine.pedal().config().bindings.switch_for(SwitchAction::TapTempo);
    let tap_at = [total / 2, total / 2 + (0.25 * SAMPLE_RATE) as usize];

    let mut input = vec![0.0f32; BLOCK.min(MAX_BLOCK_SIZE)];
    let mut out_l = vec![0.0f32; input.len()];
    let mut out_r = vec![0.0f32; input.len()];
    let mut stats = ChannelStats::default();

    let mut rendered = 0;
    while rendered < total {
        let len = (total - rendered).min(input.len());
        let now_ms = (rendered as f32 / SAMPLE_RATE * 1000.0) as u32;

        let mut frame = ControlFrame::default()
            .with_knob(0, rendered as f32 / total as f32)
            .at(now_ms);
        // Two taps 250ms apart around the middle of the render
        if let Some(slot) = tap_slot {
            if tap_at.iter().any(|t| (rendered..rendered + len).contains(t)) {
                frame = frame.with_rising(slot);
            }
        }
        engine.pedal_mut().apply_controls(&frame);

        for sample in input[..len].iter_mut() {
            *sample = source.process();
        }
        engine.process_block(&input[..len], &input[..len], &mut out_l[..len], &mut out_r[..len]);

        for (&l, &r) in out_l[..len].iter().zip(&out_r[..len]) {
            if let Some(line) = stats.push(l, r) {
                println!("{line}");
            }
        }
        rendered += len;
    }

    info!(
        blocks = engine.blocks_rendered(),
        delay_secs = engine.pedal().delay_time(),
        mix = engine.pedal().mix(),
        "render finished"
    );
    Ok(())
}

/// Per-second peak and RMS for both channels.
#[derive(Default)]
struct ChannelStats {
    second: usize,
    count: usize,
    peak: [f32; 2],
    energy: [f64; 2],
}

impl ChannelStats {
    fn push(&mut self, l: f32, r: f32) -> Option<String> {
        for (ch, s) in [l, r].into_iter().enumerate() {
            self.peak[ch] = self.peak[ch].max(s.abs());
            self.energy[ch] += (s as f64) * (s as f64);
        }
        self.count += 1;

        if self.count < SAMPLE_RATE as usize {
            return None;
        }

        let rms = self.energy.map(|e| (e / self.count as f64).sqrt());
        let line = format!(
            "{:>3}s  L peak {:.3} rms {:.3}  R peak {:.3} rms {:.3}",
            self.second, self.peak[0], rms[0], self.peak[1], rms[1]
        );
        *self = Self {
            second: self.second + 1,
            ..Self::default()
        };
        Some(line)
    }
}
