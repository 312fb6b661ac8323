//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the output, read at log-spaced frequencies and
//! plotted on a log-frequency axis so the tone and shelf filters read as
//! straight slopes.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of points on the plotted curve
const SPECTRUM_POINTS: usize = 64;
const MIN_FREQ_HZ: f32 = 20.0;
const FLOOR_DB: f64 = -100.0;
/// Per-update fall of a decaying peak, in dB
const RELEASE_DB: f64 = 3.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// FFT bin read for each plotted point
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 Hz, dB) per plotted point
    spectrum: Vec<(f64, f64)>,
    /// Normalizes a full-scale sine to about 0 dB
    scale_db: f64,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                if buffer_len > 1 {
                    let denom = (buffer_len - 1) as f32;
                    0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();
        let window_sum: f32 = window.iter().sum();

        let max_freq = (sample_rate / 2.0).min(20_000.0).max(MIN_FREQ_HZ + 1.0);
        let ratio = (max_freq / MIN_FREQ_HZ) as f64;
        let last_bin = (buffer_len / 2).saturating_sub(1);

        let mut bin_indices = Vec::with_capacity(SPECTRUM_POINTS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_POINTS);
        for i in 0..SPECTRUM_POINTS {
            let t = i as f64 / (SPECTRUM_POINTS - 1) as f64;
            let freq = MIN_FREQ_HZ as f64 * ratio.powf(t);
            let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
            bin_indices.push(index.clamp(1, last_bin.max(1)));
            spectrum.push((freq.log10(), FLOOR_DB));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
            scale_db: -20.0 * ((window_sum * 0.5).max(1e-6) as f64).log10(),
        }
    }

    /// Analyse a new block; ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for ((_, db), &index) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            let bin = self.scratch[index];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12) as f64;
            let level = (10.0 * power.log10() + self.scale_db).max(FLOOR_DB);
            // fast attack, slow release
            *db = level.max(*db - RELEASE_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum on a log-frequency axis
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let min_x = spectrum.first().map_or(1.3, |(x, _)| *x);
    let max_x = spectrum.last().map_or(4.3, |(x, _)| *x).max(min_x + 0.1);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 6.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
