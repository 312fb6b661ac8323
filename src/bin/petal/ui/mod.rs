//! TUI module for petal
//!
//! The terminal plays the pedal's enclosure: keys turn knobs and press
//! switches, the screen shows knob positions, LEDs, a scope and a spectrum.

mod knobs;
mod spectrum;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::{Duration, Instant};

use petal_chorus::{
    config::{ControlBindings, SwitchAction},
    io::{ControlFrame, ControlSurface, Indicators, KNOB_COUNT},
};

use knobs::{render_knobs, render_leds};
use spectrum::{render_spectrum, SpectrumAnalyzer};
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Knob movement per key press
const KNOB_STEP: f32 = 0.05;
const FINE_KNOB_STEP: f32 = 0.01;

pub struct PetalUi {
    surface: ControlSurface,
    bindings: ControlBindings,
    control_tx: Producer<ControlFrame>,
    audio_rx: Consumer<[f32; 2]>,
    leds_rx: Consumer<Indicators>,
    leds: Indicators,
    /// Latest output frames, left/right.
    audio_buffer: Vec<[f32; 2]>,
    /// Mono sum of `audio_buffer` for the analyzer.
    mono: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    selected: usize,
    started: Instant,
    layout_name: &'static str,
    source_name: &'static str,
    should_quit: bool,
}

impl PetalUi {
    pub fn new(
        control_tx: Producer<ControlFrame>,
        audio_rx: Consumer<[f32; 2]>,
        leds_rx: Consumer<Indicators>,
        bindings: ControlBindings,
        sample_rate: f32,
    ) -> Self {
        Self {
            surface: ControlSurface::for_bindings(&bindings),
            bindings,
            control_tx,
            audio_rx,
            leds_rx,
            leds: Indicators::default(),
            audio_buffer: vec![[0.0; 2]; VIS_BUFFER_SIZE],
            mono: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            selected: 0,
            started: Instant::now(),
            layout_name: "",
            source_name: "",
            should_quit: false,
        }
    }

    pub fn with_labels(mut self, layout_name: &'static str, source_name: &'static str) -> Self {
        self.layout_name = layout_name;
        self.source_name = source_name;
        self
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_leds();

            // One full snapshot per tick; held back edges go out next tick.
            let now_ms = self.started.elapsed().as_millis() as u32;
            self.surface.push(&mut self.control_tx, now_ms);

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Poll for new output frames from ring buffer
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(frame) = self.audio_rx.pop() {
            self.audio_buffer.push(frame);
            received = true;
        }

        if received {
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
            self.mono.clear();
            self.mono.extend(self.audio_buffer.iter().map(|[l, r]| 0.5 * (l + r)));
            self.spectrum.update(&self.mono);
        }
    }

    /// Keep only the latest LED state
    fn poll_leds(&mut self) {
        while let Ok(leds) = self.leds_rx.pop() {
            self.leds = leds;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(c @ '1'..='6') => {
                self.selected = (c as usize - '1' as usize).min(KNOB_COUNT - 1);
            }
            KeyCode::Tab => self.selected = (self.selected + 1) % KNOB_COUNT,
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
                self.surface.nudge_knob(self.selected, KNOB_STEP);
            }
            KeyCode::Left | KeyCode::Char('-') => {
                self.surface.nudge_knob(self.selected, -KNOB_STEP);
            }
            KeyCode::Up => self.surface.nudge_knob(self.selected, FINE_KNOB_STEP),
            KeyCode::Down => self.surface.nudge_knob(self.selected, -FINE_KNOB_STEP),
            KeyCode::Char(' ') => self.tap(SwitchAction::Bypass),
            KeyCode::Char('t') => self.tap(SwitchAction::TapTempo),
            KeyCode::Char('v') => self.toggle(SwitchAction::DoubleVoice),
            KeyCode::Char('w') => self.toggle(SwitchAction::DepthWarp),
            KeyCode::Char('h') => self.toggle(SwitchAction::HighPass),
            _ => {}
        }
    }

    fn tap(&mut self, action: SwitchAction) {
        if let Some(slot) = self.bindings.switch_for(action) {
            self.surface.tap(slot);
        }
    }

    fn toggle(&mut self, action: SwitchAction) {
        if let Some(slot) = self.bindings.switch_for(action) {
            self.surface.toggle(slot);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // LEDs and switches
                Constraint::Length(8),  // Knobs
                Constraint::Min(6),     // Scope + spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        render_leds(frame, chunks[0], &self.leds, &self.surface, &self.bindings, self.layout_name);
        render_knobs(frame, chunks[1], &self.surface, &self.bindings, self.selected);

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, scopes[0], &self.audio_buffer, self.source_name);
        render_spectrum(frame, scopes[1], self.spectrum.data());

        let help = Paragraph::new(
            " [1-6/Tab] Knob  [←/→] Turn  [↑/↓] Fine  [Space] Bypass  [T] Tap  [V] Voices  [W] Warp  [H] High-pass  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
