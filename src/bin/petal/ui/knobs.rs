//! Knob gauges, LEDs and switch states

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use petal_chorus::{
    config::{ControlBindings, KnobParam, SwitchAction},
    io::{ControlSurface, Indicators, KNOB_COUNT},
};

fn knob_label(param: Option<KnobParam>) -> &'static str {
    match param {
        Some(KnobParam::Mix) => "Mix",
        Some(KnobParam::Tone) => "Tone",
        Some(KnobParam::Delay) => "Delay",
        Some(KnobParam::Feedback) => "Feedback",
        Some(KnobParam::Rate) => "Rate",
        Some(KnobParam::Depth) => "Depth",
        Some(KnobParam::Voices) => "Voices",
        None => "-",
    }
}

fn switch_label(action: SwitchAction) -> &'static str {
    match action {
        SwitchAction::Bypass => "Bypass",
        SwitchAction::TapTempo => "Tap",
        SwitchAction::DoubleVoice => "Voices x2",
        SwitchAction::DepthWarp => "Warp",
        SwitchAction::HighPass => "High-pass",
    }
}

/// LED intensity as a red shade
fn led_span(label: &str, intensity: f32) -> Span<'static> {
    let level = (intensity.clamp(0.0, 1.0) * 255.0) as u8;
    let color = Color::Rgb(level.max(40), level / 6, level / 6);
    Span::styled(format!(" ● {label} "), Style::default().fg(color))
}

/// Render the footswitch LEDs and held toggles
pub fn render_leds(
    frame: &mut Frame,
    area: Rect,
    leds: &Indicators,
    surface: &ControlSurface,
    bindings: &ControlBindings,
    layout_name: &str,
) {
    let block = Block::default()
        .title(format!(" petal chorus ({layout_name}) "))
        .borders(Borders::ALL);

    let mut spans = vec![led_span("Bypass", leds.bypass), led_span("Tap", leds.tap), Span::raw("  ")];

    for (slot, action) in bindings.switches.iter().enumerate() {
        let Some(action) = action else { continue };
        if matches!(action, SwitchAction::Bypass | SwitchAction::TapTempo) {
            continue;
        }
        let style = if surface.is_pressed(slot) {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[{}] ", switch_label(*action)), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Render one gauge per knob slot
pub fn render_knobs(frame: &mut Frame, area: Rect, surface: &ControlSurface, bindings: &ControlBindings, selected: usize) {
    let block = Block::default().title(" Knobs ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); KNOB_COUNT])
        .split(inner);

    for (slot, row) in rows.iter().enumerate() {
        let value = surface.knob(slot);
        let color = if slot == selected { Color::LightCyan } else { Color::Blue };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(value.clamp(0.0, 1.0) as f64)
            .label(format!("{} {:<8} {:>3.0}%", slot + 1, knob_label(bindings.knobs[slot]), value * 100.0));
        frame.render_widget(gauge, *row);
    }
}
