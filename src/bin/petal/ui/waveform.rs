//! Stereo output scope
//!
//! Left and right are drawn over each other. With the chorus engaged the
//! two traces drift apart as the mirrored LFOs sweep; bypassed with a mono
//! source they sit on one line.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

const LEFT_COLOR: Color = Color::Cyan;
const RIGHT_COLOR: Color = Color::Magenta;

/// One channel of `frames` as chart points, x normalized to `[0, 1)`.
fn channel_points(frames: &[[f32; 2]], channel: usize) -> Vec<(f64, f64)> {
    let step = 1.0 / frames.len().max(1) as f64;
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| (i as f64 * step, frame[channel.min(1)] as f64))
        .collect()
}

fn peak(frames: &[[f32; 2]], channel: usize) -> f32 {
    frames.iter().fold(0.0, |m, frame| m.max(frame[channel.min(1)].abs()))
}

pub fn render_waveform(frame: &mut Frame, area: Rect, frames: &[[f32; 2]], source_name: &str) {
    let left = channel_points(frames, 0);
    let right = channel_points(frames, 1);

    let title = format!(
        " Output ({source_name})  L {:.2}  R {:.2} ",
        peak(frames, 0),
        peak(frames, 1)
    );

    let datasets = vec![
        Dataset::default()
            .name("L")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(LEFT_COLOR))
            .data(&left),
        Dataset::default()
            .name("R")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(RIGHT_COLOR))
            .data(&right),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(Axis::default().bounds([0.0, 1.0]))
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(vec![Span::raw("-1"), Span::raw("0"), Span::raw("1")])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_split() {
        let frames = [[0.5, -0.5], [0.25, 1.0]];
        assert_eq!(channel_points(&frames, 0), vec![(0.0, 0.5), (0.5, 0.25)]);
        assert_eq!(channel_points(&frames, 1), vec![(0.0, -0.5), (0.5, 1.0)]);
        assert_eq!(peak(&frames, 0), 0.5);
        assert_eq!(peak(&frames, 1), 1.0);
    }

    #[test]
    fn test_empty_buffer() {
        assert!(channel_points(&[], 0).is_empty());
        assert_eq!(peak(&[], 1), 0.0);
    }
}
