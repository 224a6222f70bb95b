//! Oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use binaural_dsp::engine::ScopeFrame;

/// Render a sampled scope frame. Points are already in the unit viewport.
pub fn render_waveform(frame: &mut Frame, area: Rect, scope: &ScopeFrame, time_scale: f32) {
    let title = if scope.idle {
        " Oscilloscope (idle) ".to_string()
    } else {
        format!(" Oscilloscope x{time_scale:.2} ")
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let data: Vec<(f64, f64)> = scope.points.iter().map(|p| (p.x, p.y)).collect();

    let color = if scope.clipping {
        Color::Red
    } else if scope.idle {
        Color::DarkGray
    } else {
        Color::Cyan
    };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
