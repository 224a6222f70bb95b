//! Channel table - one row per oscillator

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use binaural_dsp::ChannelView;

/// Channel parameter the arrow keys adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Volume,
    LfoRate,
    LfoDepth,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Volume => Field::LfoRate,
            Field::LfoRate => Field::LfoDepth,
            Field::LfoDepth => Field::Volume,
        }
    }
}

pub fn render_channels(
    frame: &mut Frame,
    area: Rect,
    channels: &[ChannelView],
    selected: usize,
    field: Field,
) {
    let block = Block::default().title(" Channels ").borders(Borders::ALL);

    let header = Row::new(vec![
        "", "Channel", "Ratio", "Freq Hz", "Beat Hz", "Vol", "LFO Hz", "Depth", "", "Gain",
    ])
    .style(Style::default().fg(Color::DarkGray));

    let rows = channels.iter().map(|channel| {
        let is_selected = channel.index == selected;
        let editable = |cell_field: Field, text: String| {
            let style = if is_selected && field == cell_field {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Cell::from(text).style(style)
        };

        let row_style = if channel.muted {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        Row::new(vec![
            Cell::from(if is_selected { "▶" } else { " " }),
            Cell::from(channel.label.clone()),
            Cell::from(format!("{:.2}", channel.ratio)),
            Cell::from(format!("{:.2}", channel.frequency_hz)),
            Cell::from(format!("{:.2}", channel.beat_frequency_hz)),
            editable(Field::Volume, format!("{:.2}", channel.base_volume)),
            editable(Field::LfoRate, format!("{:.2}", channel.lfo_rate)),
            editable(Field::LfoDepth, format!("{:.2}", channel.lfo_depth)),
            Cell::from(if channel.muted { "MUTE" } else { "" }),
            Cell::from(gain_bar(channel.gain)).style(Style::default().fg(Color::Green)),
        ])
        .style(row_style)
    });

    let widths = [
        Constraint::Length(2),
        Constraint::Min(8),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

/// Ten-cell meter for a gain in [0, 1].
fn gain_bar(gain: f32) -> String {
    let filled = (gain.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "·".repeat(10 - filled))
}
