//! Transport bar widget - tempo, master, play state and output levels

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use binaural_dsp::{dsp::amplify, engine::Engine, io::AudioPrimitives, TickReport};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        Self {
            peak: amplify::peak(buffer),
            rms: amplify::rms(buffer),
        }
    }
}

/// Render the transport bar. `device` is `(sample_rate, channels)` once
/// audio is open.
pub fn render_transport<P: AudioPrimitives>(
    frame: &mut Frame,
    area: Rect,
    engine: &Engine<P>,
    report: &TickReport,
    stats: &AudioStats,
    device: Option<(f32, usize)>,
) {
    let block = Block::default().title(" binaural ").borders(Borders::ALL);

    let (play_symbol, play_state, play_color) = if !engine.is_ready() {
        ("■", "No audio", Color::DarkGray)
    } else if engine.is_playing() {
        ("▶", "Playing", Color::Green)
    } else {
        ("⏸", "Paused", Color::Yellow)
    };

    let master = if engine.master_muted() {
        "Master: MUTED  ".to_string()
    } else {
        format!("Master: {:.2}  ", report.master_volume)
    };

    let mut spans = vec![
        Span::styled(
            format!(" BPM: {:.0} ({:.2} Hz)  ", engine.bpm(), engine.tempo().beat_hz()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Root: {:.1} Hz  ", engine.root_hz()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{play_symbol} {play_state}  "),
            Style::default().fg(play_color),
        ),
        Span::styled(master, Style::default().fg(Color::White)),
        Span::styled(
            format!("Zoom: x{:.2}  ", engine.time_scale()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Some((sample_rate, channels)) = device {
        spans.push(Span::styled(
            format!("{:.1}kHz/{}ch  ", sample_rate / 1000.0, channels),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::styled(
        format!("Peak: {:.2}  RMS: {:.2}  ", stats.peak, stats.rms),
        Style::default().fg(Color::Magenta),
    ));

    if report.scope.clipping {
        spans.push(Span::styled(
            format!("CLIPPING ({}) ", engine.guard_corrections()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if report.resetting {
        spans.push(Span::styled(
            "RESET ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
