//! Spectrum widget
//!
//! Hann-windowed FFT of the analyser frame, folded into log-spaced bands over
//! the audible tone range.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of displayed bands
const BANDS: usize = 48;
const MIN_HZ: f64 = 20.0;
/// Roots top out at 2 kHz; leave headroom for the beat offsets.
const MAX_HZ: f64 = 4_000.0;
const FLOOR_DB: f64 = -100.0;

/// FFT bins `[start, end)` summarised by one band.
#[derive(Debug, Clone, Copy)]
struct Band {
    center_hz: f64,
    start: usize,
    end: usize,
}

pub struct Spectrum {
    window: Vec<f32>,
    bands: Vec<Band>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 of band center, magnitude in dB)
    points: Vec<(f64, f64)>,
    bin_hz: f64,
    /// Frequency of the strongest bin on the last update.
    dominant_hz: Option<f64>,
}

impl Spectrum {
    pub fn new(frame_len: usize, sample_rate: f32) -> Self {
        let frame_len = frame_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(frame_len);

        let denom = (frame_len - 1) as f32;
        let window = (0..frame_len)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();

        let bin_hz = sample_rate as f64 / frame_len as f64;
        let half = frame_len / 2;
        let max_hz = MAX_HZ.min(sample_rate as f64 / 2.0).max(MIN_HZ * 2.0);
        let ratio = max_hz / MIN_HZ;

        let edge = |i: usize| MIN_HZ * ratio.powf(i as f64 / BANDS as f64);
        let bands: Vec<Band> = (0..BANDS)
            .map(|i| {
                let (lo, hi) = (edge(i), edge(i + 1));
                let start = ((lo / bin_hz).floor() as usize).min(half - 1);
                let end = ((hi / bin_hz).ceil() as usize).clamp(start + 1, half);
                Band {
                    center_hz: (lo * hi).sqrt(),
                    start,
                    end,
                }
            })
            .collect();

        let points = bands
            .iter()
            .map(|band| (band.center_hz.log10(), FLOOR_DB))
            .collect();

        Self {
            window,
            bands,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); frame_len],
            points,
            bin_hz,
            dominant_hz: None,
        }
    }

    /// Recompute from a new frame. Frames of another length are ignored.
    pub fn update(&mut self, frame: &[f32]) {
        if frame.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(frame).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let power = |bin: &Complex<f32>| (bin.re * bin.re + bin.im * bin.im).max(1e-12);

        for (point, band) in self.points.iter_mut().zip(&self.bands) {
            let strongest = self.scratch[band.start..band.end]
                .iter()
                .map(power)
                .fold(1e-12f32, f32::max);
            point.1 = (10.0 * (strongest as f64).log10()).max(FLOOR_DB);
        }

        let half = self.scratch.len() / 2;
        self.dominant_hz = self.scratch[1..half]
            .iter()
            .map(power)
            .enumerate()
            .filter(|&(_, p)| p > 1e-6)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| (i + 1) as f64 * self.bin_hz);
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn dominant_hz(&self) -> Option<f64> {
        self.dominant_hz
    }
}

/// Render the spectrum on a log-frequency axis.
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &Spectrum) {
    let title = match spectrum.dominant_hz() {
        Some(hz) => format!(" Spectrum (peak ~{hz:.0} Hz) "),
        None => " Spectrum ".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let points = spectrum.points();
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let x_min = points.first().map_or(0.0, |p| p.0);
    let x_max = points.last().map_or(1.0, |p| p.0).max(x_min + f64::EPSILON);
    let max_db = points.iter().map(|p| p.1).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([x_min, x_max])
                .labels(vec!["20", "200", "2k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
