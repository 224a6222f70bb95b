//! TUI module for binaural
//!
//! Drives the engine tick from the draw loop and maps keys onto engine
//! setters.

mod channels;
mod spectrum;
mod transport;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use binaural_dsp::{
    engine::Engine,
    io::RingPrimitives,
    EngineError, TickReport, Viewport,
};

use super::app::AudioOutput;
use channels::{render_channels, Field};
use spectrum::{render_spectrum, Spectrum};
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Sample rate assumed for the spectrum until a device is open.
const FALLBACK_SAMPLE_RATE: f32 = 48_000.0;

const VOLUME_STEP: f32 = 0.05;
const DEPTH_STEP: f32 = 0.05;
const LFO_RATE_FACTOR: f32 = 1.25;
const BPM_STEP: f64 = 1.0;
const ROOT_STEP: f64 = 5.0;
const TIME_SCALE_FACTOR: f32 = 2.0;

/// UI application state
pub struct UiApp {
    engine: Engine<RingPrimitives>,
    /// Opened at the first Space press.
    audio: Option<AudioOutput>,
    epoch: Instant,
    report: TickReport,
    spectrum: Spectrum,
    selected: usize,
    field: Field,
    /// One-line feedback shown in the help bar.
    status: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(engine: Engine<RingPrimitives>) -> Self {
        let analyser_size = engine.config().analyser_size;
        Self {
            engine,
            audio: None,
            epoch: Instant::now(),
            report: TickReport::default(),
            spectrum: Spectrum::new(analyser_size, FALLBACK_SAMPLE_RATE),
            selected: 0,
            field: Field::Volume,
            status: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.report = self.engine.tick(self.now(), Viewport::default());
            self.spectrum.update(self.report.waveform.samples());

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

    /// Stop the session before the output stream goes away.
    pub fn shutdown(&mut self) {
        self.engine.stop();
        self.audio = None;
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// First Space press: open the device and start the session.
    fn start_audio(&mut self) -> bool {
        if self.audio.is_some() {
            return true;
        }
        let (output, primitives) = match AudioOutput::open() {
            Ok(opened) => opened,
            Err(err) => {
                tracing::error!(%err, "could not open audio output");
                self.status = Some(format!("audio unavailable: {err}"));
                return false;
            }
        };
        let analyser_size = self.engine.config().analyser_size;
        self.spectrum = Spectrum::new(analyser_size, output.sample_rate);
        if let Err(err) = self.engine.start(primitives, self.now()) {
            tracing::error!(%err, "could not start session");
            self.status = Some(err.to_string());
            return false;
        }
        self.audio = Some(output);
        true
    }

    fn handle_key(&mut self, key: KeyCode) {
        let now = self.now();
        let channel = self.selected;
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                if self.audio.is_none() {
                    if self.start_audio() {
                        self.engine.set_playing(true);
                    }
                } else {
                    self.engine.toggle_playing();
                }
            }
            KeyCode::Char('t') => {
                if let Some(bpm) = self.engine.tap(now) {
                    self.status = Some(format!("tap tempo: {bpm:.0} BPM"));
                }
            }
            KeyCode::Char('r') => match self.engine.reset_phase(now) {
                Ok(()) => self.status = None,
                Err(EngineError::NotReady) => {
                    self.status = Some("press Space to start audio first".into());
                }
                Err(err) => self.status = Some(err.to_string()),
            },
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                let last = self.engine.channel_count().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
            }
            KeyCode::Tab => self.field = self.field.next(),
            KeyCode::Left => self.adjust_field(channel, false),
            KeyCode::Right => self.adjust_field(channel, true),
            KeyCode::Char('m') => {
                if let Some(view) = self.engine.channels().get(channel) {
                    self.engine.set_muted(channel, !view.muted);
                }
            }
            KeyCode::Char('M') => {
                let muted = self.engine.master_muted();
                self.engine.set_master_muted(!muted);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let volume = self.engine.master_volume();
                self.engine.set_master_volume(volume + VOLUME_STEP);
            }
            KeyCode::Char('-') => {
                let volume = self.engine.master_volume();
                self.engine.set_master_volume(volume - VOLUME_STEP);
            }
            KeyCode::Char('[') => self.engine.set_bpm(self.engine.bpm() - BPM_STEP),
            KeyCode::Char(']') => self.engine.set_bpm(self.engine.bpm() + BPM_STEP),
            KeyCode::Char(',') => self.engine.set_root_hz(self.engine.root_hz() - ROOT_STEP),
            KeyCode::Char('.') => self.engine.set_root_hz(self.engine.root_hz() + ROOT_STEP),
            KeyCode::Char('z') => {
                let scale = self.engine.time_scale();
                self.engine.set_time_scale(scale / TIME_SCALE_FACTOR);
            }
            KeyCode::Char('x') => {
                let scale = self.engine.time_scale();
                self.engine.set_time_scale(scale * TIME_SCALE_FACTOR);
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, channel: usize, up: bool) {
        let Some(view) = self.engine.channels().into_iter().nth(channel) else {
            return;
        };
        let sign = if up { 1.0 } else { -1.0 };
        match self.field {
            Field::Volume => self
                .engine
                .set_base_volume(channel, view.base_volume + sign * VOLUME_STEP),
            Field::LfoRate => {
                let rate = if up {
                    view.lfo_rate * LFO_RATE_FACTOR
                } else {
                    view.lfo_rate / LFO_RATE_FACTOR
                };
                self.engine.set_lfo_rate(channel, rate);
            }
            Field::LfoDepth => self
                .engine
                .set_lfo_depth(channel, view.lfo_depth + sign * DEPTH_STEP),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let rows = self.engine.channel_count() as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),        // Transport bar
                Constraint::Length(rows + 3), // Channel table
                Constraint::Min(8),           // Scope + spectrum
                Constraint::Length(1),        // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(self.report.waveform.samples());
        let device = self
            .audio
            .as_ref()
            .map(|audio| (audio.sample_rate, audio.channels));
        render_transport(frame, chunks[0], &self.engine, &self.report, &stats, device);

        render_channels(
            frame,
            chunks[1],
            &self.engine.channels(),
            self.selected,
            self.field,
        );

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);
        render_waveform(frame, scopes[0], &self.report.scope, self.engine.time_scale());
        render_spectrum(frame, scopes[1], &self.spectrum);

        let help = match &self.status {
            Some(status) => format!(" {status}"),
            None => " [Space] Play  [T] Tap  [R] Reset  [↑↓] Channel  [Tab] Field  [←→] Adjust  \
                      [M] Mute  [Shift+M] Master mute  [+-] Master  [[]] BPM  [,.] Root  [ZX] Zoom  [Q] Quit"
                .to_string(),
        };
        let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
