//! The control loop: parameters in, gain writes and a scope frame out.

/*
Tick Order
==========

The host calls `tick` once per display frame (about 60 Hz). A tick is
atomic from the caller's point of view; nothing it touches changes while it
runs.

    read frame ──┬──────────────────────────────────────────────┐
                 │                                              │
    restore      │  phase-reset restore, if its window elapsed  │
    retune       │  tempo/root changed → ramp oscillators       │
    guard  ◄─────┤  same frame                                  │
    modulate     │  LFO → per-channel gain writes               │
    master       │  effective master (held at 0 while resetting)│
    scope  ◄─────┘  same frame                                  │

The guard and the scope see one snapshot, so a CLIPPING tag on screen always
matches the correction that tick made. Gains written here show up in the
analyser on a later tick.

Before `start` (no user gesture yet) there is no session: ticks still run,
keep the LFO clock advancing and emit an idle scope, but write nothing.
*/

pub mod clock;
pub mod guard;
pub mod modulation;
pub mod params;
pub mod phase_reset;
pub mod scope;
pub mod session;

use std::{ops::RangeInclusive, time::Duration};

use crate::{
    config::EngineConfig,
    error::{EngineError, EngineResult},
    graph::AnalyserFrame,
    io::AudioPrimitives,
    tempo::{TapTempo, TempoState},
};

pub use self::{
    clock::ModulationClock,
    guard::ClippingGuard,
    modulation::{ChannelGain, ModulationEngine},
    params::{Channel, ChannelMix, MasterVolume, MixState},
    phase_reset::PhaseReset,
    scope::{OscilloscopeSampler, ScopeFrame, ScopePoint, Viewport},
    session::Session,
};

/// What one tick did.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub scope: ScopeFrame,
    /// Raw analyser frame the tick worked from.
    pub waveform: AnalyserFrame,
    /// Master volume after any guard correction.
    pub master_volume: f32,
    pub guard_corrected: bool,
    /// True while the phase-reset silence is in effect.
    pub resetting: bool,
    pub channel_gains: Vec<ChannelGain>,
}

/// Read-only snapshot of one channel for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelView {
    pub index: usize,
    pub label: String,
    pub ratio: f64,
    pub frequency_hz: f64,
    /// Offset from the root, i.e. the binaural beat this channel produces.
    pub beat_frequency_hz: f64,
    pub base_volume: f32,
    pub muted: bool,
    pub lfo_rate: f32,
    pub lfo_depth: f32,
    /// Gain sent on the last tick.
    pub gain: f32,
}

pub struct Engine<P: AudioPrimitives> {
    config: EngineConfig,
    tempo: TempoState,
    channels: Vec<Channel>,
    ratios: Vec<f64>,
    mix: MixState,
    playing: bool,
    time_scale: f32,

    clock: ModulationClock,
    taps: TapTempo,
    guard: ClippingGuard,
    sampler: OscilloscopeSampler,
    modulation: ModulationEngine,
    phase_reset: PhaseReset,

    session: Option<Session<P>>,
    mixes: Vec<ChannelMix>,
    gains: Vec<ChannelGain>,
}

impl<P: AudioPrimitives> Engine<P> {
    /// Build an engine from `config`, rejecting configs that fail
    /// [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let rates = lfo_rates(&config);
        let channels: Vec<Channel> = config
            .channels
            .iter()
            .enumerate()
            .map(|(index, channel)| Channel::from_config(index, channel, &rates))
            .collect();

        let mut engine = Self {
            tempo: TempoState::new(config.bpm, config.root_hz),
            ratios: config.ratios(),
            mix: MixState::new(config.master_volume),
            playing: false,
            time_scale: 1.0,
            clock: ModulationClock::default(),
            taps: TapTempo::new(config.tap_capacity, config.tap_reset_gap()),
            guard: ClippingGuard::from_config(&config),
            sampler: OscilloscopeSampler::new(config.clip_threshold),
            modulation: ModulationEngine::new(),
            phase_reset: PhaseReset::new(config.phase_reset_window(), config.restore_ramp()),
            session: None,
            mixes: Vec::with_capacity(channels.len()),
            gains: vec![ChannelGain::default(); channels.len()],
            channels,
            config,
        };
        engine.set_time_scale(engine.config.time_scale);
        Ok(engine)
    }

    /// Open a session on `primitives`. This is the user-gesture point.
    pub fn start(&mut self, primitives: P, now: Duration) -> EngineResult<()> {
        if self.session.is_some() {
            return Err(EngineError::AlreadyStarted);
        }
        let session = Session::open(
            primitives,
            self.tempo,
            &self.ratios,
            self.mix.effective_master(),
            self.config.analyser_size,
        )?;
        self.session = Some(session);
        self.clock.reset(now);
        Ok(())
    }

    /// Tear the session down. A pending phase-reset restore is cancelled
    /// first so nothing is written to released primitives.
    pub fn stop(&mut self) {
        self.phase_reset.cancel();
        if let Some(session) = self.session.take() {
            session.close();
        }
    }

    /// Whether playback-dependent operations can run.
    pub fn is_ready(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_ready)
    }

    pub fn session(&self) -> Option<&Session<P>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session<P>> {
        self.session.as_mut()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tempo(&self) -> TempoState {
        self.tempo
    }

    pub fn bpm(&self) -> f64 {
        self.tempo.bpm()
    }

    pub fn root_hz(&self) -> f64 {
        self.tempo.root_hz()
    }

    pub fn master_volume(&self) -> f32 {
        self.mix.master.value()
    }

    pub fn master_muted(&self) -> bool {
        self.mix.master_muted
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn clock(&self) -> ModulationClock {
        self.clock
    }

    pub fn guard_corrections(&self) -> u64 {
        self.guard.corrections()
    }

    pub fn is_resetting(&self) -> bool {
        self.phase_reset.is_pending()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.tempo.set_bpm(bpm);
    }

    pub fn set_root_hz(&mut self, root_hz: f64) {
        self.tempo.set_root_hz(root_hz);
    }

    /// User write to the master volume.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.mix.master.set_user_volume(volume);
    }

    pub fn set_master_muted(&mut self, muted: bool) {
        self.mix.master_muted = muted;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn toggle_playing(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        let (min, max) = (self.config.time_scale_min, self.config.time_scale_max);
        self.time_scale = if time_scale.is_nan() {
            min
        } else {
            time_scale.clamp(min, max)
        };
    }

    pub fn set_base_volume(&mut self, channel: usize, volume: f32) {
        if let Some(channel) = self.channels.get_mut(channel) {
            channel.set_base_volume(volume);
        }
    }

    pub fn set_muted(&mut self, channel: usize, muted: bool) {
        if let Some(channel) = self.channels.get_mut(channel) {
            channel.set_muted(muted);
        }
    }

    pub fn set_lfo_rate(&mut self, channel: usize, rate: f32) {
        let rates = lfo_rates(&self.config);
        if let Some(channel) = self.channels.get_mut(channel) {
            channel.set_lfo_rate(rate, &rates);
        }
    }

    pub fn set_lfo_depth(&mut self, channel: usize, depth: f32) {
        if let Some(channel) = self.channels.get_mut(channel) {
            channel.set_lfo_depth(depth);
        }
    }

    /// Register a tap. When enough taps have been seen the tempo follows and
    /// the estimate is returned.
    pub fn tap(&mut self, now: Duration) -> Option<f64> {
        let bpm = self.taps.record_tap(now)?;
        self.set_bpm(bpm);
        tracing::debug!(bpm, "tap tempo");
        Some(bpm)
    }

    /// Zero every oscillator phase and the LFO origin behind a short silence.
    pub fn reset_phase(&mut self, now: Duration) -> EngineResult<()> {
        let session = match self.session.as_mut() {
            Some(session) if session.is_ready() => session,
            _ => return Err(EngineError::NotReady),
        };
        self.phase_reset.begin(
            now,
            self.mix.effective_master(),
            session,
            &mut self.clock,
        );
        Ok(())
    }

    /// Run one control-loop pass at `now`.
    pub fn tick(&mut self, now: Duration, viewport: Viewport) -> TickReport {
        let elapsed = self.clock.elapsed(now);
        self.mixes.clear();
        self.mixes.extend(self.channels.iter().map(Channel::mix));
        self.modulation
            .compute(&self.mixes, elapsed, self.playing, &mut self.gains);

        let session = match self.session.as_mut() {
            Some(session) if session.is_ready() => session,
            _ => {
                let waveform = AnalyserFrame::silent(self.config.analyser_size);
                return TickReport {
                    scope: self.sampler.sample(&waveform, self.time_scale, viewport, false),
                    waveform,
                    master_volume: self.mix.master.value(),
                    guard_corrected: false,
                    resetting: false,
                    channel_gains: self.gains.clone(),
                };
            }
        };

        let waveform = session.read_frame();
        let restored = self.phase_reset.poll(now, session);
        session.retune(self.tempo, &self.ratios, self.config.frequency_ramp());

        let guard_corrected = self.guard.check(&waveform, &mut self.mix.master);

        for (index, gain) in self.gains.iter().enumerate() {
            session.set_channel_gain(index, gain.effective);
        }

        let resetting = self.phase_reset.is_pending();
        if resetting {
            session.write_master(0.0);
        } else if restored.is_none() {
            session.write_master(self.mix.effective_master());
        }

        TickReport {
            scope: self
                .sampler
                .sample(&waveform, self.time_scale, viewport, self.playing),
            waveform,
            master_volume: self.mix.master.value(),
            guard_corrected,
            resetting,
            channel_gains: self.gains.clone(),
        }
    }

    /// Display view of every channel.
    pub fn channels(&self) -> Vec<ChannelView> {
        let root = self.tempo.root_hz();
        self.channels
            .iter()
            .zip(self.tempo.frequencies(&self.ratios))
            .map(|(channel, frequency_hz)| {
                let mix = channel.mix();
                ChannelView {
                    index: channel.index(),
                    label: channel.label().to_string(),
                    ratio: channel.ratio(),
                    frequency_hz,
                    beat_frequency_hz: frequency_hz - root,
                    base_volume: mix.base_volume,
                    muted: mix.muted,
                    lfo_rate: mix.lfo_rate,
                    lfo_depth: mix.lfo_depth,
                    gain: self
                        .gains
                        .get(channel.index())
                        .map_or(0.0, |gain| gain.effective),
                }
            })
            .collect()
    }
}

impl<P: AudioPrimitives> Drop for Engine<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lfo_rates(config: &EngineConfig) -> RangeInclusive<f32> {
    config.lfo_rate_min..=config.lfo_rate_max
}
