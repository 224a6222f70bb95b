//! End-to-end renders through the in-process graph.

use std::time::Duration;

use binaural_dsp::{
    dsp::amplify::peak,
    engine::Engine,
    graph::OscillatorId,
    io::LocalPrimitives,
    ChannelConfig, EngineConfig, Viewport,
};

const SAMPLE_RATE: u32 = 48_000;
/// One 60 Hz display frame of audio.
const TICK_FRAMES: usize = (SAMPLE_RATE / 60) as usize;

struct Offline {
    engine: Engine<LocalPrimitives>,
    frames: u64,
    block: Vec<f32>,
}

impl Offline {
    fn start(config: EngineConfig) -> Self {
        let mut engine = Engine::new(config).unwrap();
        engine
            .start(LocalPrimitives::new(SAMPLE_RATE as f32), Duration::ZERO)
            .unwrap();
        Self {
            engine,
            frames: 0,
            block: vec![0.0; TICK_FRAMES],
        }
    }

    fn now(&self) -> Duration {
        Duration::from_secs_f64(self.frames as f64 / SAMPLE_RATE as f64)
    }

    /// Tick the engine then render one tick's worth of audio.
    fn step(&mut self) -> binaural_dsp::TickReport {
        let report = self.engine.tick(self.now(), Viewport::new(100.0, 50.0));
        self.engine
            .session_mut()
            .unwrap()
            .primitives_mut()
            .render(&mut self.block);
        self.frames += TICK_FRAMES as u64;
        report
    }
}

/// Twelve near-unison channels at full volume sum far past full scale.
fn clipping_config() -> EngineConfig {
    EngineConfig {
        bpm: 1.0,
        root_hz: 200.0,
        master_volume: 1.0,
        channels: (0..12)
            .map(|i| ChannelConfig {
                base_volume: 1.0,
                ..ChannelConfig::new(&format!("ch{i}"), i as f64 * 0.01)
            })
            .collect(),
        ..EngineConfig::default()
    }
}

fn quiet_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    for channel in &mut config.channels {
        channel.base_volume = 0.3;
    }
    config.master_volume = 0.5;
    config
}

#[test]
fn guard_settles_a_clipping_mix_at_the_floor() {
    let config = clipping_config();
    assert!(config.validate().is_ok());
    let mut offline = Offline::start(config);
    offline.engine.set_playing(true);

    let mut previous = offline.engine.master_volume();
    let mut corrected = 0;
    for _ in 0..600 {
        let report = offline.step();
        assert!(report.master_volume <= previous);
        assert!(report.master_volume >= 0.1);
        if report.guard_corrected {
            corrected += 1;
        }
        previous = report.master_volume;
    }
    assert!(corrected > 0);
    assert_eq!(offline.engine.master_volume(), 0.1);
}

#[test]
fn guard_ignores_a_quiet_mix() {
    let mut offline = Offline::start(quiet_config());
    offline.engine.set_playing(true);
    for _ in 0..300 {
        let report = offline.step();
        assert!(!report.guard_corrected);
        assert!(!report.scope.clipping);
    }
    assert_eq!(offline.engine.master_volume(), 0.5);
    assert!(peak(&offline.block) > 0.05);
}

#[test]
fn stopped_transport_is_silent_with_idle_scope() {
    let mut offline = Offline::start(quiet_config());
    offline.engine.set_playing(true);
    for _ in 0..10 {
        offline.step();
    }
    offline.engine.set_playing(false);

    // The first tick after stopping writes zero gains; the analyser still
    // holds earlier output, but the scope must ignore it.
    for _ in 0..5 {
        let report = offline.step();
        assert!(report.scope.idle);
        assert!(report.scope.points.iter().all(|p| p.y == 25.0));
    }
    assert_eq!(peak(&offline.block), 0.0);
}

#[test]
fn phase_reset_masks_and_restores_output() {
    let mut offline = Offline::start(quiet_config());
    offline.engine.set_playing(true);
    for _ in 0..20 {
        offline.step();
    }
    assert!(peak(&offline.block) > 0.05);

    let now = offline.now();
    offline.engine.reset_phase(now).unwrap();
    assert_eq!(offline.engine.clock().origin(), now);
    let graph = offline.engine.session().unwrap().primitives().graph();
    for id in 0..offline.engine.channel_count() {
        assert_eq!(graph.oscillator(OscillatorId(id)).map(|o| o.phase()), Some(0.0));
    }

    // 50 ms window = three ticks of silence.
    for _ in 0..3 {
        let report = offline.step();
        assert!(report.resetting);
        assert_eq!(peak(&offline.block), 0.0);
    }

    let mut restored = false;
    for _ in 0..5 {
        offline.step();
        restored |= peak(&offline.block) > 0.05;
    }
    assert!(restored);
    assert!(!offline.engine.is_resetting());
}

#[test]
fn tempo_change_glides_oscillators() {
    let mut offline = Offline::start(quiet_config());
    offline.engine.set_playing(true);
    offline.step();

    offline.engine.set_bpm(120.0);
    offline.step();
    let graph = offline.engine.session().unwrap().primitives().graph();
    let quad = graph.oscillator(OscillatorId(4)).unwrap();
    assert_eq!(quad.target_frequency(), 208.0);
    // 30 ms glide, 16.7 ms rendered: part way there.
    assert!(quad.frequency() > 204.0 && quad.frequency() < 208.0);

    offline.step();
    let graph = offline.engine.session().unwrap().primitives().graph();
    assert_eq!(graph.oscillator(OscillatorId(4)).map(|o| o.frequency()), Some(208.0));
}
