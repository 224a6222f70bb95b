use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use binaural_dsp::{
    engine::Engine,
    graph::{AnalyserFrame, AnalyserId, GainId, Node, OscillatorId},
    io::AudioPrimitives,
    EngineConfig, EngineError, PrimitiveError, Viewport,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateOscillator(f32),
    SetFrequency(usize, f32, Duration),
    SetPhase(usize, f32),
    CreateGain(f32),
    SetGain(usize, f32),
    RampGain(usize, f32, Duration),
    CreateAnalyser(usize),
    ReadWaveform,
    Connect(Node, Node),
    Start,
    Dispose,
}

/// Records every primitive call and serves a caller-controlled frame.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    frame: Arc<Mutex<Vec<f32>>>,
    oscillators: usize,
    gains: usize,
    started: bool,
    disposed: bool,
    fail_gain_writes: bool,
}

impl Recorder {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn feed(&self, samples: Vec<f32>) {
        *self.frame.lock().unwrap() = samples;
    }
}

impl AudioPrimitives for Recorder {
    fn create_oscillator(&mut self, frequency: f32) -> Result<OscillatorId, PrimitiveError> {
        self.record(Call::CreateOscillator(frequency));
        self.oscillators += 1;
        Ok(OscillatorId(self.oscillators - 1))
    }

    fn set_frequency(
        &mut self,
        id: OscillatorId,
        frequency: f32,
        ramp: Duration,
    ) -> Result<(), PrimitiveError> {
        self.record(Call::SetFrequency(id.0, frequency, ramp));
        Ok(())
    }

    fn set_phase(&mut self, id: OscillatorId, degrees: f32) -> Result<(), PrimitiveError> {
        self.record(Call::SetPhase(id.0, degrees));
        Ok(())
    }

    fn create_gain(&mut self, initial: f32) -> Result<GainId, PrimitiveError> {
        self.record(Call::CreateGain(initial));
        self.gains += 1;
        Ok(GainId(self.gains - 1))
    }

    fn set_gain(&mut self, id: GainId, value: f32) -> Result<(), PrimitiveError> {
        self.record(Call::SetGain(id.0, value));
        if self.fail_gain_writes {
            return Err(PrimitiveError::CommandQueueFull);
        }
        Ok(())
    }

    fn ramp_gain(
        &mut self,
        id: GainId,
        value: f32,
        ramp: Duration,
    ) -> Result<(), PrimitiveError> {
        self.record(Call::RampGain(id.0, value, ramp));
        Ok(())
    }

    fn create_analyser(&mut self, size: usize) -> Result<AnalyserId, PrimitiveError> {
        self.record(Call::CreateAnalyser(size));
        Ok(AnalyserId(0))
    }

    fn read_waveform(&mut self, _id: AnalyserId) -> Result<AnalyserFrame, PrimitiveError> {
        self.record(Call::ReadWaveform);
        Ok(AnalyserFrame::new(self.frame.lock().unwrap().clone()))
    }

    fn connect(&mut self, from: Node, to: Node) -> Result<(), PrimitiveError> {
        self.record(Call::Connect(from, to));
        Ok(())
    }

    fn start(&mut self) -> Result<(), PrimitiveError> {
        self.record(Call::Start);
        self.started = true;
        Ok(())
    }

    fn dispose(&mut self) {
        self.record(Call::Dispose);
        self.disposed = true;
    }

    fn is_ready(&self) -> bool {
        self.started && !self.disposed
    }
}

const MASTER: usize = 0;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn two_channels() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.channels.truncate(3);
    config.channels.remove(1);
    config.bpm = 120.0;
    config.root_hz = 200.0;
    config.master_volume = 0.8;
    config
}

fn started(config: EngineConfig) -> (Engine<Recorder>, Recorder) {
    let recorder = Recorder::default();
    recorder.feed(vec![0.0; 64]);
    let mut engine = Engine::new(config).unwrap();
    engine.start(recorder.clone(), ms(0)).unwrap();
    (engine, recorder)
}

#[test]
fn session_builds_graph_then_starts() {
    let (_engine, recorder) = started(two_channels());
    let master = Node::Gain(GainId(MASTER));
    assert_eq!(
        recorder.calls(),
        vec![
            Call::CreateGain(0.8),
            Call::Connect(master, Node::Output),
            Call::CreateOscillator(200.0),
            Call::CreateGain(0.0),
            Call::Connect(Node::Oscillator(OscillatorId(0)), Node::Gain(GainId(1))),
            Call::Connect(Node::Gain(GainId(1)), master),
            Call::CreateOscillator(202.0),
            Call::CreateGain(0.0),
            Call::Connect(Node::Oscillator(OscillatorId(1)), Node::Gain(GainId(2))),
            Call::Connect(Node::Gain(GainId(2)), master),
            Call::CreateAnalyser(2048),
            Call::Start,
        ]
    );
}

#[test]
fn not_ready_until_started() {
    let mut engine: Engine<Recorder> = Engine::new(two_channels()).unwrap();
    engine.set_playing(true);
    let report = engine.tick(ms(16), Viewport::default());
    assert!(report.scope.idle);
    assert!(!engine.is_ready());
    assert!(matches!(engine.reset_phase(ms(20)), Err(EngineError::NotReady)));

    let recorder = Recorder::default();
    engine.start(recorder.clone(), ms(30)).unwrap();
    assert!(engine.is_ready());
    assert_eq!(recorder.calls().last(), Some(&Call::Start));
    assert!(matches!(
        engine.start(Recorder::default(), ms(40)),
        Err(EngineError::AlreadyStarted)
    ));
}

#[test]
fn tick_reads_once_and_writes_changed_gains_only() {
    let (mut engine, recorder) = started(two_channels());
    engine.set_playing(true);
    recorder.clear();

    engine.tick(ms(16), Viewport::default());
    assert_eq!(
        recorder.calls(),
        vec![
            Call::ReadWaveform,
            Call::SetGain(1, 0.5),
            Call::SetGain(2, 0.5),
        ]
    );

    recorder.clear();
    engine.tick(ms(32), Viewport::default());
    assert_eq!(recorder.calls(), vec![Call::ReadWaveform]);

    recorder.clear();
    engine.set_master_volume(0.3);
    engine.set_bpm(60.0);
    engine.tick(ms(48), Viewport::default());
    assert_eq!(
        recorder.calls(),
        vec![
            Call::ReadWaveform,
            Call::SetFrequency(0, 200.0, ms(30)),
            Call::SetFrequency(1, 201.0, ms(30)),
            Call::SetGain(MASTER, 0.3),
        ]
    );
}

#[test]
fn phase_reset_sequence() {
    let (mut engine, recorder) = started(two_channels());
    engine.set_playing(true);
    engine.tick(ms(16), Viewport::default());
    recorder.clear();

    engine.reset_phase(ms(500)).unwrap();
    assert_eq!(
        recorder.calls(),
        vec![
            Call::RampGain(MASTER, 0.0, Duration::ZERO),
            Call::SetPhase(0, 0.0),
            Call::SetPhase(1, 0.0),
        ]
    );
    assert_eq!(engine.clock().origin(), ms(500));

    // Held silent inside the window.
    recorder.clear();
    let report = engine.tick(ms(530), Viewport::default());
    assert!(report.resetting);
    assert!(!recorder.calls().contains(&Call::SetGain(MASTER, 0.8)));

    // Restored with a short ramp once the window elapses.
    recorder.clear();
    let report = engine.tick(ms(550), Viewport::default());
    assert!(!report.resetting);
    assert_eq!(
        recorder.calls(),
        vec![Call::ReadWaveform, Call::RampGain(MASTER, 0.8, ms(10))]
    );
}

#[test]
fn double_reset_zeroes_phases_and_keeps_second_origin() {
    let (mut engine, recorder) = started(two_channels());
    recorder.clear();

    engine.reset_phase(ms(100)).unwrap();
    engine.reset_phase(ms(101)).unwrap();
    assert_eq!(engine.clock().origin(), ms(101));

    let calls = recorder.calls();
    for osc in 0..2 {
        let last_phase = calls.iter().rev().find_map(|call| match call {
            Call::SetPhase(id, degrees) if *id == osc => Some(*degrees),
            _ => None,
        });
        assert_eq!(last_phase, Some(0.0));
    }

    // The restore goes back to the level before the first reset, not to the
    // silence the second reset observed.
    recorder.clear();
    engine.tick(ms(151), Viewport::default());
    assert!(recorder
        .calls()
        .contains(&Call::RampGain(MASTER, 0.8, ms(10))));
}

#[test]
fn reset_while_muted_restores_silence() {
    let (mut engine, recorder) = started(two_channels());
    engine.set_master_muted(true);
    engine.tick(ms(16), Viewport::default());
    engine.reset_phase(ms(20)).unwrap();
    recorder.clear();

    engine.tick(ms(80), Viewport::default());
    assert!(recorder
        .calls()
        .contains(&Call::RampGain(MASTER, 0.0, ms(10))));
}

#[test]
fn stop_cancels_restore_before_dispose() {
    let (mut engine, recorder) = started(two_channels());
    engine.reset_phase(ms(0)).unwrap();
    recorder.clear();

    engine.stop();
    assert_eq!(recorder.calls(), vec![Call::Dispose]);
    assert!(!engine.is_ready());

    // Ticks after teardown touch nothing.
    engine.tick(ms(100), Viewport::default());
    assert_eq!(recorder.calls(), vec![Call::Dispose]);
}

#[test]
fn dropping_the_engine_disposes_once() {
    let (engine, recorder) = started(two_channels());
    recorder.clear();
    drop(engine);
    assert_eq!(recorder.calls(), vec![Call::Dispose]);
}

#[test]
fn guard_trims_master_on_clipping_frames() {
    let (mut engine, recorder) = started(two_channels());
    engine.set_playing(true);
    recorder.feed(vec![0.0, 1.4, -1.1, 0.2]);

    let mut previous = engine.master_volume();
    for step in 1..=200u64 {
        let report = engine.tick(ms(step * 16), Viewport::default());
        assert!(report.scope.clipping);
        assert!(report.master_volume <= previous);
        assert!(report.master_volume >= 0.1);
        previous = report.master_volume;
    }
    assert_eq!(engine.master_volume(), 0.1);

    let master_writes: Vec<f32> = recorder
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::SetGain(MASTER, value) => Some(value),
            _ => None,
        })
        .collect();
    assert!(master_writes.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(master_writes.last(), Some(&0.1));
}

#[test]
fn quiet_frames_leave_master_alone() {
    let (mut engine, recorder) = started(two_channels());
    engine.set_playing(true);
    recorder.feed(vec![0.95, -0.95, 0.5, 0.0]);
    for step in 1..=100u64 {
        let report = engine.tick(ms(step * 16), Viewport::default());
        assert!(!report.guard_corrected);
    }
    assert_eq!(engine.master_volume(), 0.8);
    assert_eq!(engine.guard_corrections(), 0);
}

#[test]
fn failed_writes_do_not_interrupt_the_loop() {
    let recorder = Recorder {
        fail_gain_writes: true,
        ..Recorder::default()
    };
    recorder.feed(vec![0.0; 16]);
    let mut engine = Engine::new(two_channels()).unwrap();
    engine.start(recorder.clone(), ms(0)).unwrap();
    engine.set_playing(true);

    engine.tick(ms(16), Viewport::default());
    recorder.clear();
    // Unconfirmed writes are retried on the next tick.
    engine.tick(ms(32), Viewport::default());
    let retries = recorder
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::SetGain(_, _)))
        .count();
    assert_eq!(retries, 2);
}
