//! Scoped ownership of the audio primitives.

use std::time::Duration;

use crate::{
    error::{EngineError, PrimitiveError},
    graph::{AnalyserFrame, AnalyserId, GainId, Node, OscillatorId},
    io::AudioPrimitives,
    tempo::TempoState,
};

/// One running bank: an oscillator and gain per channel, a master gain and
/// an analyser on the output.
///
/// Acquired in [`open`](Session::open) and released exactly once, either by
/// [`close`](Session::close) or on drop.
pub struct Session<P: AudioPrimitives> {
    primitives: P,
    oscillators: Vec<OscillatorId>,
    channel_gains: Vec<GainId>,
    /// Last level sent per channel gain.
    channel_written: Vec<Option<f32>>,
    master: GainId,
    analyser: AnalyserId,
    analyser_size: usize,
    /// Master level last sent, to skip redundant writes.
    master_written: Option<f32>,
    /// Tempo the oscillators are currently tuned to.
    tuned_for: TempoState,
    released: bool,
}

impl<P: AudioPrimitives> Session<P> {
    /// Build the graph, then start the primitives.
    ///
    /// Channel gains start at 0 and the master at `master`; the first tick
    /// writes real channel levels.
    pub fn open(
        mut primitives: P,
        tempo: TempoState,
        ratios: &[f64],
        master: f32,
        analyser_size: usize,
    ) -> Result<Self, EngineError> {
        let master_gain = primitives.create_gain(master)?;
        primitives.connect(Node::Gain(master_gain), Node::Output)?;

        let mut oscillators = Vec::with_capacity(ratios.len());
        let mut channel_gains = Vec::with_capacity(ratios.len());
        for frequency in tempo.frequencies(ratios) {
            let osc = primitives.create_oscillator(frequency as f32)?;
            let gain = primitives.create_gain(0.0)?;
            primitives.connect(Node::Oscillator(osc), Node::Gain(gain))?;
            primitives.connect(Node::Gain(gain), Node::Gain(master_gain))?;
            oscillators.push(osc);
            channel_gains.push(gain);
        }

        let analyser = primitives.create_analyser(analyser_size)?;
        primitives.start()?;

        tracing::info!(
            channels = oscillators.len(),
            bpm = tempo.bpm(),
            root_hz = tempo.root_hz(),
            "audio session started"
        );

        Ok(Self {
            primitives,
            oscillators,
            channel_written: vec![Some(0.0); channel_gains.len()],
            channel_gains,
            master: master_gain,
            analyser,
            analyser_size,
            master_written: Some(master),
            tuned_for: tempo,
            released: false,
        })
    }

    pub fn primitives(&self) -> &P {
        &self.primitives
    }

    pub fn primitives_mut(&mut self) -> &mut P {
        &mut self.primitives
    }

    pub fn channel_count(&self) -> usize {
        self.oscillators.len()
    }

    pub fn is_ready(&self) -> bool {
        !self.released && self.primitives.is_ready()
    }

    /// Snapshot of the output. A failed read yields a silent frame.
    pub fn read_frame(&mut self) -> AnalyserFrame {
        match self.primitives.read_waveform(self.analyser) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::debug!(%err, "waveform read failed");
                AnalyserFrame::silent(self.analyser_size)
            }
        }
    }

    /// Push new target frequencies if `tempo` differs from the current tuning.
    pub fn retune(&mut self, tempo: TempoState, ratios: &[f64], ramp: Duration) -> bool {
        if tempo == self.tuned_for {
            return false;
        }
        for (&osc, frequency) in self.oscillators.iter().zip(tempo.frequencies(ratios)) {
            report(
                self.primitives.set_frequency(osc, frequency as f32, ramp),
                "set_frequency",
            );
        }
        self.tuned_for = tempo;
        true
    }

    /// Set one channel's gain, skipping the write when nothing changed.
    pub fn set_channel_gain(&mut self, index: usize, value: f32) {
        let (Some(&gain), Some(written)) = (
            self.channel_gains.get(index),
            self.channel_written.get_mut(index),
        ) else {
            return;
        };
        if *written == Some(value) {
            return;
        }
        if report(self.primitives.set_gain(gain, value), "set_gain") {
            *written = Some(value);
        }
    }

    /// Set the master gain, skipping the write when nothing changed.
    pub fn write_master(&mut self, value: f32) {
        if self.master_written == Some(value) {
            return;
        }
        if report(self.primitives.set_gain(self.master, value), "set_gain") {
            self.master_written = Some(value);
        }
    }

    /// Glide the master gain to `value`.
    pub fn ramp_master(&mut self, value: f32, ramp: Duration) {
        let sent = report(
            self.primitives.ramp_gain(self.master, value, ramp),
            "ramp_gain",
        );
        // A lost ramp leaves the gain unknown; force the next write through.
        self.master_written = sent.then_some(value);
    }

    /// Put every oscillator back at phase 0°.
    pub fn zero_phases(&mut self) {
        for &osc in &self.oscillators {
            report(self.primitives.set_phase(osc, 0.0), "set_phase");
        }
    }

    /// Release the primitives now.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.primitives.dispose();
        self.released = true;
        tracing::info!("audio session released");
    }
}

impl<P: AudioPrimitives> Drop for Session<P> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Log a failed primitive call. Returns whether the call went through.
fn report(result: Result<(), PrimitiveError>, op: &'static str) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%err, op, "audio primitive call failed");
            false
        }
    }
}
