use std::time::Duration;

use crate::{
    error::PrimitiveError,
    graph::{AnalyserFrame, AnalyserId, BinauralGraph, GainId, Node, OscillatorId},
    io::AudioPrimitives,
};

/// Primitives backed by a graph owned on the calling thread.
///
/// Nothing renders by itself: call [`render`](LocalPrimitives::render) to
/// advance the audio. Used for offline bounces and for tests that need real
/// signal in the analyser.
pub struct LocalPrimitives {
    graph: BinauralGraph,
    disposed: bool,
}

impl LocalPrimitives {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            graph: BinauralGraph::new(sample_rate),
            disposed: false,
        }
    }

    /// Render the next `out.len()` mono samples.
    pub fn render(&mut self, out: &mut [f32]) {
        self.graph.render_block(out);
    }

    pub fn graph(&self) -> &BinauralGraph {
        &self.graph
    }

    pub fn sample_rate(&self) -> f32 {
        self.graph.sample_rate()
    }

    fn check(&self) -> Result<(), PrimitiveError> {
        if self.disposed {
            Err(PrimitiveError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl AudioPrimitives for LocalPrimitives {
    fn create_oscillator(&mut self, frequency: f32) -> Result<OscillatorId, PrimitiveError> {
        self.check()?;
        Ok(self.graph.create_oscillator(frequency))
    }

    fn set_frequency(
        &mut self,
        id: OscillatorId,
        frequency: f32,
        ramp: Duration,
    ) -> Result<(), PrimitiveError> {
        self.check()?;
        self.graph.set_frequency(id, frequency, ramp)
    }

    fn set_phase(&mut self, id: OscillatorId, degrees: f32) -> Result<(), PrimitiveError> {
        self.check()?;
        self.graph.set_phase(id, degrees)
    }

    fn create_gain(&mut self, initial: f32) -> Result<GainId, PrimitiveError> {
        self.check()?;
        Ok(self.graph.create_gain(initial))
    }

    fn set_gain(&mut self, id: GainId, value: f32) -> Result<(), PrimitiveError> {
        self.check()?;
        self.graph.set_gain(id, value)
    }

    fn ramp_gain(
        &mut self,
        id: GainId,
        value: f32,
        ramp: Duration,
    ) -> Result<(), PrimitiveError> {
        self.check()?;
        self.graph.ramp_gain(id, value, ramp)
    }

    fn create_analyser(&mut self, size: usize) -> Result<AnalyserId, PrimitiveError> {
        self.check()?;
        Ok(self.graph.create_analyser(size))
    }

    fn read_waveform(&mut self, id: AnalyserId) -> Result<AnalyserFrame, PrimitiveError> {
        self.check()?;
        self.graph.read_waveform(id)
    }

    fn connect(&mut self, from: Node, to: Node) -> Result<(), PrimitiveError> {
        self.check()?;
        self.graph.connect(from, to)
    }

    fn start(&mut self) -> Result<(), PrimitiveError> {
        self.check()?;
        self.graph.start();
        Ok(())
    }

    fn dispose(&mut self) {
        self.graph.dispose();
        self.disposed = true;
    }

    fn is_ready(&self) -> bool {
        !self.disposed && self.graph.is_running()
    }
}
