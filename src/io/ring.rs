//! Lock-free link between the control thread and a realtime audio callback.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::{
    error::PrimitiveError,
    graph::{AnalyserFrame, AnalyserId, BinauralGraph, GainId, Node, OscillatorId},
    io::{message::GraphCommand, AudioPrimitives},
    MAX_BLOCK_SIZE,
};

/// Capacity in commands for the control→audio ring.
pub const COMMAND_RING_LEN: usize = 256;
/// Capacity in blocks of MAX_BLOCK_SIZE for the audio→control sample ring.
pub const SAMPLE_RING_BLOCKS: usize = 8;

/// Create a connected control/audio pair.
///
/// The returned [`RingPrimitives`] stays on the control thread; the
/// [`RingRenderer`] moves into the audio callback.
pub fn link(sample_rate: f32) -> (RingPrimitives, RingRenderer) {
    let (command_tx, command_rx) = RingBuffer::<GraphCommand>::new(COMMAND_RING_LEN);
    let (sample_tx, sample_rx) = RingBuffer::<f32>::new(MAX_BLOCK_SIZE * SAMPLE_RING_BLOCKS);
    let dispose_requested = Arc::new(AtomicBool::new(false));

    let primitives = RingPrimitives {
        commands: command_tx,
        samples: sample_rx,
        history: Vec::new(),
        analyser_sizes: Vec::new(),
        oscillators: 0,
        gains: 0,
        started: false,
        disposed: false,
        dispose_requested: Arc::clone(&dispose_requested),
    };
    let renderer = RingRenderer {
        graph: BinauralGraph::new(sample_rate),
        commands: command_rx,
        samples: sample_tx,
        render_buf: vec![0.0; MAX_BLOCK_SIZE],
        rejected: 0,
        dispose_requested,
        disposed: false,
    };
    (primitives, renderer)
}

/// Control-side half: turns primitive calls into [`GraphCommand`]s.
///
/// Handles are allocated here in creation order, mirroring the order in which
/// the audio side creates nodes. A call whose command does not fit in the ring
/// fails with [`PrimitiveError::CommandQueueFull`] and allocates nothing.
pub struct RingPrimitives {
    commands: Producer<GraphCommand>,
    samples: Consumer<f32>,
    /// Rolling window of output samples, sized for the largest analyser.
    history: Vec<f32>,
    analyser_sizes: Vec<usize>,
    oscillators: usize,
    gains: usize,
    started: bool,
    disposed: bool,
    /// Seen by the renderer even when the `Dispose` command could not be queued.
    dispose_requested: Arc<AtomicBool>,
}

impl RingPrimitives {
    fn send(&mut self, command: GraphCommand) -> Result<(), PrimitiveError> {
        if self.disposed {
            return Err(PrimitiveError::Disposed);
        }
        match self.commands.push(command) {
            Ok(()) => Ok(()),
            Err(PushError::Full(dropped)) => {
                tracing::warn!(?dropped, "audio command ring full, dropping command");
                Err(PrimitiveError::CommandQueueFull)
            }
        }
    }

    fn check_oscillator(&self, id: OscillatorId) -> Result<(), PrimitiveError> {
        if id.0 < self.oscillators {
            Ok(())
        } else {
            Err(PrimitiveError::UnknownNode {
                kind: "oscillator",
                index: id.0,
            })
        }
    }

    fn check_gain(&self, id: GainId) -> Result<(), PrimitiveError> {
        if id.0 < self.gains {
            Ok(())
        } else {
            Err(PrimitiveError::UnknownNode {
                kind: "gain",
                index: id.0,
            })
        }
    }

    /// Move everything the audio thread produced into the rolling window.
    fn poll_samples(&mut self) {
        let available = self.samples.slots();
        if available == 0 {
            return;
        }
        self.history.reserve(available);
        while let Ok(sample) = self.samples.pop() {
            self.history.push(sample);
        }
        let keep = self.analyser_sizes.iter().copied().max().unwrap_or(0);
        if self.history.len() > keep {
            let excess = self.history.len() - keep;
            self.history.drain(0..excess);
        }
    }
}

impl AudioPrimitives for RingPrimitives {
    fn create_oscillator(&mut self, frequency: f32) -> Result<OscillatorId, PrimitiveError> {
        self.send(GraphCommand::CreateOscillator { frequency })?;
        self.oscillators += 1;
        Ok(OscillatorId(self.oscillators - 1))
    }

    fn set_frequency(
        &mut self,
        id: OscillatorId,
        frequency: f32,
        ramp: Duration,
    ) -> Result<(), PrimitiveError> {
        self.check_oscillator(id)?;
        self.send(GraphCommand::SetFrequency {
            id,
            frequency,
            ramp,
        })
    }

    fn set_phase(&mut self, id: OscillatorId, degrees: f32) -> Result<(), PrimitiveError> {
        self.check_oscillator(id)?;
        self.send(GraphCommand::SetPhase { id, degrees })
    }

    fn create_gain(&mut self, initial: f32) -> Result<GainId, PrimitiveError> {
        self.send(GraphCommand::CreateGain { initial })?;
        self.gains += 1;
        Ok(GainId(self.gains - 1))
    }

    fn set_gain(&mut self, id: GainId, value: f32) -> Result<(), PrimitiveError> {
        self.check_gain(id)?;
        self.send(GraphCommand::SetGain { id, value })
    }

    fn ramp_gain(
        &mut self,
        id: GainId,
        value: f32,
        ramp: Duration,
    ) -> Result<(), PrimitiveError> {
        self.check_gain(id)?;
        self.send(GraphCommand::RampGain { id, value, ramp })
    }

    fn create_analyser(&mut self, size: usize) -> Result<AnalyserId, PrimitiveError> {
        if self.disposed {
            return Err(PrimitiveError::Disposed);
        }
        // The audio side always streams the mixed output, so analysers only
        // exist here as windows over that stream.
        let size = size.max(1);
        self.analyser_sizes.push(size);
        if self.history.len() < size {
            let missing = size - self.history.len();
            let mut padded = vec![0.0; missing];
            padded.extend_from_slice(&self.history);
            self.history = padded;
        }
        Ok(AnalyserId(self.analyser_sizes.len() - 1))
    }

    fn read_waveform(&mut self, id: AnalyserId) -> Result<AnalyserFrame, PrimitiveError> {
        if self.disposed {
            return Err(PrimitiveError::Disposed);
        }
        let size = *self
            .analyser_sizes
            .get(id.0)
            .ok_or(PrimitiveError::UnknownNode {
                kind: "analyser",
                index: id.0,
            })?;
        self.poll_samples();
        let start = self.history.len() - size;
        Ok(AnalyserFrame::new(self.history[start..].to_vec()))
    }

    fn connect(&mut self, from: Node, to: Node) -> Result<(), PrimitiveError> {
        for node in [from, to] {
            match node {
                Node::Oscillator(id) => self.check_oscillator(id)?,
                Node::Gain(id) => self.check_gain(id)?,
                Node::Output => {}
            }
        }
        self.send(GraphCommand::Connect { from, to })
    }

    fn start(&mut self) -> Result<(), PrimitiveError> {
        self.send(GraphCommand::Start)?;
        self.started = true;
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Err(err) = self.send(GraphCommand::Dispose) {
            tracing::warn!(%err, "dispose not queued, audio thread will pick up the flag");
        }
        self.dispose_requested.store(true, Ordering::Release);
        self.disposed = true;
        self.started = false;
        self.history.clear();
    }

    fn is_ready(&self) -> bool {
        self.started && !self.disposed
    }
}

/// Audio-side half: applies queued commands and renders the graph.
pub struct RingRenderer {
    graph: BinauralGraph,
    commands: Consumer<GraphCommand>,
    samples: Producer<f32>,
    render_buf: Vec<f32>,
    rejected: u64,
    dispose_requested: Arc<AtomicBool>,
    disposed: bool,
}

impl RingRenderer {
    /// Fill an interleaved device buffer, duplicating the mono mix to every
    /// channel, and publish the mix for analysis.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        self.apply_pending();

        let total_frames = data.len() / channels;
        let mut frames_written = 0;
        while frames_written < total_frames {
            let frames_remaining = total_frames - frames_written;
            let frames_to_render = frames_remaining.min(MAX_BLOCK_SIZE);

            let block = &mut self.render_buf[..frames_to_render];
            self.graph.render_block(block);

            let out_off = frames_written * channels;
            for (i, &s) in block.iter().enumerate() {
                for ch in 0..channels {
                    data[out_off + i * channels + ch] = s;
                }
            }

            // Non-blocking: drop the remainder if the control side lags.
            for &s in block.iter() {
                if let Err(PushError::Full(_)) = self.samples.push(s) {
                    break;
                }
            }

            frames_written += frames_to_render;
        }
    }

    /// Commands that referenced missing nodes since creation.
    pub fn rejected_commands(&self) -> u64 {
        self.rejected
    }

    pub fn graph(&self) -> &BinauralGraph {
        &self.graph
    }

    fn apply_pending(&mut self) {
        while let Ok(command) = self.commands.pop() {
            if command.apply(&mut self.graph).is_err() {
                self.rejected += 1;
            }
        }
        // Checked after the drain so commands queued before dispose still land.
        if !self.disposed && self.dispose_requested.load(Ordering::Acquire) {
            self.graph.dispose();
            self.disposed = true;
        }
    }
}
