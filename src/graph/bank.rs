use crate::{
    dsp::amplify::accumulate,
    error::PrimitiveError,
    graph::{
        analyser::{Analyser, AnalyserFrame},
        gain::GainNode,
        node::{GraphNode, RenderCtx},
        oscillator::ToneNode,
    },
    MAX_BLOCK_SIZE,
};

/*
Binaural Graph
==============

The signal graph behind the engine. It owns every node and addresses them by
small integer handles handed out in creation order:

    ToneNode ──→ GainNode (channel) ──┐
    ToneNode ──→ GainNode (channel) ──┼──→ GainNode (master) ──→ output
    ToneNode ──→ GainNode (channel) ──┘                            │
                                                                   ↓
                                                               Analyser

Routing rules
-------------

  oscillator → gain     each oscillator feeds exactly one gain
  gain → gain | output  gains may chain; cycles are refused
  analyser              always taps the summed output

Gains are processed deepest-first (farthest from the output), so a gain's
input is complete before it is attenuated and passed on. The order is
recomputed on every `connect`, never during rendering.

Rendering is mono. Blocks longer than MAX_BLOCK_SIZE are split.
*/

/// Handle to a tone generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OscillatorId(pub usize);

/// Handle to an attenuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GainId(pub usize);

/// Handle to an output analyser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalyserId(pub usize);

/// Endpoint of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Oscillator(OscillatorId),
    Gain(GainId),
    Output,
}

impl Node {
    fn describe(&self) -> String {
        match self {
            Node::Oscillator(id) => format!("oscillator #{}", id.0),
            Node::Gain(id) => format!("gain #{}", id.0),
            Node::Output => "output".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GainDestination {
    Gain(usize),
    Output,
}

struct ToneSlot {
    node: ToneNode,
    destination: Option<usize>,
}

struct GainSlot {
    node: GainNode,
    destination: Option<GainDestination>,
    input: Vec<f32>,
}

pub struct BinauralGraph {
    ctx: RenderCtx,
    tones: Vec<ToneSlot>,
    gains: Vec<GainSlot>,
    analysers: Vec<Analyser>,
    /// Gain indices, deepest first.
    order: Vec<usize>,
    tone_buffer: Vec<f32>,
    scratch: Vec<f32>,
    running: bool,
}

impl BinauralGraph {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            ctx: RenderCtx::new(sample_rate),
            tones: Vec::new(),
            gains: Vec::new(),
            analysers: Vec::new(),
            order: Vec::new(),
            tone_buffer: vec![0.0; MAX_BLOCK_SIZE],
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            running: false,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate
    }

    /// Frames rendered since the graph was created.
    pub fn frames_rendered(&self) -> u64 {
        self.ctx.frame
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Release every node and stop producing sound.
    pub fn dispose(&mut self) {
        self.running = false;
        self.tones.clear();
        self.gains.clear();
        self.analysers.clear();
        self.order.clear();
    }

    pub fn create_oscillator(&mut self, frequency: f32) -> OscillatorId {
        self.tones.push(ToneSlot {
            node: ToneNode::new(frequency),
            destination: None,
        });
        OscillatorId(self.tones.len() - 1)
    }

    pub fn create_gain(&mut self, initial: f32) -> GainId {
        self.gains.push(GainSlot {
            node: GainNode::new(initial),
            destination: None,
            input: vec![0.0; MAX_BLOCK_SIZE],
        });
        GainId(self.gains.len() - 1)
    }

    pub fn create_analyser(&mut self, size: usize) -> AnalyserId {
        self.analysers.push(Analyser::new(size));
        AnalyserId(self.analysers.len() - 1)
    }

    pub fn oscillator(&self, id: OscillatorId) -> Option<&ToneNode> {
        self.tones.get(id.0).map(|slot| &slot.node)
    }

    pub fn gain(&self, id: GainId) -> Option<&GainNode> {
        self.gains.get(id.0).map(|slot| &slot.node)
    }

    pub fn set_frequency(
        &mut self,
        id: OscillatorId,
        frequency: f32,
        ramp: std::time::Duration,
    ) -> Result<(), PrimitiveError> {
        let samples = self.ctx.ramp_samples(ramp);
        self.tone_mut(id)?.set_frequency(frequency, samples);
        Ok(())
    }

    pub fn set_phase(&mut self, id: OscillatorId, degrees: f32) -> Result<(), PrimitiveError> {
        self.tone_mut(id)?.set_phase_degrees(degrees);
        Ok(())
    }

    pub fn set_gain(&mut self, id: GainId, value: f32) -> Result<(), PrimitiveError> {
        self.gain_mut(id)?.node.set(value);
        Ok(())
    }

    pub fn ramp_gain(
        &mut self,
        id: GainId,
        value: f32,
        ramp: std::time::Duration,
    ) -> Result<(), PrimitiveError> {
        let samples = self.ctx.ramp_samples(ramp);
        self.gain_mut(id)?.node.ramp_to(value, samples);
        Ok(())
    }

    pub fn read_waveform(&self, id: AnalyserId) -> Result<AnalyserFrame, PrimitiveError> {
        self.analysers
            .get(id.0)
            .map(Analyser::snapshot)
            .ok_or(PrimitiveError::UnknownNode {
                kind: "analyser",
                index: id.0,
            })
    }

    pub fn connect(&mut self, from: Node, to: Node) -> Result<(), PrimitiveError> {
        let invalid = || PrimitiveError::InvalidConnection {
            from: from.describe(),
            to: to.describe(),
        };
        match (from, to) {
            (Node::Oscillator(osc), Node::Gain(gain)) => {
                self.gain_mut(gain)?;
                let slot = self.tones.get_mut(osc.0).ok_or(PrimitiveError::UnknownNode {
                    kind: "oscillator",
                    index: osc.0,
                })?;
                slot.destination = Some(gain.0);
            }
            (Node::Gain(src), Node::Gain(dst)) => {
                self.gain_mut(dst)?;
                self.gain_mut(src)?;
                if src == dst || self.reaches(dst.0, src.0) {
                    return Err(invalid());
                }
                self.gains[src.0].destination = Some(GainDestination::Gain(dst.0));
            }
            (Node::Gain(src), Node::Output) => {
                self.gain_mut(src)?.destination = Some(GainDestination::Output);
            }
            _ => return Err(invalid()),
        }
        self.rebuild_order();
        Ok(())
    }

    /// Render `out.len()` mono samples.
    pub fn render_block(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        let len = out.len();
        out.fill(0.0);

        if self.running {
            for slot in &mut self.gains {
                slot.input[..len].fill(0.0);
            }

            for tone in &mut self.tones {
                let block = &mut self.tone_buffer[..len];
                tone.node.render_block(block, &self.ctx);
                if let Some(dest) = tone.destination {
                    accumulate(&mut self.gains[dest].input[..len], block);
                }
            }

            for &index in &self.order {
                let slot = &mut self.gains[index];
                slot.node.process_block(&mut slot.input[..len]);
                let destination = slot.destination;
                let scratch = &mut self.scratch[..len];
                scratch.copy_from_slice(&slot.input[..len]);
                match destination {
                    Some(GainDestination::Gain(next)) => {
                        accumulate(&mut self.gains[next].input[..len], scratch)
                    }
                    Some(GainDestination::Output) => accumulate(out, scratch),
                    None => {}
                }
            }
        }

        for analyser in &mut self.analysers {
            analyser.capture(out);
        }
        self.ctx.frame += len as u64;
    }

    fn tone_mut(&mut self, id: OscillatorId) -> Result<&mut ToneNode, PrimitiveError> {
        self.tones
            .get_mut(id.0)
            .map(|slot| &mut slot.node)
            .ok_or(PrimitiveError::UnknownNode {
                kind: "oscillator",
                index: id.0,
            })
    }

    fn gain_mut(&mut self, id: GainId) -> Result<&mut GainSlot, PrimitiveError> {
        self.gains.get_mut(id.0).ok_or(PrimitiveError::UnknownNode {
            kind: "gain",
            index: id.0,
        })
    }

    /// Whether following destinations from gain `from` arrives at gain `to`.
    fn reaches(&self, from: usize, to: usize) -> bool {
        let mut current = from;
        for _ in 0..self.gains.len() {
            match self.gains[current].destination {
                Some(GainDestination::Gain(next)) if next == to => return true,
                Some(GainDestination::Gain(next)) => current = next,
                _ => return false,
            }
        }
        false
    }

    fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = index;
        while let Some(GainDestination::Gain(next)) = self.gains[current].destination {
            depth += 1;
            current = next;
            if depth > self.gains.len() {
                break;
            }
        }
        depth
    }

    fn rebuild_order(&mut self) {
        let mut order: Vec<usize> = (0..self.gains.len()).collect();
        order.sort_by_key(|&index| std::cmp::Reverse(self.depth(index)));
        self.order = order;
    }
}
