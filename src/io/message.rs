use std::time::Duration;

use crate::{
    error::PrimitiveError,
    graph::{BinauralGraph, GainId, Node, OscillatorId},
};

/// Commands sent from the control thread to the audio thread.
///
/// `Copy` and allocation-free so they can cross a realtime ring buffer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GraphCommand {
    Start,
    Dispose,
    CreateOscillator { frequency: f32 },
    CreateGain { initial: f32 },
    SetFrequency {
        id: OscillatorId,
        frequency: f32,
        ramp: Duration,
    },
    SetPhase { id: OscillatorId, degrees: f32 },
    SetGain { id: GainId, value: f32 },
    RampGain {
        id: GainId,
        value: f32,
        ramp: Duration,
    },
    Connect { from: Node, to: Node },
}

impl GraphCommand {
    /// Execute the command against a graph.
    pub fn apply(self, graph: &mut BinauralGraph) -> Result<(), PrimitiveError> {
        match self {
            GraphCommand::Start => graph.start(),
            GraphCommand::Dispose => graph.dispose(),
            GraphCommand::CreateOscillator { frequency } => {
                graph.create_oscillator(frequency);
            }
            GraphCommand::CreateGain { initial } => {
                graph.create_gain(initial);
            }
            GraphCommand::SetFrequency {
                id,
                frequency,
                ramp,
            } => graph.set_frequency(id, frequency, ramp)?,
            GraphCommand::SetPhase { id, degrees } => graph.set_phase(id, degrees)?,
            GraphCommand::SetGain { id, value } => graph.set_gain(id, value)?,
            GraphCommand::RampGain { id, value, ramp } => graph.ramp_gain(id, value, ramp)?,
            GraphCommand::Connect { from, to } => graph.connect(from, to)?,
        }
        Ok(())
    }
}
