//! The signal graph: tone generators, attenuators and analysers.
//!
//! Graph nodes wrap the low-level DSP primitives with what the engine needs to
//! drive them from outside: frequency and gain ramps, phase resets and output
//! capture. `bank` ties them together into one id-addressed, renderable graph.

/// Output capture and the read-only frame type.
pub mod analyser;
/// Node arena, routing and block rendering.
pub mod bank;
/// Attenuator node.
pub mod gain;
/// Core traits shared by all graph nodes.
pub mod node;
/// Continuous sine tone node.
pub mod oscillator;

pub use analyser::AnalyserFrame;
pub use bank::{AnalyserId, BinauralGraph, GainId, Node, OscillatorId};
pub use node::{GraphNode, RenderCtx};
