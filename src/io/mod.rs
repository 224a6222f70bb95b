//! External interfaces: the audio primitive layer the engine drives.
//!
//! The engine never renders audio itself. It creates tone generators, gains
//! and an analyser through [`AudioPrimitives`] and steers them by handle.
//! Two implementations are provided:
//!
//! - [`local::LocalPrimitives`] owns a [`BinauralGraph`](crate::graph::BinauralGraph)
//!   and renders on demand (offline bounces, tests).
//! - `ring::RingPrimitives` (feature `rtrb`) forwards every call as a
//!   [`message::GraphCommand`] to a realtime audio thread over a lock-free ring.

use std::time::Duration;

use crate::{
    error::PrimitiveError,
    graph::{AnalyserFrame, AnalyserId, GainId, Node, OscillatorId},
};

pub mod local;
pub mod message;
#[cfg(feature = "rtrb")]
pub mod ring;

pub use local::LocalPrimitives;
pub use message::GraphCommand;
#[cfg(feature = "rtrb")]
pub use ring::{link, RingPrimitives, RingRenderer};

/// Oscillator/gain/analyser primitives with a start/dispose lifecycle.
///
/// Nothing may sound before [`start`](AudioPrimitives::start); on the desktop
/// that call happens at the first user gesture.
pub trait AudioPrimitives {
    fn create_oscillator(&mut self, frequency: f32) -> Result<OscillatorId, PrimitiveError>;

    /// Glide to `frequency` over `ramp` (zero = jump).
    fn set_frequency(
        &mut self,
        id: OscillatorId,
        frequency: f32,
        ramp: Duration,
    ) -> Result<(), PrimitiveError>;

    fn set_phase(&mut self, id: OscillatorId, degrees: f32) -> Result<(), PrimitiveError>;

    fn create_gain(&mut self, initial: f32) -> Result<GainId, PrimitiveError>;

    fn set_gain(&mut self, id: GainId, value: f32) -> Result<(), PrimitiveError>;

    fn ramp_gain(&mut self, id: GainId, value: f32, ramp: Duration)
        -> Result<(), PrimitiveError>;

    fn create_analyser(&mut self, size: usize) -> Result<AnalyserId, PrimitiveError>;

    /// Most recent `size` output samples, oldest first.
    fn read_waveform(&mut self, id: AnalyserId) -> Result<AnalyserFrame, PrimitiveError>;

    fn connect(&mut self, from: Node, to: Node) -> Result<(), PrimitiveError>;

    fn start(&mut self) -> Result<(), PrimitiveError>;

    /// Release every node. Further calls fail with [`PrimitiveError::Disposed`]
    /// or [`PrimitiveError::UnknownNode`].
    fn dispose(&mut self);

    fn is_ready(&self) -> bool;
}
