//! Low-level DSP primitives used by the signal graph.
//!
//! These components are allocation-free and realtime-safe, so they can run
//! inside the audio callback. They stay focused on the signal math; the graph
//! layer adds addressing and routing on top.

/// Gain application and level measurement.
pub mod amplify;
/// LFO evaluation and the gain modulation formula.
pub mod lfo;
/// Sine oscillator with phase reset.
pub mod oscillator;
/// Linear parameter smoothing.
pub mod ramp;

pub use oscillator::SineOscillator;
pub use ramp::LinearRamp;
