//! Musical timing: tempo state, beat-frequency derivation and tap tempo.

pub mod frequency;
pub mod tap;

pub use frequency::{channel_frequency, frequencies, TempoState};
pub use tap::TapTempo;
