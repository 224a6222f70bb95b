pub mod config;
pub mod dsp; // Allocation-free signal primitives
pub mod engine; // Control loop: modulation, guard, scope, phase reset
pub mod error;
pub mod graph; // Renderable oscillator/gain/analyser graph
pub mod io; // Audio primitive layer and its backends
pub mod tempo; // Beat frequencies and tap tempo

pub use config::{ChannelConfig, EngineConfig};
pub use engine::{ChannelView, Engine, TickReport, Viewport};
pub use error::{ConfigError, EngineError, EngineResult, PrimitiveError};

pub const MAX_BLOCK_SIZE: usize = 2048;
