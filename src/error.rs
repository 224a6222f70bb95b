//! Error types.
//!
//! Out-of-range user input is never an error; setters clamp it. What remains
//! are configuration problems and calls made before audio is available.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the audio primitive layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// The command ring to the audio thread had no room.
    #[error("audio command queue is full")]
    CommandQueueFull,

    /// A handle referred to a node that does not exist (or was disposed).
    #[error("unknown {kind} node #{index}")]
    UnknownNode {
        /// Node kind.
        kind: &'static str,
        /// Handle index.
        index: usize,
    },

    /// The requested route is not allowed by the graph.
    #[error("cannot connect {from} to {to}")]
    InvalidConnection {
        /// Source description.
        from: String,
        /// Destination description.
        to: String,
    },

    /// The primitives were already released.
    #[error("audio primitives have been disposed")]
    Disposed,
}

/// Errors raised by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Audio primitives are not started yet (no user gesture so far).
    #[error("audio is not ready; start the session first")]
    NotReady,

    /// A session is already running.
    #[error("a session is already running")]
    AlreadyStarted,

    /// The primitive layer refused an operation.
    #[error(transparent)]
    Primitives(#[from] PrimitiveError),

    /// The engine was handed a config that fails validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// No channels configured.
    #[error("at least one channel is required")]
    NoChannels,

    /// The first channel must be the root (ratio 0).
    #[error("first channel must have ratio 0 (the root), found {0}")]
    RootNotFirst(f64),

    /// Ratios after the root must be positive and strictly increasing.
    #[error("channel {index} ratio {ratio} must be greater than {previous}")]
    RatioNotIncreasing {
        /// Channel index.
        index: usize,
        /// Offending ratio.
        ratio: f64,
        /// Ratio of the previous channel.
        previous: f64,
    },

    /// A numeric field is NaN or infinite.
    #[error("{field} must be finite")]
    NotFinite {
        /// Field name.
        field: &'static str,
    },

    /// A min/max pair is inverted or non-positive.
    #[error("invalid bounds for {field}: [{min}, {max}]")]
    InvalidBounds {
        /// Field name.
        field: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A buffer size is below its minimum.
    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        /// Field name.
        field: &'static str,
        /// Smallest accepted value.
        min: usize,
        /// Configured value.
        value: usize,
    },
}
