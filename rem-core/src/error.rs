//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum RemError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The name of the ensemble transform strategy is unknown.
    #[error("{0} is not a valid transform strategy")]
    InvalidStrategy(String),

    /// The action set of the emulator does not have the expected semantics.
    #[error("Invalid action set: {0}")]
    InvalidActionSet(String),

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sampling was requested from a replay buffer holding no transition.
    #[error("Cannot sample from an empty replay buffer")]
    EmptyReplayBuffer,

    /// A frame window was read before being filled by a reset.
    #[error("Frame window has {0} frames but {1} are required; reset the environment first")]
    WindowNotFilled(usize, usize),

    /// An environment was stepped before it was reset.
    #[error("The environment must be reset before stepping")]
    ResetRequired,

    /// Array shapes do not agree.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },
}
