//! Error types for the engine.
//!
//! Per-action illegality is normally handled inside the execution loop
//! (see [`crate::core::IllegalActionPolicy`]) and never reaches callers.
//! What does surface here is either fatal (a broken turn-order invariant)
//! or a failure of the surrounding harness (replay, serialization).

use thiserror::Error;

use crate::core::PlayerId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A turn order and the state it drives disagree. This is a wiring bug
    /// in game-specific code, not a normal-play condition.
    #[error("turn order invariant violated: {0}")]
    InvariantViolation(String),

    /// An agent kept proposing actions the rules rejected.
    #[error("illegal action by {player}: {action}")]
    IllegalAction { player: PlayerId, action: String },

    #[error("no legal actions for {0} in an ongoing game")]
    NoLegalActions(PlayerId),

    #[error("replay diverged at step {step}: {reason}")]
    ReplayDiverged { step: usize, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
