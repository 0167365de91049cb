//! Execution loop, match runner and match records.
//!
//! Games implement `RulesEngine` to define:
//! - How a game is set up
//! - Legal actions for each game state
//! - Win/loss conditions
//!
//! The core engine calls into `RulesEngine` but never interprets
//! game-specific concepts directly.

pub mod engine;
pub mod record;
pub mod runner;

pub use engine::{RulesEngine, StepOutcome};
pub use record::{replay, MatchRecord, RecordedStep};
pub use runner::{GameRunner, DEFAULT_REPROMPT_BUDGET};
