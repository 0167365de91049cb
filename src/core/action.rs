//! The action contract.
//!
//! An action is one legal move: a small value that knows how to apply
//! itself to a game state. Each game defines its actions as one enum
//! implementing [`Action`]; the engine never looks inside.
//!
//! ## Contract
//!
//! - `execute` is a pure function of `(action, state)`. It either applies
//!   its full effect and returns `true`, or leaves the state untouched and
//!   returns `false`. Check every precondition before the first write.
//! - `Clone` is the copy operation. Actions hold ids and plain values, never
//!   references into a state, so a clone is always independent. Unit
//!   variants such as "roll the dice" are trivially shared.
//! - `Eq` and `Hash` cover the defining parameters only. Two actions are
//!   equal iff they would produce the same transition from any state where
//!   both are legal.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

use super::player::PlayerId;
use super::state::{Game, GameState};

/// A move in game `G`.
pub trait Action<G: Game>: Clone + Debug + PartialEq + Eq + Hash + Send + Sync {
    /// Apply this action in place. `false` means illegal or no effect, in
    /// which case `state` must be exactly as it was before the call.
    fn execute(&self, state: &mut GameState<G>) -> bool;

    /// Label for logs and action histories.
    fn describe(&self, _state: &GameState<G>) -> String {
        format!("{self:?}")
    }
}

/// An applied action with the turn-order position it was applied at.
///
/// Records make up the state's history and the serialized match log.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionRecord<A> {
    /// The player who took this action.
    pub player: PlayerId,

    pub action: A,

    /// Round the action was taken in (starts at 0).
    pub round: u32,

    /// Turns completed in the game before this action.
    pub turn: u32,

    /// Position in the history.
    pub sequence: u32,
}

impl<A> ActionRecord<A> {
    #[must_use]
    pub fn new(player: PlayerId, action: A, round: u32, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            round,
            turn,
            sequence,
        }
    }
}
