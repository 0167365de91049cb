//! The agent boundary.
//!
//! Agents pick an action from the legal ones; everything else about a game
//! (legality, application, turn order) stays with the rules engine. Agents
//! only ever read states, and any simulating they do happens on copies.
//!
//! - `RandomAgent`: uniform choice, seeded
//! - `OneStepLookahead`: applies each distinct action to a copy and scores
//!   the result with a heuristic
//! - `rollout`: parallel random playouts over independent state copies

mod lookahead;
mod random;
pub mod rollout;

pub use lookahead::OneStepLookahead;
pub use random::RandomAgent;
pub use rollout::{random_playout, win_rates};

use crate::core::{Game, GameState};

/// Decision-making for one seat.
pub trait Agent<G: Game>: Send {
    fn name(&self) -> &str;

    /// Pick one of `legal`. `None` only when `legal` is empty.
    fn choose(&mut self, state: &GameState<G>, legal: &[G::Action]) -> Option<G::Action>;
}
