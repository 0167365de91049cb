//! Turn-order policies.
//!
//! A turn order decides who acts next. It owns a handful of counters
//! (`TurnCounters`) plus whatever a policy needs on top:
//!
//! - [`RoundRobinOrder`]: seats take turns in a fixed, reversible direction.
//! - [`ReactiveTurnOrder`]: round robin plus a queue of players who owe an
//!   out-of-sequence reaction before the rotation resumes.
//! - [`InterleavedTurnOrder`]: a reactive slot (seat 0) alternates with the
//!   primary players, activating one secondary actor group per turn, as in
//!   hero-versus-overlord games.
//!
//! ## Turn and round flow
//!
//! ```text
//! end_player_turn
//!   ├─ game over?            → nothing
//!   ├─ turn_counter += 1
//!   ├─ turn_counter ≥ actors → end_round ─┬─ data.end_round()
//!   │                                     ├─ round_counter += 1
//!   │                                     ├─ max rounds hit? → GAME_END
//!   │                                     └─ owner = round_opener, skip finished
//!   └─ owner = next_player, skip finished (≤ n attempts, then GAME_END)
//! ```
//!
//! Every transition takes the outcome and game data explicitly. They live
//! next to the turn order inside `GameState`, so the state can hand out
//! disjoint borrows of all three.

mod interleaved;
mod reactive;
mod round_robin;

pub use interleaved::{InterleavedTurnOrder, REACTIVE_SLOT};
pub use reactive::ReactiveTurnOrder;
pub use round_robin::{Direction, RoundRobinOrder};

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, trace};

use crate::core::{GameData, GameResult, Outcome, PlayerId};
use crate::error::{EngineError, Result};

/// Counters shared by every turn-order policy.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnCounters {
    player_count: usize,
    first_player: PlayerId,
    turn_owner: PlayerId,
    /// Turns completed in the current round.
    turn_counter: u32,
    round_counter: u32,
    /// Turns completed since the game started.
    total_turns: u32,
    max_rounds: Option<u32>,
}

impl TurnCounters {
    pub fn new(player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            player_count,
            first_player: PlayerId::new(0),
            turn_owner: PlayerId::new(0),
            turn_counter: 0,
            round_counter: 0,
            total_turns: 0,
            max_rounds: None,
        }
    }

    #[must_use]
    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        assert!(player.index() < self.player_count, "first player out of range");
        self.first_player = player;
        self.turn_owner = player;
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, rounds: Option<u32>) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Back to the start of a game.
    pub fn reset(&mut self) {
        self.turn_owner = self.first_player;
        self.turn_counter = 0;
        self.round_counter = 0;
        self.total_turns = 0;
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    #[must_use]
    pub fn first_player(&self) -> PlayerId {
        self.first_player
    }

    #[must_use]
    pub fn turn_owner(&self) -> PlayerId {
        self.turn_owner
    }

    pub fn set_turn_owner(&mut self, player: PlayerId) {
        self.turn_owner = player;
    }

    #[must_use]
    pub fn turn_counter(&self) -> u32 {
        self.turn_counter
    }

    #[must_use]
    pub fn round_counter(&self) -> u32 {
        self.round_counter
    }

    #[must_use]
    pub fn total_turns(&self) -> u32 {
        self.total_turns
    }

    #[must_use]
    pub fn max_rounds(&self) -> Option<u32> {
        self.max_rounds
    }

    /// Fail if the turn owner is not a seat of this game.
    pub fn check_owner(&self) -> Result<PlayerId> {
        if self.turn_owner.index() < self.player_count {
            Ok(self.turn_owner)
        } else {
            Err(EngineError::InvariantViolation(format!(
                "turn owner {} outside {} seats",
                self.turn_owner, self.player_count
            )))
        }
    }
}

/// A policy deciding whose turn comes next.
///
/// Implementors supply `next_player`; the default transitions implement
/// the shared turn/round flow and can be overridden piecewise. Overrides
/// that still want the shared flow call [`advance_turn`] and
/// [`close_round`] directly.
pub trait TurnOrder: Clone + Debug + PartialEq + Send + Sync {
    fn counters(&self) -> &TurnCounters;

    fn counters_mut(&mut self) -> &mut TurnCounters;

    /// Back to the start of a game.
    fn reset(&mut self) {
        self.counters_mut().reset();
    }

    /// The player who acts next.
    fn current_player(&self) -> PlayerId {
        self.counters().turn_owner()
    }

    /// Turns in one round.
    fn actors_per_round<D: GameData>(&self, _data: &D) -> usize {
        self.counters().player_count()
    }

    /// Advance the rotation by one step and return the new turn owner.
    ///
    /// May return a finished player; the caller skips those.
    fn next_player<D: GameData>(&mut self, outcome: &Outcome, data: &D) -> Result<PlayerId>;

    /// Who opens a new round.
    fn round_opener<D: GameData>(&mut self, _outcome: &Outcome, _data: &D) -> Result<PlayerId> {
        Ok(self.counters().first_player())
    }

    fn end_player_turn<D: GameData>(&mut self, outcome: &mut Outcome, data: &mut D) -> Result<()> {
        advance_turn(self, outcome, data)
    }

    fn end_round<D: GameData>(&mut self, outcome: &mut Outcome, data: &mut D) -> Result<()> {
        close_round(self, outcome, data)
    }
}

/// Shared `end_player_turn` flow.
pub fn advance_turn<T, D>(order: &mut T, outcome: &mut Outcome, data: &mut D) -> Result<()>
where
    T: TurnOrder + ?Sized,
    D: GameData,
{
    if !outcome.is_ongoing() {
        return Ok(());
    }

    let played = {
        let counters = order.counters_mut();
        counters.turn_counter += 1;
        counters.total_turns += 1;
        counters.turn_counter
    };

    if played as usize >= order.actors_per_round(data) {
        return order.end_round(outcome, data);
    }

    let next = order.next_player(outcome, data)?;
    order.counters_mut().turn_owner = next;
    skip_finished(order, outcome, data)
}

/// Shared `end_round` flow.
pub fn close_round<T, D>(order: &mut T, outcome: &mut Outcome, data: &mut D) -> Result<()>
where
    T: TurnOrder + ?Sized,
    D: GameData,
{
    data.end_round();

    let (round, max_rounds) = {
        let counters = order.counters_mut();
        counters.round_counter += 1;
        counters.turn_counter = 0;
        (counters.round_counter, counters.max_rounds)
    };
    debug!(round, "round ended");

    if max_rounds.is_some_and(|max| round >= max) {
        debug!(round, "round limit reached");
        outcome.set_status(GameResult::GameEnd);
        return Ok(());
    }

    let opener = order.round_opener(outcome, data)?;
    order.counters_mut().turn_owner = opener;
    skip_finished(order, outcome, data)
}

/// Move the turn owner past finished players.
///
/// Gives up after `player_count` attempts and ends the game: at that point
/// nobody is left who can act.
pub fn skip_finished<T, D>(order: &mut T, outcome: &mut Outcome, data: &D) -> Result<()>
where
    T: TurnOrder + ?Sized,
    D: GameData,
{
    let player_count = order.counters().player_count();
    let mut attempts = 0;

    loop {
        let owner = order.counters().check_owner()?;
        if outcome.player(owner).is_ongoing() {
            return Ok(());
        }
        if attempts >= player_count {
            debug!("no player left to act, ending game");
            outcome.set_status(GameResult::GameEnd);
            return Ok(());
        }
        trace!(%owner, result = %outcome.player(owner), "skipping finished player");
        let next = order.next_player(outcome, data)?;
        order.counters_mut().turn_owner = next;
        attempts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_reset() {
        let mut counters = TurnCounters::new(3).with_first_player(PlayerId::new(2));
        counters.turn_owner = PlayerId::new(0);
        counters.turn_counter = 2;
        counters.round_counter = 4;
        counters.total_turns = 14;

        counters.reset();
        assert_eq!(counters.turn_owner(), PlayerId::new(2));
        assert_eq!(counters.turn_counter(), 0);
        assert_eq!(counters.round_counter(), 0);
        assert_eq!(counters.total_turns(), 0);
    }

    #[test]
    fn test_check_owner() {
        let mut counters = TurnCounters::new(2);
        assert_eq!(counters.check_owner(), Ok(PlayerId::new(0)));

        counters.set_turn_owner(PlayerId::new(5));
        assert!(matches!(
            counters.check_owner(),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    #[should_panic(expected = "first player out of range")]
    fn test_first_player_out_of_range() {
        let _ = TurnCounters::new(2).with_first_player(PlayerId::new(2));
    }
}
