//! Round robin with out-of-sequence reactions.
//!
//! During a turn, actions can queue players who owe a reaction (answering a
//! trade offer, discarding on a robber roll). When the turn owner's turn
//! ends, the queued players act front to back, then normal rotation
//! resumes. Reaction turns are not counted as turns of the round.
//!
//! ```text
//! owner acts ─ end turn ─┬─ queue empty ─────────────→ rotation advances
//!                        └─ queue [a, b] → a acts → b acts → rotation advances
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::trace;

use super::{advance_turn, RoundRobinOrder, TurnCounters, TurnOrder};
use crate::core::{GameData, Outcome, PlayerId};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactiveTurnOrder {
    rotation: RoundRobinOrder,
    queue: VecDeque<PlayerId>,
    /// True while the queue front is acting.
    reacting: bool,
}

impl ReactiveTurnOrder {
    pub fn new(player_count: usize) -> Self {
        Self::from_rotation(RoundRobinOrder::new(player_count))
    }

    /// Wrap a configured rotation (first player, max rounds, direction).
    pub fn from_rotation(rotation: RoundRobinOrder) -> Self {
        Self {
            rotation,
            queue: VecDeque::new(),
            reacting: false,
        }
    }

    #[must_use]
    pub fn rotation(&self) -> &RoundRobinOrder {
        &self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut RoundRobinOrder {
        &mut self.rotation
    }

    /// Queue `player` to react after the current turn (or after the
    /// reactions already queued).
    pub fn add_reactive_player(&mut self, player: PlayerId) {
        assert!(
            player.index() < self.rotation.counters().player_count(),
            "reactive player out of range"
        );
        self.queue.push_back(player);
    }

    /// Queue every still-playing seat except `from`, in rotation order
    /// starting after `from`.
    pub fn add_all_reactive_players(&mut self, from: PlayerId, outcome: &Outcome) {
        let mut seat = self.rotation.seat_after(from);
        while seat != from {
            if outcome.player(seat).is_ongoing() {
                self.queue.push_back(seat);
            }
            seat = self.rotation.seat_after(seat);
        }
    }

    /// True if no reaction is pending or in progress.
    #[must_use]
    pub fn reactions_finished(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn is_reacting(&self) -> bool {
        self.reacting
    }

    pub fn pending_reactions(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.queue.iter().copied()
    }
}

impl TurnOrder for ReactiveTurnOrder {
    fn counters(&self) -> &TurnCounters {
        self.rotation.counters()
    }

    fn counters_mut(&mut self) -> &mut TurnCounters {
        self.rotation.counters_mut()
    }

    fn reset(&mut self) {
        self.rotation.reset();
        self.queue.clear();
        self.reacting = false;
    }

    fn current_player(&self) -> PlayerId {
        match self.queue.front() {
            Some(&player) if self.reacting => player,
            _ => self.rotation.current_player(),
        }
    }

    fn next_player<D: GameData>(&mut self, outcome: &Outcome, data: &D) -> Result<PlayerId> {
        self.rotation.next_player(outcome, data)
    }

    fn end_player_turn<D: GameData>(&mut self, outcome: &mut Outcome, data: &mut D) -> Result<()> {
        if !outcome.is_ongoing() {
            return Ok(());
        }

        if self.reacting {
            self.queue.pop_front();
        }
        self.queue.retain(|&p| outcome.player(p).is_ongoing());

        if let Some(&next) = self.queue.front() {
            trace!(player = %next, pending = self.queue.len(), "reaction turn");
            self.reacting = true;
            return Ok(());
        }

        self.reacting = false;
        advance_turn(self, outcome, data)
    }
}
