//! Round-robin turn order: seats act one after another around the table.

use serde::{Deserialize, Serialize};

use super::{TurnCounters, TurnOrder};
use crate::core::{GameData, Outcome, PlayerId};
use crate::error::Result;

/// Which way play passes around the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundRobinOrder {
    counters: TurnCounters,
    direction: Direction,
}

impl RoundRobinOrder {
    pub fn new(player_count: usize) -> Self {
        Self {
            counters: TurnCounters::new(player_count),
            direction: Direction::Clockwise,
        }
    }

    #[must_use]
    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        self.counters = self.counters.with_first_player(player);
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, rounds: Option<u32>) -> Self {
        self.counters = self.counters.with_max_rounds(rounds);
        self
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Flip the direction of play from the next turn on.
    pub fn reverse(&mut self) {
        self.direction = self.direction.reversed();
    }

    /// The seat after `player` in the current direction.
    #[must_use]
    pub fn seat_after(&self, player: PlayerId) -> PlayerId {
        let n = self.counters.player_count();
        match self.direction {
            Direction::Clockwise => player.clockwise(n, 1),
            Direction::CounterClockwise => player.counter_clockwise(n, 1),
        }
    }
}

impl TurnOrder for RoundRobinOrder {
    fn counters(&self) -> &TurnCounters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut TurnCounters {
        &mut self.counters
    }

    fn reset(&mut self) {
        self.counters.reset();
        self.direction = Direction::Clockwise;
    }

    fn next_player<D: GameData>(&mut self, _outcome: &Outcome, _data: &D) -> Result<PlayerId> {
        let owner = self.counters.check_owner()?;
        Ok(self.seat_after(owner))
    }
}
