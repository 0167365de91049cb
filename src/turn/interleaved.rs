//! Primary/secondary interleaving, as in hero-versus-overlord games.
//!
//! Seat 0 is the reactive slot (the overlord). Seats `1..n` are primary
//! players (heroes). Turns alternate strictly between the two sides: a
//! hero acts, then the overlord activates one secondary actor group
//! (a monster group), then the next hero, and so on.
//!
//! ```text
//! owner == 0 : group pointer += 1, hand over to the next hero
//! owner  > 0 : hero pointer  += 1, hand over to seat 0
//! ```
//!
//! A round lasts `n + groups` turns. Alternation carries on across round
//! boundaries; the group and figure pointers start over each round.
//!
//! Within one activation a game walks the group member by member with
//! `next_figure`, keeping the turn through `RulesEngine::continues_turn`
//! until the pointer wraps back to 0.

use serde::{Deserialize, Serialize};

use super::{close_round, TurnCounters, TurnOrder};
use crate::core::{GameData, Outcome, PlayerId};
use crate::error::{EngineError, Result};

/// Seat of the reactive actor.
pub const REACTIVE_SLOT: PlayerId = PlayerId::new(0);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterleavedTurnOrder {
    counters: TurnCounters,
    /// Hero acting next, as an offset into seats `1..n`.
    primary_next: usize,
    /// Secondary group the reactive slot activates on its next turn.
    group_next: usize,
    /// Figure acting next inside the active group.
    figure_next: usize,
    /// Reactive-slot turns completed this game.
    secondary_turns: u32,
}

impl InterleavedTurnOrder {
    pub fn new(player_count: usize) -> Self {
        assert!(player_count >= 2, "Need at least one primary player besides the reactive slot");
        Self {
            counters: TurnCounters::new(player_count),
            primary_next: 0,
            group_next: 0,
            figure_next: 0,
            secondary_turns: 0,
        }
    }

    #[must_use]
    pub fn with_max_rounds(mut self, rounds: Option<u32>) -> Self {
        self.counters = self.counters.with_max_rounds(rounds);
        self
    }

    fn primary_count(&self) -> usize {
        self.counters.player_count() - 1
    }

    /// Seat of the hero who acts after the reactive slot.
    #[must_use]
    pub fn primary_next(&self) -> PlayerId {
        PlayerId::new((1 + self.primary_next) as u8)
    }

    #[must_use]
    pub fn group_next(&self) -> usize {
        self.group_next
    }

    #[must_use]
    pub fn figure_next(&self) -> usize {
        self.figure_next
    }

    #[must_use]
    pub fn secondary_turns(&self) -> u32 {
        self.secondary_turns
    }

    /// Move to the next figure of a group with `group_size` members.
    pub fn next_figure(&mut self, group_size: usize) {
        self.figure_next = if group_size == 0 {
            0
        } else {
            (self.figure_next + 1) % group_size
        };
    }

    /// The group the reactive slot activates now, or `None` when no
    /// secondary groups are in play.
    pub fn secondary_actor<D: GameData>(&self, data: &D) -> Result<Option<usize>> {
        let groups = data.secondary_groups();
        if groups == 0 {
            return Ok(None);
        }
        self.check_group(groups)?;
        Ok(Some(self.group_next))
    }

    fn check_group(&self, groups: usize) -> Result<()> {
        if self.group_next < groups {
            Ok(())
        } else {
            Err(EngineError::InvariantViolation(format!(
                "secondary group pointer {} >= {} groups",
                self.group_next, groups
            )))
        }
    }

    /// First still-playing hero at or after the hero pointer, moving the
    /// pointer onto it. Falls back to the pointer itself when every hero
    /// is finished.
    fn next_ongoing_primary(&mut self, outcome: &Outcome) -> PlayerId {
        let primaries = self.primary_count();
        let found = (0..primaries)
            .map(|k| (self.primary_next + k) % primaries)
            .find(|&offset| outcome.player(PlayerId::new((1 + offset) as u8)).is_ongoing());
        if let Some(offset) = found {
            self.primary_next = offset;
        }
        self.primary_next()
    }
}

impl TurnOrder for InterleavedTurnOrder {
    fn counters(&self) -> &TurnCounters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut TurnCounters {
        &mut self.counters
    }

    fn reset(&mut self) {
        self.counters.reset();
        self.primary_next = 0;
        self.group_next = 0;
        self.figure_next = 0;
        self.secondary_turns = 0;
    }

    fn actors_per_round<D: GameData>(&self, data: &D) -> usize {
        self.counters.player_count() + data.secondary_groups()
    }

    fn next_player<D: GameData>(&mut self, outcome: &Outcome, data: &D) -> Result<PlayerId> {
        let owner = self.counters.check_owner()?;
        let primaries = self.primary_count();
        if primaries == 0 {
            return Err(EngineError::InvariantViolation(
                "interleaved order without primary players".into(),
            ));
        }

        if owner == REACTIVE_SLOT {
            let groups = data.secondary_groups();
            if groups > 0 {
                self.check_group(groups)?;
                self.group_next = (self.group_next + 1) % groups;
            }
            self.figure_next = 0;
            self.secondary_turns += 1;
            Ok(self.next_ongoing_primary(outcome))
        } else {
            self.primary_next = (self.primary_next + 1) % primaries;
            Ok(REACTIVE_SLOT)
        }
    }

    fn round_opener<D: GameData>(&mut self, outcome: &Outcome, data: &D) -> Result<PlayerId> {
        self.next_player(outcome, data)
    }

    fn end_round<D: GameData>(&mut self, outcome: &mut Outcome, data: &mut D) -> Result<()> {
        close_round(self, outcome, data)?;
        self.group_next = 0;
        self.figure_next = 0;
        Ok(())
    }
}
