//! Match records: the action log of one game and its deterministic replay.
//!
//! A record stores every step submitted to the execution loop (including
//! rejected and forfeited ones, since they move the turn order too) plus
//! the final results. Replaying it against the same rules must reproduce
//! every step outcome and the results exactly.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::{RulesEngine, StepOutcome};
use crate::core::{EngineConfig, Game, GameResult, GameState, PlayerId, PlayerMap};
use crate::error::{EngineError, Result};

/// One submitted step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordedStep<A> {
    pub player: PlayerId,
    pub action: A,
    pub outcome: StepOutcome,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord<A> {
    pub seed: u64,
    pub player_count: usize,
    pub steps: Vec<RecordedStep<A>>,
    /// Final per-player results.
    pub results: Option<PlayerMap<GameResult>>,
    pub status: GameResult,
    /// The game was stopped from outside the rules (step limit).
    pub cut_off: bool,
}

impl<A: Clone> MatchRecord<A> {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            seed: config.seed,
            player_count: config.player_count,
            steps: Vec::new(),
            results: None,
            status: GameResult::Ongoing,
            cut_off: false,
        }
    }

    pub fn push(&mut self, player: PlayerId, action: A, outcome: StepOutcome) {
        self.steps.push(RecordedStep {
            player,
            action,
            outcome,
        });
    }

    /// Capture the final results of `state`.
    pub fn finish<G: Game<Action = A>>(&mut self, state: &GameState<G>) {
        self.results = Some(state.player_results().clone());
        self.status = state.game_status();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps that ended with `outcome`.
    #[must_use]
    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.steps.iter().filter(|s| s.outcome == outcome).count()
    }
}

impl<A: Serialize> MatchRecord<A> {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

impl<A: DeserializeOwned> MatchRecord<A> {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Re-run `record` against `rules` and check it reproduces step for step.
///
/// Returns the final state.
pub fn replay<G, R>(rules: &R, record: &MatchRecord<G::Action>) -> Result<GameState<G>>
where
    G: Game,
    R: RulesEngine<G>,
{
    let config = rules.config();
    if config.seed != record.seed || config.player_count != record.player_count {
        return Err(EngineError::ReplayDiverged {
            step: 0,
            reason: format!(
                "record is for seed {} with {} players, rules use seed {} with {}",
                record.seed, record.player_count, config.seed, config.player_count
            ),
        });
    }

    let mut state = rules.setup();
    for (step, entry) in record.steps.iter().enumerate() {
        let player = state.current_player();
        if player != entry.player {
            return Err(EngineError::ReplayDiverged {
                step,
                reason: format!("{player} to act, record has {}", entry.player),
            });
        }

        let outcome = rules.next(&mut state, &entry.action)?;
        if outcome != entry.outcome {
            return Err(EngineError::ReplayDiverged {
                step,
                reason: format!("step was {outcome:?}, record has {:?}", entry.outcome),
            });
        }
    }

    if record.cut_off && state.is_ongoing() {
        rules.stop(&mut state);
    }

    let steps = record.steps.len();
    if state.game_status() != record.status {
        return Err(EngineError::ReplayDiverged {
            step: steps,
            reason: format!("final status {}, record has {}", state.game_status(), record.status),
        });
    }
    if let Some(results) = &record.results {
        if state.player_results() != results {
            return Err(EngineError::ReplayDiverged {
                step: steps,
                reason: "final player results differ".into(),
            });
        }
    }

    debug!(steps, "replay verified");
    Ok(state)
}
