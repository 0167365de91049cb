//! Plays a full match: one agent per seat, driven through the execution
//! loop until the game ends or the step limit cuts it off.

use tracing::{debug, info};

use super::engine::{RulesEngine, StepOutcome};
use super::record::MatchRecord;
use crate::agents::Agent;
use crate::core::{Game, GameState};
use crate::error::{EngineError, Result};

/// Consecutive rejected actions tolerated from one agent under the
/// reprompt policy.
pub const DEFAULT_REPROMPT_BUDGET: usize = 16;

pub struct GameRunner<'a, G: Game, R: RulesEngine<G>> {
    rules: &'a R,
    agents: Vec<Box<dyn Agent<G> + 'a>>,
    reprompt_budget: usize,
}

impl<'a, G: Game, R: RulesEngine<G>> GameRunner<'a, G, R> {
    /// Panics unless there is exactly one agent per seat.
    pub fn new(rules: &'a R, agents: Vec<Box<dyn Agent<G> + 'a>>) -> Self {
        assert_eq!(
            agents.len(),
            rules.config().player_count,
            "need exactly one agent per seat"
        );
        Self {
            rules,
            agents,
            reprompt_budget: DEFAULT_REPROMPT_BUDGET,
        }
    }

    #[must_use]
    pub fn with_reprompt_budget(mut self, budget: usize) -> Self {
        self.reprompt_budget = budget;
        self
    }

    /// Play one match from `setup()` to the end.
    pub fn play(&mut self) -> Result<(GameState<G>, MatchRecord<G::Action>)> {
        let state = self.rules.setup();
        self.play_from(state)
    }

    /// Play on from an existing state. The record only covers the steps
    /// taken here, so it replays only if `state` is a fresh setup.
    pub fn play_from(
        &mut self,
        mut state: GameState<G>,
    ) -> Result<(GameState<G>, MatchRecord<G::Action>)> {
        let rules = self.rules;
        let config = rules.config();
        let mut record = MatchRecord::new(config);
        let mut steps = 0u32;
        let mut rejected_in_a_row = 0usize;

        while state.is_ongoing() {
            if config.step_limit.is_some_and(|limit| steps >= limit) {
                info!(steps, "step limit reached, stopping game");
                rules.stop(&mut state);
                record.cut_off = true;
                break;
            }

            let player = state.current_player();
            let legal = rules.legal_actions(&state, player);
            if legal.is_empty() {
                return Err(EngineError::NoLegalActions(player));
            }

            let agent = &mut self.agents[player.index()];
            let action = agent
                .choose(&state, &legal)
                .ok_or(EngineError::NoLegalActions(player))?;
            debug!(%player, agent = agent.name(), ?action, "agent chose");

            let outcome = rules.next(&mut state, &action)?;
            steps += 1;

            if outcome == StepOutcome::Rejected {
                rejected_in_a_row += 1;
                if rejected_in_a_row > self.reprompt_budget {
                    return Err(EngineError::IllegalAction {
                        player,
                        action: format!("{action:?}"),
                    });
                }
            } else {
                rejected_in_a_row = 0;
            }
            record.push(player, action, outcome);
        }

        record.finish(&state);
        info!(
            steps,
            rounds = state.round(),
            status = %state.game_status(),
            winners = ?state.outcome().winners(),
            "match complete"
        );
        Ok((state, record))
    }
}
