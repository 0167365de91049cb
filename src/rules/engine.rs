//! The execution loop.
//!
//! Games implement `RulesEngine` to supply what the core cannot know:
//! - how to set up a game
//! - which actions are legal for the acting player
//! - game-specific terminal conditions (`after_action`, `end_game`)
//!
//! `next` then drives one step: validate, apply, advance the turn order,
//! check for the end of the game.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::core::{
    Action, EngineConfig, Game, GameResult, GameState, IllegalActionPolicy, PlayerId,
};
use crate::error::Result;

/// What one call to [`RulesEngine::next`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The action took effect and the turn passed on.
    Applied,
    /// The action was illegal; the turn passed on without an effect.
    Forfeited,
    /// The action was illegal; the same player acts again.
    Rejected,
    /// The game is over (possibly as a result of this step).
    Finished,
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `setup`: must be a pure function of `config()`; replays depend on it
/// - `legal_actions`: empty only when the game is over
/// - `after_action`: runs after every applied action, before the turn ends;
///   the place to declare winners
/// - `continues_turn`: keeps the turn with the same player after an
///   applied action
/// - `end_game`: finalises per-player results once the game is over
pub trait RulesEngine<G: Game> {
    fn config(&self) -> &EngineConfig;

    /// Initial state of a new game.
    fn setup(&self) -> GameState<G>;

    /// Legal actions for `player` in `state`.
    fn legal_actions(&self, state: &GameState<G>, player: PlayerId) -> Vec<G::Action>;

    fn after_action(&self, _state: &mut GameState<G>, _player: PlayerId, _action: &G::Action) {}

    /// Whether `player` keeps the turn after an applied action, e.g. while
    /// the members of an activated group act one by one. Default: every
    /// action ends the turn.
    fn continues_turn(&self, _state: &GameState<G>, _player: PlayerId) -> bool {
        false
    }

    /// Settle the results of players still `Ongoing` at game end. Default:
    /// they draw.
    fn end_game(&self, state: &mut GameState<G>) {
        state.outcome_mut().settle_remaining(GameResult::Draw);
    }

    fn is_legal(&self, state: &GameState<G>, player: PlayerId, action: &G::Action) -> bool {
        self.legal_actions(state, player).contains(action)
    }

    /// End the game from outside the rules (step limits, abandoned matches).
    fn stop(&self, state: &mut GameState<G>) {
        state.set_game_status(GameResult::GameEnd);
        self.end_game(state);
    }

    /// Apply `action` for the current player and advance the game by one
    /// step.
    ///
    /// Illegal actions never fail the call: they are a no-op turn or a
    /// reprompt depending on [`IllegalActionPolicy`]. The only error is a
    /// turn-order invariant violation, which is fatal.
    fn next(&self, state: &mut GameState<G>, action: &G::Action) -> Result<StepOutcome> {
        if !state.is_ongoing() {
            return Ok(StepOutcome::Finished);
        }

        let config = self.config();
        let player = state.current_player();

        let applied = self.is_legal(state, player, action) && {
            if config.rollback_rejected {
                let snapshot = state.copy();
                let ok = action.execute(state);
                if !ok {
                    *state = snapshot;
                }
                ok
            } else {
                action.execute(state)
            }
        };

        if applied {
            debug!(%player, ?action, round = state.round(), "action applied");
            state.record_action(player, action.clone());
            self.after_action(state, player, action);

            if state.is_ongoing()
                && state.player_result(player).is_ongoing()
                && self.continues_turn(state, player)
            {
                trace!(%player, "turn continues");
                return Ok(StepOutcome::Applied);
            }
        } else {
            warn!(%player, ?action, policy = ?config.illegal_action_policy, "action rejected");
            if config.illegal_action_policy == IllegalActionPolicy::Reprompt {
                return Ok(StepOutcome::Rejected);
            }
        }

        state.end_player_turn()?;

        if state.outcome().all_players_finished() {
            state.set_game_status(GameResult::GameEnd);
        }

        if !state.is_ongoing() {
            self.end_game(state);
            info!(
                rounds = state.round(),
                turns = state.total_turns(),
                winners = ?state.outcome().winners(),
                "game over"
            );
            return Ok(StepOutcome::Finished);
        }

        Ok(if applied {
            StepOutcome::Applied
        } else {
            StepOutcome::Forfeited
        })
    }
}
