//! Random playouts.
//!
//! Every playout runs on its own copy of the root state with its own RNG
//! stream, so playouts share nothing and run in parallel on the rayon pool.
//! Results depend only on the root state and the playout count.

use rayon::prelude::*;

use crate::core::{Game, GameResult, GameState, PlayerMap};
use crate::error::{EngineError, Result};
use crate::rules::RulesEngine;

/// Steps after which a playout is stopped when the rules set no limit.
pub const DEFAULT_PLAYOUT_STEPS: u32 = 10_000;

/// Play `state` to the end with uniformly random legal actions drawn from
/// the state's own RNG. Returns the final per-player results.
pub fn random_playout<G, R>(rules: &R, mut state: GameState<G>) -> Result<PlayerMap<GameResult>>
where
    G: Game,
    R: RulesEngine<G>,
{
    let limit = rules.config().step_limit.unwrap_or(DEFAULT_PLAYOUT_STEPS);
    let mut steps = 0;

    while state.is_ongoing() {
        if steps >= limit {
            rules.stop(&mut state);
            break;
        }
        let player = state.current_player();
        let legal = rules.legal_actions(&state, player);
        let action = state
            .rng_mut()
            .choose(&legal)
            .cloned()
            .ok_or(EngineError::NoLegalActions(player))?;
        rules.next(&mut state, &action)?;
        steps += 1;
    }

    Ok(state.player_results().clone())
}

/// Mean reward per player over `playouts` random playouts from `root`.
pub fn win_rates<G, R>(rules: &R, root: &GameState<G>, playouts: usize) -> Result<PlayerMap<f64>>
where
    G: Game,
    R: RulesEngine<G> + Sync,
{
    let player_count = root.player_count();
    if playouts == 0 {
        return Ok(PlayerMap::with_value(player_count, 0.0));
    }

    let results: Vec<PlayerMap<GameResult>> = (0..playouts)
        .into_par_iter()
        .map(|i| random_playout(rules, root.with_stream(i as u64)))
        .collect::<Result<_>>()?;

    let mut totals = PlayerMap::with_value(player_count, 0.0);
    for result in &results {
        for (player, r) in result.iter() {
            totals[player] += r.reward();
        }
    }
    Ok(totals.map(|_, total| total / playouts as f64))
}
