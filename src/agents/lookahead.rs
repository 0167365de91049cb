use rustc_hash::FxHashSet;
use tracing::trace;

use super::Agent;
use crate::core::{Game, GameState, PlayerId};
use crate::rules::{RulesEngine, StepOutcome};

/// Greedy one-ply search.
///
/// Each distinct legal action is stepped through the rules on copies of
/// the state, each copy on its own RNG stream so chance is sampled rather
/// than foreseen. The action with the best mean heuristic score for the
/// acting player wins; ties go to the earliest action.
pub struct OneStepLookahead<'r, R, H> {
    rules: &'r R,
    heuristic: H,
    samples: u64,
}

impl<'r, R, H> OneStepLookahead<'r, R, H> {
    pub fn new(rules: &'r R, heuristic: H) -> Self {
        Self {
            rules,
            heuristic,
            samples: 8,
        }
    }

    /// Copies evaluated per action.
    #[must_use]
    pub fn with_samples(mut self, samples: u64) -> Self {
        self.samples = samples.max(1);
        self
    }

    fn score<G>(&self, state: &GameState<G>, player: PlayerId, action: &G::Action) -> f64
    where
        G: Game,
        R: RulesEngine<G>,
        H: Fn(&GameState<G>, PlayerId) -> f64,
    {
        let mut total = 0.0;
        for stream in 0..self.samples {
            let mut scratch = state.with_stream(stream);
            match self.rules.next(&mut scratch, action) {
                Ok(StepOutcome::Applied | StepOutcome::Finished) => {
                    total += (self.heuristic)(&scratch, player);
                }
                Ok(StepOutcome::Forfeited | StepOutcome::Rejected) | Err(_) => {
                    return f64::NEG_INFINITY;
                }
            }
        }
        total / self.samples as f64
    }
}

impl<'r, G, R, H> Agent<G> for OneStepLookahead<'r, R, H>
where
    G: Game,
    R: RulesEngine<G> + Sync,
    H: Fn(&GameState<G>, PlayerId) -> f64 + Send,
{
    fn name(&self) -> &str {
        "one-step-lookahead"
    }

    fn choose(&mut self, state: &GameState<G>, legal: &[G::Action]) -> Option<G::Action> {
        let player = state.current_player();
        let mut seen = FxHashSet::default();
        let mut best: Option<(f64, &G::Action)> = None;

        for action in legal {
            if !seen.insert(action) {
                continue;
            }
            let score = self.score(state, player, action);
            trace!(%player, ?action, score, "lookahead");
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, action));
            }
        }

        best.map(|(_, action)| action.clone())
    }
}
