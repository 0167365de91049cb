use super::Agent;
use crate::core::{Game, GameRng, GameState};

/// Picks uniformly among the legal actions.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl<G: Game> Agent<G> for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, _state: &GameState<G>, legal: &[G::Action]) -> Option<G::Action> {
        self.rng.choose(legal).cloned()
    }
}
