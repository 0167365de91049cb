//! Engine configuration.
//!
//! Games build an `EngineConfig` at startup and hand it to their rules
//! engine. Everything here is game-agnostic: how many seats, how the RNG is
//! seeded, when the game is cut off, and what the execution loop does with
//! an action that fails.

use serde::{Deserialize, Serialize};

/// What the execution loop does when an action is illegal or its
/// `execute` reports no effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IllegalActionPolicy {
    /// The turn ends as a no-op.
    #[default]
    Forfeit,
    /// State is left untouched and the same player is asked again.
    Reprompt,
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of seats (1-255).
    pub player_count: usize,

    /// Seed of the state's RNG.
    pub seed: u64,

    /// Rounds after which the turn order ends the game. `None` for unlimited.
    pub max_rounds: Option<u32>,

    pub illegal_action_policy: IllegalActionPolicy,

    /// Snapshot the state before each action and restore it if the action
    /// reports failure. Search code that trusts its actions can turn this
    /// off to skip the copy.
    pub rollback_rejected: bool,

    /// Hard cap on execution-loop steps for a full match. `None` for unlimited.
    pub step_limit: Option<u32>,
}

impl EngineConfig {
    /// Create a configuration with defaults for everything but the seat count.
    pub fn new(player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            player_count,
            seed: 0,
            max_rounds: None,
            illegal_action_policy: IllegalActionPolicy::default(),
            rollback_rejected: true,
            step_limit: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: IllegalActionPolicy) -> Self {
        self.illegal_action_policy = policy;
        self
    }

    #[must_use]
    pub fn without_rollback(mut self) -> Self {
        self.rollback_rejected = false;
        self
    }

    #[must_use]
    pub fn with_step_limit(mut self, steps: u32) -> Self {
        self.step_limit = Some(steps);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new(4);
        assert_eq!(config.player_count, 4);
        assert_eq!(config.max_rounds, None);
        assert_eq!(config.illegal_action_policy, IllegalActionPolicy::Forfeit);
        assert!(config.rollback_rejected);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new(2)
            .with_seed(99)
            .with_max_rounds(10)
            .with_policy(IllegalActionPolicy::Reprompt)
            .without_rollback()
            .with_step_limit(500);

        assert_eq!(config.seed, 99);
        assert_eq!(config.max_rounds, Some(10));
        assert_eq!(config.illegal_action_policy, IllegalActionPolicy::Reprompt);
        assert!(!config.rollback_rejected);
        assert_eq!(config.step_limit, Some(500));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = EngineConfig::new(3).with_seed(7).with_max_rounds(5);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    #[should_panic(expected = "At most 255 players supported")]
    fn test_too_many_players() {
        EngineConfig::new(256);
    }
}
