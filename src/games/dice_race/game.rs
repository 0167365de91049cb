//! Dice race implementation.

use serde::{Deserialize, Serialize};

use crate::core::{Action, EngineConfig, Game, GameData, GameState, PlayerId, PlayerMap};
use crate::rules::RulesEngine;
use crate::turn::RoundRobinOrder;

pub const DEFAULT_TARGET: u32 = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct DiceRace;

impl Game for DiceRace {
    type Data = RaceData;
    type Order = RoundRobinOrder;
    type Action = RaceAction;
}

#[derive(Clone, Debug, PartialEq)]
pub struct RaceData {
    pub banked: PlayerMap<u32>,
    pub pending: PlayerMap<u32>,
    /// Most recent roll, for display.
    pub last_roll: Option<(u8, u8)>,
    pub target: u32,
}

impl GameData for RaceData {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceAction {
    RollDice,
    Stop,
}

impl Action<DiceRace> for RaceAction {
    fn execute(&self, state: &mut GameState<DiceRace>) -> bool {
        let player = state.current_player();
        match self {
            RaceAction::RollDice => {
                let rng = state.rng_mut();
                let roll = (rng.roll_die(6), rng.roll_die(6));
                let data = state.data_mut();
                data.last_roll = Some(roll);
                if roll.0 == 1 || roll.1 == 1 {
                    data.pending[player] = 0;
                } else {
                    data.pending[player] += u32::from(roll.0 + roll.1);
                }
                true
            }
            RaceAction::Stop => {
                let data = state.data_mut();
                let pending = data.pending[player];
                if pending == 0 {
                    return false;
                }
                data.banked[player] += pending;
                data.pending[player] = 0;
                true
            }
        }
    }

    fn describe(&self, _state: &GameState<DiceRace>) -> String {
        match self {
            RaceAction::RollDice => "Roll Dice".into(),
            RaceAction::Stop => "Stop".into(),
        }
    }
}

/// Rules and setup for a dice race.
#[derive(Clone, Debug)]
pub struct DiceRaceRules {
    config: EngineConfig,
    target: u32,
}

impl DiceRaceRules {
    pub fn new(config: EngineConfig) -> Self {
        assert!(
            (1..=8).contains(&config.player_count),
            "Player count must be 1-8"
        );
        Self {
            config,
            target: DEFAULT_TARGET,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: u32) -> Self {
        assert!(target > 0, "target must be positive");
        self.target = target;
        self
    }

    #[must_use]
    pub fn target(&self) -> u32 {
        self.target
    }
}

impl RulesEngine<DiceRace> for DiceRaceRules {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn setup(&self) -> GameState<DiceRace> {
        let n = self.config.player_count;
        let data = RaceData {
            banked: PlayerMap::with_value(n, 0),
            pending: PlayerMap::with_value(n, 0),
            last_roll: None,
            target: self.target,
        };
        let order = RoundRobinOrder::new(n).with_max_rounds(self.config.max_rounds);
        GameState::new(&self.config, data, order)
    }

    fn legal_actions(&self, state: &GameState<DiceRace>, player: PlayerId) -> Vec<RaceAction> {
        if !state.is_ongoing() || state.current_player() != player {
            return vec![];
        }
        if state.data().pending[player] > 0 {
            vec![RaceAction::RollDice, RaceAction::Stop]
        } else {
            vec![RaceAction::RollDice]
        }
    }

    fn after_action(&self, state: &mut GameState<DiceRace>, player: PlayerId, _action: &RaceAction) {
        if state.data().banked[player] >= state.data().target {
            state.outcome_mut().declare_winner(player);
        }
    }
}

/// Banked points count fully, pending points at half since they may be lost.
pub fn race_heuristic(state: &GameState<DiceRace>, player: PlayerId) -> f64 {
    let data = state.data();
    let own = f64::from(data.banked[player]) + f64::from(data.pending[player]) / 2.0;
    own / f64::from(data.target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameResult;
    use crate::rules::StepOutcome;

    fn rules(players: usize, seed: u64) -> DiceRaceRules {
        DiceRaceRules::new(EngineConfig::new(players).with_seed(seed)).with_target(20)
    }

    #[test]
    fn test_setup() {
        let rules = rules(3, 1);
        let state = rules.setup();
        assert_eq!(state.player_count(), 3);
        assert_eq!(state.data().target, 20);
        assert_eq!(rules.target(), 20);
        assert!(state.data().banked.values().all(|&b| b == 0));
        assert_eq!(
            rules.legal_actions(&state, PlayerId::new(0)),
            vec![RaceAction::RollDice]
        );
        assert!(rules.legal_actions(&state, PlayerId::new(1)).is_empty());
    }

    #[test]
    fn test_roll_updates_pending() {
        let rules = rules(2, 7);
        let mut state = rules.setup();

        assert!(RaceAction::RollDice.execute(&mut state));
        let (a, b) = state.data().last_roll.unwrap();
        let expected = if a == 1 || b == 1 { 0 } else { u32::from(a + b) };
        assert_eq!(state.data().pending[PlayerId::new(0)], expected);
    }

    #[test]
    fn test_stop_without_pending_fails_cleanly() {
        let rules = rules(2, 3);
        let mut state = rules.setup();
        let before = state.copy();

        assert!(!RaceAction::Stop.execute(&mut state));
        assert_eq!(state, before);
    }

    #[test]
    fn test_stop_banks_pending() {
        let rules = rules(2, 3);
        let mut state = rules.setup();
        state.data_mut().pending[PlayerId::new(0)] = 9;

        assert_eq!(rules.next(&mut state, &RaceAction::Stop).unwrap(), StepOutcome::Applied);
        assert_eq!(state.data().banked[PlayerId::new(0)], 9);
        assert_eq!(state.data().pending[PlayerId::new(0)], 0);
        assert_eq!(state.current_player(), PlayerId::new(1));
    }

    #[test]
    fn test_banking_target_wins() {
        let rules = rules(2, 3);
        let mut state = rules.setup();
        state.data_mut().banked[PlayerId::new(0)] = 15;
        state.data_mut().pending[PlayerId::new(0)] = 6;

        assert_eq!(rules.next(&mut state, &RaceAction::Stop).unwrap(), StepOutcome::Finished);
        assert_eq!(state.player_result(PlayerId::new(0)), GameResult::Win);
        assert_eq!(state.player_result(PlayerId::new(1)), GameResult::Lose);
    }

    #[test]
    fn test_roll_dice_is_a_plain_value() {
        let a = RaceAction::RollDice;
        let b = a;
        assert_eq!(a, b);
        assert_ne!(RaceAction::RollDice, RaceAction::Stop);
        assert_eq!(a.describe(&rules(1, 0).setup()), "Roll Dice");
    }

    #[test]
    fn test_heuristic_discounts_pending() {
        let rules = rules(2, 0);
        let mut state = rules.setup();
        state.data_mut().banked[PlayerId::new(1)] = 10;
        state.data_mut().pending[PlayerId::new(1)] = 4;
        assert!((race_heuristic(&state, PlayerId::new(1)) - 0.6).abs() < 1e-9);
    }
}
