//! Match records: serialization and deterministic replay.

use tabletop_engine::core::{EngineConfig, GameResult, IllegalActionPolicy, PlayerId};
use tabletop_engine::games::dice_race::{DiceRace, DiceRaceRules, RaceAction};
use tabletop_engine::games::skirmish::{Skirmish, SkirmishRules};
use tabletop_engine::games::trade_post::{TradeAction, TradePost, TradePostRules};
use tabletop_engine::{
    replay, Agent, EngineError, GameRunner, MatchRecord, RandomAgent, RulesEngine, StepOutcome,
};

fn random_agents<G: tabletop_engine::Game>(players: usize) -> Vec<Box<dyn Agent<G>>> {
    (0..players)
        .map(|i| Box::new(RandomAgent::new(42 + i as u64)) as Box<dyn Agent<G>>)
        .collect()
}

fn dice_match(seed: u64) -> (DiceRaceRules, MatchRecord<RaceAction>) {
    let rules = DiceRaceRules::new(EngineConfig::new(3).with_seed(seed)).with_target(15);
    let (_, record) = GameRunner::<DiceRace, _>::new(&rules, random_agents(3))
        .play()
        .unwrap();
    (rules, record)
}

#[test]
fn test_dice_race_replays_exactly() {
    let rules = DiceRaceRules::new(EngineConfig::new(3).with_seed(8)).with_target(15);
    let (played, record) = GameRunner::<DiceRace, _>::new(&rules, random_agents(3))
        .play()
        .unwrap();

    let replayed = replay(&rules, &record).unwrap();
    assert_eq!(replayed, played);
    assert_eq!(replayed.history(), played.history());
}

#[test]
fn test_trade_post_record_round_trips_through_bincode() {
    let config = EngineConfig::new(4).with_seed(21).with_step_limit(400);
    let rules = TradePostRules::new(config);
    let (played, record) = GameRunner::<TradePost, _>::new(&rules, random_agents(4))
        .play()
        .unwrap();

    let bytes = record.to_bytes().unwrap();
    let decoded = MatchRecord::<TradeAction>::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, record);

    let replayed = replay(&rules, &decoded).unwrap();
    assert_eq!(replayed, played);
}

#[test]
fn test_cut_off_match_replays() {
    let config = EngineConfig::new(3).with_seed(2).with_step_limit(6);
    let rules = SkirmishRules::new(config);
    let (played, record) = GameRunner::<Skirmish, _>::new(&rules, random_agents(3))
        .play()
        .unwrap();

    assert!(record.cut_off);
    assert_eq!(record.len(), 6);
    let replayed = replay(&rules, &record).unwrap();
    assert_eq!(replayed.player_results(), played.player_results());
    assert_eq!(replayed.game_status(), GameResult::GameEnd);
}

#[test]
fn test_rejected_steps_replay_under_reprompt() {
    let config = EngineConfig::new(2)
        .with_seed(3)
        .with_policy(IllegalActionPolicy::Reprompt);
    let rules = DiceRaceRules::new(config).with_target(10);

    let mut record = MatchRecord::new(rules.config());
    let mut state = rules.setup();
    for action in [RaceAction::Stop, RaceAction::RollDice, RaceAction::Stop] {
        let player = state.current_player();
        let outcome = rules.next(&mut state, &action).unwrap();
        record.push(player, action, outcome);
    }
    record.finish(&state);

    assert_eq!(record.count(StepOutcome::Rejected), 2);
    assert_eq!(replay(&rules, &record).unwrap(), state);
}

#[test]
fn test_wrong_seed_diverges() {
    let (_, record) = dice_match(5);
    let other = DiceRaceRules::new(EngineConfig::new(3).with_seed(6)).with_target(15);

    let err = replay(&other, &record).unwrap_err();
    assert!(matches!(err, EngineError::ReplayDiverged { step: 0, .. }), "{err}");
}

#[test]
fn test_truncated_record_diverges() {
    let (rules, mut record) = dice_match(5);
    let steps = record.len();
    record.steps.pop();

    let err = replay(&rules, &record).unwrap_err();
    assert_eq!(
        err,
        EngineError::ReplayDiverged {
            step: steps - 1,
            reason: format!("final status {}, record has {}", GameResult::Ongoing, GameResult::GameEnd),
        }
    );
}

#[test]
fn test_wrong_player_diverges() {
    let (rules, mut record) = dice_match(9);
    let seat = record.steps[1].player.index();
    record.steps[1].player = PlayerId::new(((seat + 1) % 3) as u8);

    let err = replay(&rules, &record).unwrap_err();
    assert!(matches!(err, EngineError::ReplayDiverged { step: 1, .. }), "{err}");
}

#[test]
fn test_tampered_results_diverge() {
    let (rules, mut record) = dice_match(13);
    let results = record.results.as_mut().unwrap();
    for (_, result) in results.iter_mut() {
        *result = GameResult::Draw;
    }

    let err = replay(&rules, &record).unwrap_err();
    assert!(
        matches!(err, EngineError::ReplayDiverged { ref reason, .. } if reason == "final player results differ"),
        "{err}"
    );
}

#[test]
fn test_garbage_bytes_are_a_serialization_error() {
    let err = MatchRecord::<RaceAction>::from_bytes(&[0xff, 0x01]).unwrap_err();
    assert!(matches!(err, EngineError::Serialization(_)));
}
