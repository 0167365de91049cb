//! Dice race: a push-your-luck game on a plain round-robin order.
//!
//! - On your turn: roll two dice or bank your pending points
//! - A roll adds both dice to your pending points, unless a die shows 1:
//!   then pending points are lost
//! - First player to bank the target wins
//!
//! Pending points carry over between turns until banked or lost.
//! Supports 1-8 players.

mod game;

pub use game::{race_heuristic, DiceRace, DiceRaceRules, RaceAction, RaceData};
