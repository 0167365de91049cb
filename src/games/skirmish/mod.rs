//! Skirmish: heroes against an overlord on the interleaved turn order.
//!
//! - Seat 0 is the overlord and controls every monster group; seats
//!   `1..n` each control one hero
//! - Heroes and the overlord alternate; each overlord turn activates the
//!   next monster group, whose monsters then act one after another in a
//!   single turn
//! - Every figure acts at most once per round
//! - A hero whose figure falls loses; heroes win together when every
//!   monster is down; the overlord wins when all heroes are down or the
//!   round limit runs out
//!
//! Supports 1-4 heroes.

mod game;

pub use game::{
    skirmish_heuristic, Figure, Side, Skirmish, SkirmishAction, SkirmishData, SkirmishRules,
};
