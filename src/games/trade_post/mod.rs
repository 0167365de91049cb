//! Trade post: a resource-trading game on a reactive turn order.
//!
//! - Four resources; each player starts with one settlement
//! - On your turn: gather, build, upgrade to a city, buy a development
//!   card, or offer another player a one-for-one trade
//! - An offer queues its recipient for a reaction turn (accept or decline)
//!   before play moves on
//! - Settlements score 1, cities 2, victory-point cards 1; reaching the
//!   target wins
//! - Hands, development cards and the deck order are hidden: players see
//!   the table through `GameState::observe`
//!
//! Supports 2-6 players.

mod game;

pub use game::{
    trade_heuristic, DevCard, DevKind, Offer, Resource, Settlement, TradeAction, TradeData,
    TradePost, TradePostRules, TradeView,
};
