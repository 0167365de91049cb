//! # tabletop-engine
//!
//! A game-agnostic turn-order and game-state engine for simulating
//! turn-based board games and evaluating agents on them.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: The core knows nothing about cards, boards or
//!    resources. Games supply a `Game` type family (data, turn order,
//!    action enum) and a `RulesEngine`.
//!
//! 2. **N-Player First**: Every per-player value is a `PlayerMap`; seats are
//!    never assumed to be two.
//!
//! 3. **Copy Is The Only Sync**: Search and parallel playouts work on
//!    independent state copies. Nothing is shared between branches.
//!
//! ## Architecture
//!
//! - **Arena Ownership**: Components live in `ComponentStore`s keyed by
//!   `ComponentId`s from an allocator owned by the state. Decks and groups
//!   hold ids.
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so copying a
//!   state before every speculative step is cheap.
//!
//! - **Pluggable Turn Orders**: Round robin, reactive (interrupt queue) and
//!   interleaved (hero/overlord) policies share one turn/round flow.
//!
//! ## Modules
//!
//! - `core`: Players, components, results, state, actions, RNG, configuration
//! - `turn`: Turn-order policies
//! - `rules`: Execution loop, match runner, match records and replay
//! - `agents`: Agent trait, random and lookahead agents, parallel playouts
//! - `games`: Example games

pub mod agents;
pub mod core;
pub mod error;
pub mod games;
pub mod rules;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord,
    Component, ComponentId, ComponentStore, Deck, IdAllocator,
    EngineConfig, IllegalActionPolicy,
    Game, GameData, GameState, Observation, Observe,
    GameResult, Outcome,
    GameRng, GameRngState,
    PlayerId, PlayerMap,
};

pub use crate::error::{EngineError, Result};

pub use crate::turn::{
    Direction, InterleavedTurnOrder, ReactiveTurnOrder, RoundRobinOrder,
    TurnCounters, TurnOrder, REACTIVE_SLOT,
};

pub use crate::rules::{replay, GameRunner, MatchRecord, RecordedStep, RulesEngine, StepOutcome};

pub use crate::agents::{Agent, OneStepLookahead, RandomAgent};
