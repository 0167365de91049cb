//! Core engine types: players, components, results, state, actions, RNG,
//! configuration.
//!
//! Everything here is game-agnostic. Titles plug in through the `Game`
//! type family and never modify the core.

pub mod action;
pub mod component;
pub mod config;
pub mod entity;
pub mod player;
pub mod result;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use component::{Component, ComponentStore, Deck};
pub use config::{EngineConfig, IllegalActionPolicy};
pub use entity::{ComponentId, IdAllocator};
pub use player::{PlayerId, PlayerMap};
pub use result::{GameResult, Outcome};
pub use rng::{GameRng, GameRngState};
pub use state::{Game, GameData, GameState, Observation, Observe};
