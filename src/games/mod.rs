//! Example games.
//!
//! Each exercises one turn-order policy end to end:
//! - `dice_race`: round robin, stateless actions, chance
//! - `trade_post`: reactive turns, resource costs, id-addressed components
//! - `skirmish`: interleaved hero/overlord turns, round-scoped flags

pub mod dice_race;
pub mod skirmish;
pub mod trade_post;
