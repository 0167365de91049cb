//! Deterministic random number generation for game states.
//!
//! Each game state owns one `GameRng`. Because the RNG is part of the state,
//! `GameState::copy` reproduces future dice rolls and shuffles exactly, which
//! is what replay and deterministic lookahead need. Search branches that
//! should *not* share a future use [`GameRng::fork`] or
//! [`GameRng::derive_stream`] instead.
//!
//! ```
//! use tabletop_engine::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut twin = rng.clone();
//! assert_eq!(rng.roll_die(6), twin.roll_die(6));
//!
//! let mut branch = rng.fork();
//! let rolls: Vec<_> = (0..8).map(|_| rng.roll_die(6)).collect();
//! let branch_rolls: Vec<_> = (0..8).map(|_| branch.roll_die(6)).collect();
//! assert_ne!(rolls, branch_rolls);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const FORK_MIX: u64 = 0x9E37_79B9_7F4A_7C15;
const STREAM_MIX: u64 = 0xD1B5_4A32_D192_ED03;

/// ChaCha8-backed RNG with deterministic forking.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Split off an independent branch. Each call yields a different but
    /// reproducible sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        Self::new(self.seed.wrapping_add(self.fork_counter.wrapping_mul(FORK_MIX)))
    }

    /// Independent stream number `index`, without advancing `self`.
    ///
    /// Used to give parallel playouts their own randomness from a shared
    /// read-only state.
    #[must_use]
    pub fn derive_stream(&self, index: u64) -> Self {
        let mixed = (self.seed ^ STREAM_MIX)
            .rotate_left(17)
            .wrapping_add(index.wrapping_add(1).wrapping_mul(FORK_MIX))
            .wrapping_add(self.inner.get_word_pos() as u64);
        Self::new(mixed)
    }

    /// Roll a die with `sides` faces, returning `1..=sides`.
    pub fn roll_die(&mut self, sides: u8) -> u8 {
        assert!(sides > 0, "a die needs at least one side");
        self.inner.gen_range(1..=sides)
    }

    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Snapshot for checkpointing.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

impl PartialEq for GameRng {
    fn eq(&self, other: &Self) -> bool {
        self.state() == other.state()
    }
}

impl Eq for GameRng {}

/// Serializable RNG position: seed, ChaCha word position and fork count.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.roll_die(20), b.roll_die(20));
        }
    }

    #[test]
    fn test_roll_die_bounds() {
        let mut rng = GameRng::new(3);
        for _ in 0..500 {
            let roll = rng.roll_die(6);
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn test_clone_shares_future_and_compares_equal() {
        let mut rng = GameRng::new(9);
        rng.roll_die(6);
        let mut copy = rng.clone();
        assert_eq!(rng, copy);

        rng.roll_die(6);
        assert_ne!(rng, copy);
        copy.roll_die(6);
        assert_eq!(rng, copy);
    }

    #[test]
    fn test_fork_is_deterministic_and_distinct() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        let mut fa = a.fork();
        let mut fb = b.fork();
        assert_eq!(fa, fb);

        let parent: Vec<_> = (0..10).map(|_| a.gen_range_usize(0..1000)).collect();
        let child: Vec<_> = (0..10).map(|_| fa.gen_range_usize(0..1000)).collect();
        assert_ne!(parent, child);
        assert_eq!(fb.gen_range_usize(0..1000), child[0]);
    }

    #[test]
    fn test_derive_stream_does_not_advance_parent() {
        let rng = GameRng::new(5);
        let before = rng.state();
        let mut s0 = rng.derive_stream(0);
        let mut s1 = rng.derive_stream(1);
        assert_eq!(rng.state(), before);

        let a: Vec<_> = (0..10).map(|_| s0.roll_die(100)).collect();
        let b: Vec<_> = (0..10).map(|_| s1.roll_die(100)).collect();
        assert_ne!(a, b);
        assert_eq!(rng.derive_stream(0).roll_die(100), a[0]);
    }

    #[test]
    fn test_state_roundtrip() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.roll_die(6);
        }
        let _ = rng.fork();

        let saved = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.roll_die(6)).collect();

        let mut restored = GameRng::from_state(&saved);
        let actual: Vec<_> = (0..10).map(|_| restored.roll_die(6)).collect();
        assert_eq!(expected, actual);
        assert_eq!(saved.fork_counter, 1);
    }

    #[test]
    fn test_choose() {
        let mut rng = GameRng::new(1);
        let items = [1, 2, 3];
        assert!(items.contains(rng.choose(&items).unwrap()));
        assert!(rng.choose::<i32>(&[]).is_none());
    }
}
