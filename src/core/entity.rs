//! Component identification.
//!
//! Every component a game state owns (card, token, figure, settlement) is
//! addressed by a `ComponentId`. Relationships between components are id
//! lookups, never owning pointers, so a state copy never has to rewire
//! references.
//!
//! Ids come from an `IdAllocator` owned by the game state. There is no
//! process-wide counter: two states built from the same seed hand out the
//! same ids, and a copied state continues allocating from where its
//! original was.
//!
//! ```
//! use tabletop_engine::core::{ComponentId, IdAllocator};
//!
//! let mut ids = IdAllocator::new();
//! let a = ids.alloc();
//! let b = ids.alloc();
//! assert_eq!((a, b), (ComponentId(0), ComponentId(1)));
//!
//! let mut branch = ids.clone();
//! assert_eq!(branch.alloc(), ids.alloc());
//! ```

use serde::{Deserialize, Serialize};

/// Stable identifier of a component within one game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl ComponentId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ComponentId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Component({})", self.0)
    }
}

/// Monotonic id source, threaded explicitly through setup and execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start allocating at `first`.
    #[must_use]
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// Hand out the next id.
    pub fn alloc(&mut self) -> ComponentId {
        let id = ComponentId(self.next);
        self.next += 1;
        id
    }

    /// The id the next `alloc` will return.
    #[must_use]
    pub fn peek(&self) -> ComponentId {
        ComponentId(self.next)
    }

    /// Number of ids handed out so far (from zero).
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next
    }
}
