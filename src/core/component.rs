//! Arena-style component ownership.
//!
//! A game state owns its components through one or more `ComponentStore`s,
//! each a flat map from `ComponentId` to a component value. Containers
//! such as decks or monster groups hold ids only, so "card is in this deck"
//! is a lookup rather than a back-pointer.
//!
//! Stores are backed by `im` persistent maps: cloning is O(1) and copies
//! share structure until one side writes, at which point only the touched
//! path is duplicated. Observable behavior is that of a deep copy.

use im::{OrdMap, Vector};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::entity::ComponentId;
use super::player::PlayerId;
use super::rng::GameRng;

/// An owned domain object inside a game state.
pub trait Component: Clone + std::fmt::Debug + PartialEq + Send + Sync {
    fn id(&self) -> ComponentId;

    /// Owning player, `None` for shared or neutral components.
    fn owner(&self) -> Option<PlayerId> {
        None
    }

    /// Clear round-scoped flags ("already acted this round" and similar).
    fn reset_round(&mut self) {}
}

/// Flat, id-addressed collection of components of one kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentStore<C: Component> {
    items: OrdMap<ComponentId, C>,
}

impl<C: Component> Default for ComponentStore<C> {
    fn default() -> Self {
        Self {
            items: OrdMap::new(),
        }
    }
}

impl<C: Component> ComponentStore<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component under its own id.
    ///
    /// Panics if the id is already present: ids come from a single
    /// allocator, so a clash means two components were built with one id.
    pub fn insert(&mut self, component: C) -> ComponentId {
        let id = component.id();
        let previous = self.items.insert(id, component);
        assert!(previous.is_none(), "{id} inserted twice");
        id
    }

    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&C> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut C> {
        self.items.get_mut(&id)
    }

    pub fn remove(&mut self, id: ComponentId) -> Option<C> {
        self.items.remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.items.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Components in id order.
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.items.values()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.items.keys().copied()
    }

    /// Components owned by `player`, in id order.
    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = &C> {
        self.iter().filter(move |c| c.owner() == Some(player))
    }

    /// How many components each owner holds. Neutral components are skipped.
    #[must_use]
    pub fn count_by_owner(&self) -> FxHashMap<PlayerId, usize> {
        let mut counts = FxHashMap::default();
        for owner in self.iter().filter_map(Component::owner) {
            *counts.entry(owner).or_insert(0) += 1;
        }
        counts
    }

    /// Run round-end housekeeping on every component.
    pub fn reset_round(&mut self) {
        let ids: Vec<ComponentId> = self.ids().collect();
        for id in ids {
            if let Some(component) = self.items.get_mut(&id) {
                component.reset_round();
            }
        }
    }
}

/// Ordered pile of component ids. The top is the back of the vector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<ComponentId>,
}

impl Deck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push_top(&mut self, id: ComponentId) {
        self.cards.push_back(id);
    }

    pub fn push_bottom(&mut self, id: ComponentId) {
        self.cards.push_front(id);
    }

    /// Take the top card.
    pub fn draw(&mut self) -> Option<ComponentId> {
        self.cards.pop_back()
    }

    #[must_use]
    pub fn peek(&self) -> Option<ComponentId> {
        self.cards.back().copied()
    }

    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.cards.iter().any(|&c| c == id)
    }

    /// Remove a specific card wherever it sits. Returns false if absent.
    pub fn remove(&mut self, id: ComponentId) -> bool {
        match self.cards.iter().position(|&c| c == id) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    /// Bottom-to-top iteration.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.cards.iter().copied()
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<ComponentId> = self.cards.iter().copied().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }
}

impl FromIterator<ComponentId> for Deck {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}
