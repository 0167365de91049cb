//! Game state: the full mutable snapshot of a game in progress.
//!
//! ## Game
//!
//! A `Game` is a type family tying together the three things a title
//! supplies: its component data, its turn-order policy and its action enum.
//!
//! ## GameState
//!
//! Owns everything that changes during play:
//! - the game's component data (`G::Data`)
//! - the turn order (copied together with the state)
//! - per-player results and the game status
//! - the id allocator and the RNG
//! - the history of applied actions
//!
//! `copy()` yields a state with no observable aliasing to the original, so
//! search code can mutate copies freely. Component stores and the history
//! are `im` persistent structures, which keeps copies O(1) until written.

use im::Vector;
use std::fmt::Debug;

use super::action::{Action, ActionRecord};
use super::component::{Component, ComponentStore};
use super::config::EngineConfig;
use super::entity::{ComponentId, IdAllocator};
use super::player::{PlayerId, PlayerMap};
use super::result::{GameResult, Outcome};
use super::rng::GameRng;
use crate::error::Result;
use crate::turn::TurnOrder;

/// Game-specific data owned by a state: component stores, decks, boards.
pub trait GameData: Clone + Debug + PartialEq + Send + Sync {
    /// Secondary actor groups currently in play (monster groups and the
    /// like). Turn orders that interleave them read this every turn.
    fn secondary_groups(&self) -> usize {
        0
    }

    /// Round-end housekeeping: clear round-scoped component flags.
    fn end_round(&mut self) {}
}

/// Games whose whole state lives in the outcome and the turn order.
impl GameData for () {}

/// Game data with hidden information: hands, deck order, face-down cards.
///
/// `observe` builds what one seat is allowed to see. Two data values that
/// differ only in information hidden from `player` must produce equal views.
pub trait Observe: GameData {
    type View: Clone + Debug + PartialEq + Send + Sync;

    fn observe(&self, player: PlayerId) -> Self::View;
}

/// One seat's view of a state: the public bookkeeping plus the game's view
/// of its data.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation<V> {
    pub observer: PlayerId,
    pub current_player: PlayerId,
    pub round: u32,
    pub total_turns: u32,
    pub results: PlayerMap<GameResult>,
    pub status: GameResult,
    pub data: V,
}

/// Type family for one title.
pub trait Game: Clone + Debug + PartialEq + Send + Sync + 'static {
    type Data: GameData;
    type Order: TurnOrder;
    type Action: Action<Self>;
}

/// Full state of one game of `G`.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState<G: Game> {
    outcome: Outcome,
    turn_order: G::Order,
    data: G::Data,
    ids: IdAllocator,
    rng: GameRng,
    history: Vector<ActionRecord<G::Action>>,
}

impl<G: Game> GameState<G> {
    /// Create a state at game start. The turn order is reset.
    ///
    /// Panics if the turn order was built for a different seat count: a
    /// mismatched pairing can only be a wiring bug.
    pub fn new(config: &EngineConfig, data: G::Data, mut turn_order: G::Order) -> Self {
        assert_eq!(
            turn_order.counters().player_count(),
            config.player_count,
            "turn order and config disagree on player count"
        );
        turn_order.reset();

        Self {
            outcome: Outcome::new(config.player_count),
            turn_order,
            data,
            ids: IdAllocator::new(),
            rng: GameRng::new(config.seed),
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.outcome.player_count()
    }

    // === Turn order ===

    /// The player who acts next. For reactive orders this is the player
    /// owing a reaction, which may differ from the turn owner.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turn_order.current_player()
    }

    #[must_use]
    pub fn turn_owner(&self) -> PlayerId {
        self.turn_order.counters().turn_owner()
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.turn_order.counters().round_counter()
    }

    /// Turns completed in the current round.
    #[must_use]
    pub fn turn_in_round(&self) -> u32 {
        self.turn_order.counters().turn_counter()
    }

    /// Turns completed since the game started.
    #[must_use]
    pub fn total_turns(&self) -> u32 {
        self.turn_order.counters().total_turns()
    }

    #[must_use]
    pub fn turn_order(&self) -> &G::Order {
        &self.turn_order
    }

    pub fn turn_order_mut(&mut self) -> &mut G::Order {
        &mut self.turn_order
    }

    /// Reset the turn order to the start of a game.
    pub fn reset_turn_order(&mut self) {
        self.turn_order.reset();
    }

    /// End the current player's turn and hand over to whoever is next.
    ///
    /// Fails only on a turn-order invariant violation, which is fatal.
    pub fn end_player_turn(&mut self) -> Result<()> {
        self.turn_order
            .end_player_turn(&mut self.outcome, &mut self.data)
    }

    /// Close the current round immediately.
    pub fn end_round(&mut self) -> Result<()> {
        self.turn_order.end_round(&mut self.outcome, &mut self.data)
    }

    // === Results ===

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn outcome_mut(&mut self) -> &mut Outcome {
        &mut self.outcome
    }

    #[must_use]
    pub fn player_results(&self) -> &PlayerMap<GameResult> {
        self.outcome.players()
    }

    #[must_use]
    pub fn player_result(&self, player: PlayerId) -> GameResult {
        self.outcome.player(player)
    }

    pub fn set_player_result(&mut self, player: PlayerId, result: GameResult) {
        self.outcome.set_player(player, result);
    }

    #[must_use]
    pub fn game_status(&self) -> GameResult {
        self.outcome.status()
    }

    pub fn set_game_status(&mut self, status: GameResult) {
        self.outcome.set_status(status);
    }

    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.outcome.is_ongoing()
    }

    // === Components ===

    #[must_use]
    pub fn data(&self) -> &G::Data {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut G::Data {
        &mut self.data
    }

    pub fn alloc_id(&mut self) -> ComponentId {
        self.ids.alloc()
    }

    #[must_use]
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Allocate an id, build a component with it and insert it into the
    /// store picked by `store`.
    ///
    /// The state's game type must be known before the call, or the store
    /// closure cannot be typed:
    ///
    /// ```ignore
    /// let mut state = GameState::<Skirmish>::new(&config, data, order);
    /// let id = state.spawn(|d| &mut d.figures, |id| Figure::hero(id, player));
    /// ```
    pub fn spawn<C: Component>(
        &mut self,
        store: impl FnOnce(&mut G::Data) -> &mut ComponentStore<C>,
        make: impl FnOnce(ComponentId) -> C,
    ) -> ComponentId {
        let id = self.ids.alloc();
        let component = make(id);
        debug_assert_eq!(component.id(), id, "component built with a foreign id");
        store(&mut self.data).insert(component)
    }

    // === Randomness ===

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    // === History ===

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord<G::Action>> {
        &self.history
    }

    /// Append an applied action to the history, stamped with the current
    /// turn-order position.
    pub fn record_action(&mut self, player: PlayerId, action: G::Action) {
        let record = ActionRecord::new(
            player,
            action,
            self.round(),
            self.total_turns(),
            self.history.len() as u32,
        );
        self.history.push_back(record);
    }

    // === Copying ===

    /// Deep copy, including the RNG position: the copy replays the same
    /// future as the original.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Copy with an independent RNG branch, for search rollouts that should
    /// not share dice with the original. Advances this state's fork counter.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        let rng = self.rng.fork();
        Self {
            rng,
            ..self.clone()
        }
    }

    /// Copy whose RNG is stream `index` derived from this state's RNG.
    /// Leaves `self` untouched, so it works from shared references.
    #[must_use]
    pub fn with_stream(&self, index: u64) -> Self {
        Self {
            rng: self.rng.derive_stream(index),
            ..self.clone()
        }
    }
}

impl<G: Game> GameState<G>
where
    G::Data: Observe,
{
    /// What `player` may see of this state. The RNG, the id allocator and
    /// the history are never part of a view.
    #[must_use]
    pub fn observe(&self, player: PlayerId) -> Observation<<G::Data as Observe>::View> {
        Observation {
            observer: player,
            current_player: self.current_player(),
            round: self.round(),
            total_turns: self.total_turns(),
            results: self.player_results().clone(),
            status: self.game_status(),
            data: self.data.observe(player),
        }
    }
}
