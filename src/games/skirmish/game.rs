//! Skirmish implementation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    Action, Component, ComponentId, ComponentStore, EngineConfig, Game, GameData, GameResult,
    GameState, PlayerId, PlayerMap,
};
use crate::rules::RulesEngine;
use crate::turn::{InterleavedTurnOrder, REACTIVE_SLOT};

pub const DEFAULT_ROUNDS: u32 = 8;

const HERO_HEALTH: u32 = 8;
const HERO_ATTACK: u32 = 3;
const HERO_REST: u32 = 2;
const MONSTER_HEALTH: u32 = 4;
const MONSTER_ATTACK: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Hero(PlayerId),
    Monster { group: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Figure {
    id: ComponentId,
    side: Side,
    health: u32,
    max_health: u32,
    attack: u32,
    has_acted: bool,
}

impl Figure {
    fn hero(id: ComponentId, player: PlayerId) -> Self {
        Self {
            id,
            side: Side::Hero(player),
            health: HERO_HEALTH,
            max_health: HERO_HEALTH,
            attack: HERO_ATTACK,
            has_acted: false,
        }
    }

    fn monster(id: ComponentId, group: usize) -> Self {
        Self {
            id,
            side: Side::Monster { group },
            health: MONSTER_HEALTH,
            max_health: MONSTER_HEALTH,
            attack: MONSTER_ATTACK,
            has_acted: false,
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    #[must_use]
    pub fn is_hero(&self) -> bool {
        matches!(self.side, Side::Hero(_))
    }

    #[must_use]
    pub fn has_acted(&self) -> bool {
        self.has_acted
    }
}

impl Component for Figure {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn owner(&self) -> Option<PlayerId> {
        match self.side {
            Side::Hero(player) => Some(player),
            Side::Monster { .. } => Some(REACTIVE_SLOT),
        }
    }

    fn reset_round(&mut self) {
        self.has_acted = false;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkirmishData {
    pub figures: ComponentStore<Figure>,
    /// Each seat's hero figure; `None` for the overlord.
    pub heroes: PlayerMap<Option<ComponentId>>,
    /// Monster groups in activation order. Fixed for the whole game: a
    /// wiped-out group keeps its slot.
    pub groups: Vec<SmallVec<[ComponentId; 4]>>,
}

impl SkirmishData {
    fn living(&self, heroes: bool) -> impl Iterator<Item = &Figure> {
        self.figures
            .iter()
            .filter(move |f| f.is_alive() && f.is_hero() == heroes)
    }

    #[must_use]
    pub fn monsters_alive(&self) -> usize {
        self.living(false).count()
    }

    #[must_use]
    pub fn heroes_alive(&self) -> usize {
        self.living(true).count()
    }

    fn total_health(&self, heroes: bool) -> (u32, u32) {
        self.figures
            .iter()
            .filter(|f| f.is_hero() == heroes)
            .fold((0, 0), |(now, max), f| (now + f.health, max + f.max_health))
    }
}

impl GameData for SkirmishData {
    fn secondary_groups(&self) -> usize {
        self.groups.len()
    }

    fn end_round(&mut self) {
        self.figures.reset_round();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Skirmish;

impl Game for Skirmish {
    type Data = SkirmishData;
    type Order = InterleavedTurnOrder;
    type Action = SkirmishAction;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkirmishAction {
    Attack {
        attacker: ComponentId,
        target: ComponentId,
    },
    /// A hero recovers some health instead of attacking.
    Rest(ComponentId),
    Pass,
}

/// The monster group the overlord may activate right now.
fn active_group(state: &GameState<Skirmish>) -> Option<usize> {
    state
        .turn_order()
        .secondary_actor(state.data())
        .ok()
        .flatten()
}

/// Can `player` act with `figure` this turn?
fn can_act(state: &GameState<Skirmish>, player: PlayerId, figure: &Figure) -> bool {
    if !figure.is_alive() || figure.has_acted {
        return false;
    }
    match figure.side {
        Side::Hero(owner) => owner == player,
        Side::Monster { group } => player == REACTIVE_SLOT && active_group(state) == Some(group),
    }
}

/// The monster acting next in the active group: the first member at or
/// after the figure pointer that can still act this round.
fn acting_monster(state: &GameState<Skirmish>) -> Option<ComponentId> {
    let data = state.data();
    let members = data.groups.get(active_group(state)?)?;
    members
        .iter()
        .skip(state.turn_order().figure_next())
        .copied()
        .find(|&id| {
            data.figures
                .get(id)
                .is_some_and(|f| can_act(state, REACTIVE_SLOT, f))
        })
}

/// Move the figure pointer past the monster that just acted and past
/// members that can no longer act. Wraps to 0 once the group is spent.
fn advance_figure(state: &mut GameState<Skirmish>) {
    let Some(members) = active_group(state).and_then(|g| state.data().groups.get(g).cloned()) else {
        return;
    };
    loop {
        state.turn_order_mut().next_figure(members.len());
        let next = state.turn_order().figure_next();
        if next == 0 {
            return;
        }
        let ready = state
            .data()
            .figures
            .get(members[next])
            .is_some_and(|f| can_act(state, REACTIVE_SLOT, f));
        if ready {
            return;
        }
    }
}

impl Action<Skirmish> for SkirmishAction {
    fn execute(&self, state: &mut GameState<Skirmish>) -> bool {
        let player = state.current_player();
        match *self {
            SkirmishAction::Attack { attacker, target } => {
                let figures = &state.data().figures;
                let (Some(a), Some(t)) = (figures.get(attacker), figures.get(target)) else {
                    return false;
                };
                if !can_act(state, player, a) || !t.is_alive() || a.is_hero() == t.is_hero() {
                    return false;
                }
                if !a.is_hero() && acting_monster(state) != Some(attacker) {
                    return false;
                }
                let damage = a.attack;

                let figures = &mut state.data_mut().figures;
                if let Some(a) = figures.get_mut(attacker) {
                    a.has_acted = true;
                }
                let fallen = figures.get_mut(target).and_then(|t| {
                    t.health = t.health.saturating_sub(damage);
                    match t.side {
                        Side::Hero(owner) if !t.is_alive() => Some(owner),
                        _ => None,
                    }
                });
                if let Some(hero) = fallen {
                    state.set_player_result(hero, GameResult::Lose);
                }
                true
            }

            SkirmishAction::Rest(id) => {
                let restable = state.data().figures.get(id).is_some_and(|f| {
                    f.is_hero() && f.health < f.max_health && can_act(state, player, f)
                });
                if !restable {
                    return false;
                }
                if let Some(f) = state.data_mut().figures.get_mut(id) {
                    f.set_health(f.health + HERO_REST);
                    f.has_acted = true;
                }
                true
            }

            SkirmishAction::Pass => {
                // An overlord pass spends the acting monster's activation.
                if player == REACTIVE_SLOT {
                    if let Some(id) = acting_monster(state) {
                        if let Some(f) = state.data_mut().figures.get_mut(id) {
                            f.has_acted = true;
                        }
                    }
                }
                true
            }
        }
    }
}

/// Rules and setup for a skirmish.
#[derive(Clone, Debug)]
pub struct SkirmishRules {
    config: EngineConfig,
    groups: usize,
    monsters_per_group: usize,
}

impl SkirmishRules {
    pub fn new(config: EngineConfig) -> Self {
        assert!(
            (2..=5).contains(&config.player_count),
            "Player count must be 2-5 (overlord plus 1-4 heroes)"
        );
        Self {
            config,
            groups: 2,
            monsters_per_group: 2,
        }
    }

    #[must_use]
    pub fn with_groups(mut self, groups: usize, monsters_per_group: usize) -> Self {
        assert!(monsters_per_group <= 4, "At most 4 monsters per group");
        self.groups = groups;
        self.monsters_per_group = monsters_per_group;
        self
    }
}

impl RulesEngine<Skirmish> for SkirmishRules {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn setup(&self) -> GameState<Skirmish> {
        let n = self.config.player_count;
        let data = SkirmishData {
            figures: ComponentStore::new(),
            heroes: PlayerMap::with_value(n, None),
            groups: Vec::with_capacity(self.groups),
        };
        let rounds = self.config.max_rounds.or(Some(DEFAULT_ROUNDS));
        let order = InterleavedTurnOrder::new(n).with_max_rounds(rounds);
        let mut state = GameState::<Skirmish>::new(&self.config, data, order);

        for player in PlayerId::all(n).skip(1) {
            let id = state.spawn(|d| &mut d.figures, |id| Figure::hero(id, player));
            state.data_mut().heroes[player] = Some(id);
        }
        for group in 0..self.groups {
            let members = (0..self.monsters_per_group)
                .map(|_| state.spawn(|d| &mut d.figures, |id| Figure::monster(id, group)))
                .collect();
            state.data_mut().groups.push(members);
        }

        state
    }

    fn legal_actions(&self, state: &GameState<Skirmish>, player: PlayerId) -> Vec<SkirmishAction> {
        if !state.is_ongoing() || state.current_player() != player {
            return vec![];
        }
        let data = state.data();
        let mut actions = Vec::new();

        let actors: Vec<&Figure> = if player == REACTIVE_SLOT {
            acting_monster(state)
                .and_then(|id| data.figures.get(id))
                .into_iter()
                .collect()
        } else {
            data.heroes[player]
                .and_then(|id| data.figures.get(id))
                .into_iter()
                .collect()
        };

        for actor in actors.into_iter().filter(|f| can_act(state, player, f)) {
            for target in data.living(!actor.is_hero()) {
                actions.push(SkirmishAction::Attack {
                    attacker: actor.id,
                    target: target.id,
                });
            }
            if actor.is_hero() && actor.health < actor.max_health {
                actions.push(SkirmishAction::Rest(actor.id));
            }
        }

        actions.push(SkirmishAction::Pass);
        actions
    }

    fn after_action(&self, state: &mut GameState<Skirmish>, player: PlayerId, _action: &SkirmishAction) {
        if player == REACTIVE_SLOT {
            advance_figure(state);
        }
        if state.data().monsters_alive() == 0 {
            let outcome = state.outcome_mut();
            outcome.set_player(REACTIVE_SLOT, GameResult::Lose);
            outcome.settle_remaining(GameResult::Win);
            outcome.set_status(GameResult::GameEnd);
        } else if state.data().heroes_alive() == 0 {
            state.outcome_mut().declare_winner(REACTIVE_SLOT);
        }
    }

    /// The overlord keeps the turn until every member of the activated
    /// group has had its go.
    fn continues_turn(&self, state: &GameState<Skirmish>, player: PlayerId) -> bool {
        player == REACTIVE_SLOT && state.turn_order().figure_next() > 0
    }

    /// Running out of rounds is a win for the overlord.
    fn end_game(&self, state: &mut GameState<Skirmish>) {
        let outcome = state.outcome_mut();
        if outcome.player(REACTIVE_SLOT).is_ongoing() {
            outcome.set_player(REACTIVE_SLOT, GameResult::Win);
        }
        outcome.settle_remaining(GameResult::Lose);
    }
}

/// Share of the other side's health knocked out.
pub fn skirmish_heuristic(state: &GameState<Skirmish>, player: PlayerId) -> f64 {
    let enemy_is_hero = player == REACTIVE_SLOT;
    let (now, max) = state.data().total_health(enemy_is_hero);
    if max == 0 {
        return 1.0;
    }
    1.0 - f64::from(now) / f64::from(max)
}
