//! Trade post implementation.

use serde::{Deserialize, Serialize};

use crate::core::{
    Action, Component, ComponentId, ComponentStore, Deck, EngineConfig, Game, GameData, GameState,
    Observe, PlayerId, PlayerMap,
};
use crate::rules::RulesEngine;
use crate::turn::{ReactiveTurnOrder, RoundRobinOrder};

pub const DEFAULT_TARGET: u32 = 6;

/// Resource amounts indexed by [`Resource::index`].
pub type Bag = [u32; 4];

pub const SETTLEMENT_COST: Bag = [1, 1, 1, 0];
pub const CITY_COST: Bag = [0, 0, 2, 3];
pub const DEV_CARD_COST: Bag = [0, 1, 1, 1];
pub const STARTING_BAG: Bag = [1, 1, 1, 1];

const VICTORY_CARDS: usize = 5;
const HARVEST_CARDS: usize = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Lumber,
    Grain,
    Ore,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Grain,
        Resource::Ore,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    id: ComponentId,
    owner: PlayerId,
    city: bool,
}

impl Settlement {
    #[must_use]
    pub fn new(id: ComponentId, owner: PlayerId) -> Self {
        Self {
            id,
            owner,
            city: false,
        }
    }

    #[must_use]
    pub fn is_city(&self) -> bool {
        self.city
    }

    /// Settlement to city. False if it already is one.
    pub fn upgrade(&mut self) -> bool {
        if self.city {
            return false;
        }
        self.city = true;
        true
    }

    #[must_use]
    pub fn victory_points(&self) -> u32 {
        if self.city {
            2
        } else {
            1
        }
    }
}

impl Component for Settlement {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn owner(&self) -> Option<PlayerId> {
        Some(self.owner)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DevKind {
    VictoryPoint,
    /// One of each resource when bought.
    Harvest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DevCard {
    id: ComponentId,
    kind: DevKind,
    holder: Option<PlayerId>,
}

impl DevCard {
    #[must_use]
    pub fn kind(&self) -> DevKind {
        self.kind
    }
}

impl Component for DevCard {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn owner(&self) -> Option<PlayerId> {
        self.holder
    }
}

/// An open one-for-one trade offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Offer {
    pub from: PlayerId,
    pub to: PlayerId,
    /// What `from` hands over.
    pub give: Resource,
    /// What `from` wants back.
    pub take: Resource,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TradeData {
    pub bags: PlayerMap<Bag>,
    pub settlements: ComponentStore<Settlement>,
    pub cards: ComponentStore<DevCard>,
    pub dev_deck: Deck,
    pub offer: Option<Offer>,
    pub target: u32,
}

impl TradeData {
    fn new(player_count: usize, target: u32) -> Self {
        Self {
            bags: PlayerMap::with_value(player_count, STARTING_BAG),
            settlements: ComponentStore::new(),
            cards: ComponentStore::new(),
            dev_deck: Deck::new(),
            offer: None,
            target,
        }
    }

    #[must_use]
    pub fn can_afford(&self, player: PlayerId, cost: &Bag) -> bool {
        self.bags[player].iter().zip(cost).all(|(have, need)| have >= need)
    }

    /// Pay `cost`, or change nothing and return false.
    fn spend(&mut self, player: PlayerId, cost: &Bag) -> bool {
        if !self.can_afford(player, cost) {
            return false;
        }
        for (have, need) in self.bags[player].iter_mut().zip(cost) {
            *have -= need;
        }
        true
    }

    #[must_use]
    pub fn amount(&self, player: PlayerId, resource: Resource) -> u32 {
        self.bags[player][resource.index()]
    }

    #[must_use]
    pub fn victory_points(&self, player: PlayerId) -> u32 {
        let buildings: u32 = self
            .settlements
            .owned_by(player)
            .map(Settlement::victory_points)
            .sum();
        let cards = self
            .cards
            .owned_by(player)
            .filter(|c| c.kind == DevKind::VictoryPoint)
            .count() as u32;
        buildings + cards
    }

    /// Resources a gather yields: one per settlement, two per city, at
    /// least one.
    #[must_use]
    pub fn production(&self, player: PlayerId) -> u32 {
        self.settlements
            .owned_by(player)
            .map(Settlement::victory_points)
            .sum::<u32>()
            .max(1)
    }
}

impl GameData for TradeData {}

/// One seat's view of a trade post table.
///
/// Settlements and the open offer are public. Resource hands, card kinds
/// and the deck order are not: other seats show up as counts only.
#[derive(Clone, Debug, PartialEq)]
pub struct TradeView {
    pub bag: Bag,
    pub own_cards: Vec<DevKind>,
    pub hand_sizes: PlayerMap<u32>,
    pub card_counts: PlayerMap<usize>,
    pub settlements: Vec<Settlement>,
    /// Cards left in the development deck.
    pub deck_size: usize,
    pub offer: Option<Offer>,
    pub target: u32,
}

impl Observe for TradeData {
    type View = TradeView;

    fn observe(&self, player: PlayerId) -> TradeView {
        TradeView {
            bag: self.bags[player],
            own_cards: self.cards.owned_by(player).map(DevCard::kind).collect(),
            hand_sizes: self.bags.map(|_, bag| bag.iter().sum()),
            card_counts: PlayerMap::new(self.bags.player_count(), |p| {
                self.cards.owned_by(p).count()
            }),
            settlements: self.settlements.iter().cloned().collect(),
            deck_size: self.dev_deck.len(),
            offer: self.offer,
            target: self.target,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TradePost;

impl Game for TradePost {
    type Data = TradeData;
    type Order = ReactiveTurnOrder;
    type Action = TradeAction;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeAction {
    Gather,
    BuildSettlement,
    UpgradeSettlement(ComponentId),
    BuyDevelopmentCard,
    ProposeTrade {
        to: PlayerId,
        give: Resource,
        take: Resource,
    },
    AcceptTrade,
    DeclineTrade,
}

impl Action<TradePost> for TradeAction {
    fn execute(&self, state: &mut GameState<TradePost>) -> bool {
        let player = state.current_player();
        match *self {
            TradeAction::Gather => {
                let roll = state.rng_mut().roll_die(4);
                let resource = Resource::ALL[usize::from(roll - 1)];
                let data = state.data_mut();
                let amount = data.production(player);
                data.bags[player][resource.index()] += amount;
                true
            }

            TradeAction::BuildSettlement => {
                if !state.data_mut().spend(player, &SETTLEMENT_COST) {
                    return false;
                }
                state.spawn(|d| &mut d.settlements, |id| Settlement::new(id, player));
                true
            }

            TradeAction::UpgradeSettlement(id) => {
                let data = state.data_mut();
                let upgradable = data
                    .settlements
                    .get(id)
                    .is_some_and(|s| s.owner == player && !s.city);
                if !upgradable || !data.spend(player, &CITY_COST) {
                    return false;
                }
                data.settlements.get_mut(id).is_some_and(Settlement::upgrade)
            }

            TradeAction::BuyDevelopmentCard => {
                let data = state.data_mut();
                let Some((id, kind)) = data
                    .dev_deck
                    .peek()
                    .and_then(|id| data.cards.get(id).map(|card| (id, card.kind)))
                else {
                    return false;
                };
                if !data.spend(player, &DEV_CARD_COST) {
                    return false;
                }
                data.dev_deck.draw();
                if let Some(card) = data.cards.get_mut(id) {
                    card.holder = Some(player);
                }
                if kind == DevKind::Harvest {
                    data.bags[player].iter_mut().for_each(|r| *r += 1);
                }
                true
            }

            TradeAction::ProposeTrade { to, give, take } => {
                let valid = to != player
                    && to.index() < state.player_count()
                    && give != take
                    && state.player_result(to).is_ongoing()
                    && !state.turn_order().is_reacting()
                    && state.data().offer.is_none()
                    && state.data().amount(player, give) > 0;
                if !valid {
                    return false;
                }
                state.data_mut().offer = Some(Offer {
                    from: player,
                    to,
                    give,
                    take,
                });
                state.turn_order_mut().add_reactive_player(to);
                true
            }

            TradeAction::AcceptTrade => {
                let data = state.data_mut();
                let Some(offer) = data.offer.filter(|o| o.to == player) else {
                    return false;
                };
                if data.amount(offer.from, offer.give) == 0 || data.amount(offer.to, offer.take) == 0 {
                    return false;
                }
                data.bags[offer.from][offer.give.index()] -= 1;
                data.bags[offer.to][offer.give.index()] += 1;
                data.bags[offer.to][offer.take.index()] -= 1;
                data.bags[offer.from][offer.take.index()] += 1;
                data.offer = None;
                true
            }

            TradeAction::DeclineTrade => {
                let data = state.data_mut();
                if !data.offer.is_some_and(|o| o.to == player) {
                    return false;
                }
                data.offer = None;
                true
            }
        }
    }
}

/// Rules and setup for trade post.
#[derive(Clone, Debug)]
pub struct TradePostRules {
    config: EngineConfig,
    target: u32,
}

impl TradePostRules {
    pub fn new(config: EngineConfig) -> Self {
        assert!(
            (2..=6).contains(&config.player_count),
            "Player count must be 2-6"
        );
        Self {
            config,
            target: DEFAULT_TARGET,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: u32) -> Self {
        self.target = target;
        self
    }

    fn reaction_actions(data: &TradeData, offer: Offer) -> Vec<TradeAction> {
        let mut actions = Vec::with_capacity(2);
        if data.amount(offer.from, offer.give) > 0 && data.amount(offer.to, offer.take) > 0 {
            actions.push(TradeAction::AcceptTrade);
        }
        actions.push(TradeAction::DeclineTrade);
        actions
    }
}

impl RulesEngine<TradePost> for TradePostRules {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn setup(&self) -> GameState<TradePost> {
        let n = self.config.player_count;
        let rotation = RoundRobinOrder::new(n).with_max_rounds(self.config.max_rounds);
        let mut state = GameState::<TradePost>::new(
            &self.config,
            TradeData::new(n, self.target),
            ReactiveTurnOrder::from_rotation(rotation),
        );

        for player in PlayerId::all(n) {
            state.spawn(|d| &mut d.settlements, |id| Settlement::new(id, player));
        }

        let kinds = std::iter::repeat(DevKind::VictoryPoint)
            .take(VICTORY_CARDS)
            .chain(std::iter::repeat(DevKind::Harvest).take(HARVEST_CARDS));
        for kind in kinds {
            let id = state.spawn(
                |d| &mut d.cards,
                |id| DevCard {
                    id,
                    kind,
                    holder: None,
                },
            );
            state.data_mut().dev_deck.push_top(id);
        }

        let mut deck = std::mem::take(&mut state.data_mut().dev_deck);
        deck.shuffle(state.rng_mut());
        state.data_mut().dev_deck = deck;

        state
    }

    fn legal_actions(&self, state: &GameState<TradePost>, player: PlayerId) -> Vec<TradeAction> {
        if !state.is_ongoing() || state.current_player() != player {
            return vec![];
        }
        let data = state.data();

        if let Some(offer) = data.offer.filter(|o| o.to == player) {
            return Self::reaction_actions(data, offer);
        }

        let mut actions = vec![TradeAction::Gather];

        if data.can_afford(player, &SETTLEMENT_COST) {
            actions.push(TradeAction::BuildSettlement);
        }
        if data.can_afford(player, &CITY_COST) {
            actions.extend(
                data.settlements
                    .owned_by(player)
                    .filter(|s| !s.is_city())
                    .map(|s| TradeAction::UpgradeSettlement(s.id())),
            );
        }
        if !data.dev_deck.is_empty() && data.can_afford(player, &DEV_CARD_COST) {
            actions.push(TradeAction::BuyDevelopmentCard);
        }

        if data.offer.is_none() && !state.turn_order().is_reacting() {
            for to in state.outcome().active_players() {
                if to == player {
                    continue;
                }
                for give in Resource::ALL {
                    if data.amount(player, give) == 0 {
                        continue;
                    }
                    actions.extend(
                        Resource::ALL
                            .into_iter()
                            .filter(|&take| take != give)
                            .map(|take| TradeAction::ProposeTrade { to, give, take }),
                    );
                }
            }
        }

        actions
    }

    fn after_action(&self, state: &mut GameState<TradePost>, player: PlayerId, _action: &TradeAction) {
        if state.data().victory_points(player) >= state.data().target {
            state.outcome_mut().declare_winner(player);
        }
    }
}

/// Victory points towards the target, plus a little for resources in hand.
pub fn trade_heuristic(state: &GameState<TradePost>, player: PlayerId) -> f64 {
    let data = state.data();
    let points = f64::from(data.victory_points(player)) / f64::from(data.target.max(1));
    let hand: u32 = data.bags[player].iter().sum();
    points + f64::from(hand) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::StepOutcome;

    fn new_game(players: usize) -> (TradePostRules, GameState<TradePost>) {
        let rules = TradePostRules::new(EngineConfig::new(players).with_seed(5));
        let state = rules.setup();
        (rules, state)
    }

    fn p(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    #[test]
    fn test_setup() {
        let (_, state) = new_game(3);
        let data = state.data();
        assert_eq!(data.settlements.len(), 3);
        assert_eq!(data.cards.len(), VICTORY_CARDS + HARVEST_CARDS);
        assert_eq!(data.dev_deck.len(), VICTORY_CARDS + HARVEST_CARDS);
        for player in PlayerId::all(3) {
            assert_eq!(data.victory_points(player), 1);
            assert_eq!(data.bags[player], STARTING_BAG);
        }
    }

    #[test]
    fn test_setup_is_deterministic() {
        let (rules, state) = new_game(4);
        assert_eq!(rules.setup(), state);
    }

    #[test]
    fn test_build_settlement() {
        let (_, mut state) = new_game(2);
        assert!(TradeAction::BuildSettlement.execute(&mut state));
        assert_eq!(state.data().bags[p(0)], [0, 0, 0, 1]);
        assert_eq!(state.data().victory_points(p(0)), 2);

        // Out of brick now: nothing changes.
        let before = state.copy();
        assert!(!TradeAction::BuildSettlement.execute(&mut state));
        assert_eq!(state, before);
    }

    #[test]
    fn test_upgrade_settlement() {
        let (_, mut state) = new_game(2);
        let own = state.data().settlements.owned_by(p(0)).next().unwrap().id();
        let theirs = state.data().settlements.owned_by(p(1)).next().unwrap().id();

        assert!(!TradeAction::UpgradeSettlement(own).execute(&mut state));
        state.data_mut().bags[p(0)] = [0, 0, 4, 6];

        let before = state.copy();
        assert!(!TradeAction::UpgradeSettlement(theirs).execute(&mut state));
        assert_eq!(state, before);

        assert!(TradeAction::UpgradeSettlement(own).execute(&mut state));
        assert_eq!(state.data().victory_points(p(0)), 2);
        assert_eq!(state.data().bags[p(0)], [0, 0, 2, 3]);

        // Already a city.
        assert!(!TradeAction::UpgradeSettlement(own).execute(&mut state));
        assert_eq!(state.data().bags[p(0)], [0, 0, 2, 3]);
    }

    #[test]
    fn test_buy_development_card_with_empty_deck_spends_nothing() {
        let (_, mut state) = new_game(2);
        state.data_mut().dev_deck = Deck::new();

        let before = state.copy();
        assert!(!TradeAction::BuyDevelopmentCard.execute(&mut state));
        assert_eq!(state, before);
    }

    #[test]
    fn test_buy_development_card() {
        let (_, mut state) = new_game(2);
        let top = state.data().dev_deck.peek().unwrap();
        let kind = state.data().cards.get(top).unwrap().kind();

        assert!(TradeAction::BuyDevelopmentCard.execute(&mut state));
        let data = state.data();
        assert_eq!(data.cards.get(top).unwrap().owner(), Some(p(0)));
        assert_eq!(data.dev_deck.len(), VICTORY_CARDS + HARVEST_CARDS - 1);
        match kind {
            DevKind::VictoryPoint => {
                assert_eq!(data.victory_points(p(0)), 2);
                assert_eq!(data.bags[p(0)], [1, 0, 0, 0]);
            }
            DevKind::Harvest => assert_eq!(data.bags[p(0)], [2, 1, 1, 1]),
        }
    }

    #[test]
    fn test_buy_development_card_with_unknown_top_spends_nothing() {
        let (_, mut state) = new_game(2);
        state.data_mut().dev_deck.push_top(ComponentId(9_999));

        let before = state.copy();
        assert!(!TradeAction::BuyDevelopmentCard.execute(&mut state));
        assert_eq!(state, before);
        assert_eq!(state.data().bags[p(0)], STARTING_BAG);
        assert_eq!(state.data().dev_deck.peek(), Some(ComponentId(9_999)));
    }

    #[test]
    fn test_view_hides_deck_order() {
        let (_, state) = new_game(3);
        let mut reordered = state.copy();
        let reversed: Vec<_> = state.data().dev_deck.iter().collect();
        reordered.data_mut().dev_deck = reversed.into_iter().rev().collect();
        assert_ne!(reordered.data(), state.data());

        for player in PlayerId::all(3) {
            assert_eq!(reordered.observe(player), state.observe(player));
        }
        let view = state.observe(p(0));
        assert_eq!(view.data.deck_size, VICTORY_CARDS + HARVEST_CARDS);
        assert_eq!(view.data.settlements.len(), 3);
    }

    #[test]
    fn test_view_hides_other_players_cards() {
        let (_, mut state) = new_game(2);
        let id = state
            .data()
            .cards
            .iter()
            .find(|c| c.kind == DevKind::VictoryPoint)
            .unwrap()
            .id();
        state.data_mut().cards.get_mut(id).unwrap().holder = Some(p(1));
        state.data_mut().bags[p(1)] = [4, 0, 0, 0];

        let mut swapped = state.copy();
        swapped.data_mut().cards.get_mut(id).unwrap().kind = DevKind::Harvest;
        swapped.data_mut().bags[p(1)] = [0, 0, 0, 4];

        let theirs = state.observe(p(0)).data;
        assert!(theirs.own_cards.is_empty());
        assert_eq!(theirs.card_counts[p(1)], 1);
        assert_eq!(theirs.hand_sizes[p(1)], 4);
        assert_eq!(swapped.observe(p(0)), state.observe(p(0)));

        let own = state.observe(p(1)).data;
        assert_eq!(own.own_cards, vec![DevKind::VictoryPoint]);
        assert_eq!(own.bag, [4, 0, 0, 0]);
        assert_ne!(swapped.observe(p(1)), state.observe(p(1)));
    }

    #[test]
    fn test_trade_offer_is_answered_before_rotation() {
        let (rules, mut state) = new_game(3);
        let offer = TradeAction::ProposeTrade {
            to: p(2),
            give: Resource::Brick,
            take: Resource::Ore,
        };
        assert!(rules.legal_actions(&state, p(0)).contains(&offer));

        assert_eq!(rules.next(&mut state, &offer).unwrap(), StepOutcome::Applied);
        assert_eq!(state.current_player(), p(2));
        assert_eq!(
            rules.legal_actions(&state, p(2)),
            vec![TradeAction::AcceptTrade, TradeAction::DeclineTrade]
        );

        assert_eq!(rules.next(&mut state, &TradeAction::AcceptTrade).unwrap(), StepOutcome::Applied);
        assert_eq!(state.data().bags[p(0)], [0, 1, 1, 2]);
        assert_eq!(state.data().bags[p(2)], [2, 1, 1, 0]);
        assert_eq!(state.data().offer, None);
        assert_eq!(state.current_player(), p(1));
        assert_eq!(state.total_turns(), 1);
    }

    #[test]
    fn test_declined_trade_changes_nothing() {
        let (rules, mut state) = new_game(2);
        let offer = TradeAction::ProposeTrade {
            to: p(1),
            give: Resource::Grain,
            take: Resource::Lumber,
        };
        rules.next(&mut state, &offer).unwrap();
        rules.next(&mut state, &TradeAction::DeclineTrade).unwrap();

        assert_eq!(state.data().bags[p(0)], STARTING_BAG);
        assert_eq!(state.data().bags[p(1)], STARTING_BAG);
        assert_eq!(state.current_player(), p(1));
        assert!(!state.turn_order().is_reacting());
    }

    #[test]
    fn test_invalid_offers_rejected() {
        let (_, mut state) = new_game(2);
        let before = state.copy();

        let to_self = TradeAction::ProposeTrade {
            to: p(0),
            give: Resource::Brick,
            take: Resource::Ore,
        };
        let same = TradeAction::ProposeTrade {
            to: p(1),
            give: Resource::Brick,
            take: Resource::Brick,
        };
        assert!(!to_self.execute(&mut state));
        assert!(!same.execute(&mut state));
        assert!(!TradeAction::AcceptTrade.execute(&mut state));
        assert!(!TradeAction::DeclineTrade.execute(&mut state));
        assert_eq!(state, before);
    }

    #[test]
    fn test_reaching_target_wins() {
        let rules = TradePostRules::new(EngineConfig::new(2)).with_target(2);
        let mut state = rules.setup();

        rules.next(&mut state, &TradeAction::BuildSettlement).unwrap();
        assert_eq!(state.player_result(p(0)), crate::core::GameResult::Win);
        assert!(!state.is_ongoing());
    }

    #[test]
    fn test_gather_adds_production() {
        let (_, mut state) = new_game(2);
        assert!(TradeAction::Gather.execute(&mut state));
        let total: u32 = state.data().bags[p(0)].iter().sum();
        assert_eq!(total, 5);
    }
}
