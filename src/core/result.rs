//! Terminal-condition bookkeeping.
//!
//! `GameResult` is used both per player (has this seat won, lost, drawn,
//! or is it still playing?) and for the game as a whole (`Ongoing` until
//! something ends it, then `GameEnd`). `Outcome` holds both and is owned by
//! the game state.

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerMap};

/// Result status of a player or of the whole game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    #[default]
    Ongoing,
    Win,
    Lose,
    Draw,
    /// The game stopped without a per-player verdict (e.g. nobody left to act).
    GameEnd,
}

impl GameResult {
    #[must_use]
    pub fn is_ongoing(self) -> bool {
        self == GameResult::Ongoing
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !self.is_ongoing()
    }

    /// Reward in `[0, 1]` used by playout evaluation.
    #[must_use]
    pub fn reward(self) -> f64 {
        match self {
            GameResult::Win => 1.0,
            GameResult::Lose => 0.0,
            GameResult::Draw | GameResult::GameEnd | GameResult::Ongoing => 0.5,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GameResult::Ongoing => "ONGOING",
            GameResult::Win => "WIN",
            GameResult::Lose => "LOSE",
            GameResult::Draw => "DRAW",
            GameResult::GameEnd => "GAME_END",
        };
        f.write_str(label)
    }
}

/// Per-player results plus the overall game status.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    status: GameResult,
    players: PlayerMap<GameResult>,
}

impl Outcome {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            status: GameResult::Ongoing,
            players: PlayerMap::with_default(player_count),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn status(&self) -> GameResult {
        self.status
    }

    pub fn set_status(&mut self, status: GameResult) {
        self.status = status;
    }

    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.status.is_ongoing()
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> GameResult {
        self.players[player]
    }

    /// Record a player's result. A terminal result removes the player from
    /// every future rotation.
    pub fn set_player(&mut self, player: PlayerId, result: GameResult) {
        self.players[player] = result;
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<GameResult> {
        &self.players
    }

    /// Seats still in the game.
    #[must_use]
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.players.players_where(|r| r.is_ongoing())
    }

    #[must_use]
    pub fn all_players_finished(&self) -> bool {
        self.players.values().all(|r| r.is_terminal())
    }

    /// `player` wins, every other still-playing seat loses, game over.
    pub fn declare_winner(&mut self, player: PlayerId) {
        for (seat, result) in self.players.iter_mut() {
            if seat == player {
                *result = GameResult::Win;
            } else if result.is_ongoing() {
                *result = GameResult::Lose;
            }
        }
        self.status = GameResult::GameEnd;
    }

    /// Every still-playing seat becomes `result`.
    pub fn settle_remaining(&mut self, result: GameResult) {
        for (_, r) in self.players.iter_mut() {
            if r.is_ongoing() {
                *r = result;
            }
        }
    }

    #[must_use]
    pub fn winners(&self) -> Vec<PlayerId> {
        self.players.players_where(|r| *r == GameResult::Win)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_outcome_is_ongoing() {
        let outcome = Outcome::new(3);
        assert!(outcome.is_ongoing());
        assert_eq!(outcome.active_players().len(), 3);
        assert!(!outcome.all_players_finished());
    }

    #[test]
    fn test_declare_winner() {
        let mut outcome = Outcome::new(3);
        outcome.set_player(PlayerId::new(2), GameResult::Draw);
        outcome.declare_winner(PlayerId::new(1));

        assert_eq!(outcome.status(), GameResult::GameEnd);
        assert_eq!(outcome.player(PlayerId::new(0)), GameResult::Lose);
        assert_eq!(outcome.player(PlayerId::new(1)), GameResult::Win);
        // Already-terminal seats keep their result.
        assert_eq!(outcome.player(PlayerId::new(2)), GameResult::Draw);
        assert_eq!(outcome.winners(), vec![PlayerId::new(1)]);
        assert!(outcome.all_players_finished());
    }

    #[test]
    fn test_settle_remaining() {
        let mut outcome = Outcome::new(2);
        outcome.set_player(PlayerId::new(0), GameResult::Lose);
        outcome.settle_remaining(GameResult::Draw);
        assert_eq!(outcome.player(PlayerId::new(0)), GameResult::Lose);
        assert_eq!(outcome.player(PlayerId::new(1)), GameResult::Draw);
    }

    #[test]
    fn test_display_and_reward() {
        assert_eq!(GameResult::GameEnd.to_string(), "GAME_END");
        assert_eq!(GameResult::Win.reward(), 1.0);
        assert_eq!(GameResult::Lose.reward(), 0.0);
        assert!(GameResult::Draw.is_terminal());
    }
}
