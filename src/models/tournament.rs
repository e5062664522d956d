//! Tournament aggregate and the error taxonomy.

use crate::models::player::{Gender, Player, PlayerId, MAX_AGE, MAX_RATING, MIN_AGE, MIN_RATING};
use crate::models::round::Round;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why no next round could be paired. The tournament is left unchanged.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PairingError {
    #[error("Need at least 2 players to pair a round (have {0})")]
    NotEnoughPlayers(usize),
    /// Odd player count but everyone has already had a bye.
    #[error("Odd number of players and every player already had a bye")]
    NoByeCandidate,
    /// Greedy pairing found no unplayed opponent inside the player's score group.
    #[error("No valid Swiss pairing possible: player {player} has no new opponent in score group {score}")]
    NoLegalOpponent { player: PlayerId, score: f64 },
}

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Malformed input: registration fields, outcomes, result batches, snapshots.
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error(transparent)]
    Pairing(#[from] PairingError),
    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = TournamentError> = std::result::Result<T, E>;

/// Full tournament state: players, completed rounds, round counter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub name: String,
    /// Players in registration order.
    pub players: Vec<Player>,
    /// Completed rounds, oldest first.
    pub rounds: Vec<Round>,
    /// Number of completed rounds.
    pub round_number: u32,
}

impl Tournament {
    /// Create an empty tournament.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            players: Vec::new(),
            rounds: Vec::new(),
            round_number: 0,
        }
    }

    /// Register a player and return their id. Names are trimmed; duplicates are allowed.
    pub fn register_player(
        &mut self,
        name: &str,
        rating: u32,
        gender: Option<Gender>,
        age: Option<u32>,
    ) -> Result<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::Validation("player name is empty".into()));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(TournamentError::Validation(format!(
                "rating {rating} outside {MIN_RATING}..={MAX_RATING}"
            )));
        }
        if let Some(age) = age {
            if !(MIN_AGE..=MAX_AGE).contains(&age) {
                return Err(TournamentError::Validation(format!(
                    "age {age} outside {MIN_AGE}..={MAX_AGE}"
                )));
            }
        }
        let id = self.next_player_id();
        let mut player = Player::new(id, name, rating);
        player.gender = gender;
        player.age = age;
        self.players.push(player);
        log::debug!("Registered player {id} ({name}, {rating})");
        Ok(id)
    }

    /// Player by id.
    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    /// Mutable player by id.
    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    /// Sum of all players' scores.
    pub fn total_score(&self) -> f64 {
        self.players.iter().map(|p| p.score).sum()
    }

    fn next_player_id(&self) -> PlayerId {
        self.players.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }
}
