//! Player record: identity, rating, score and per-game history.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Player identifier, sequential from 1 within a tournament.
pub type PlayerId = u32;

/// Lowest accepted rating.
pub const MIN_RATING: u32 = 0;
/// Highest accepted rating.
pub const MAX_RATING: u32 = 3000;
/// Accepted age range (descriptive attribute only).
pub const MIN_AGE: u32 = 5;
pub const MAX_AGE: u32 = 100;

/// Piece color a player had in one game.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A registered player and everything the engine knows about their games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub rating: u32,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub age: Option<u32>,
    /// Cumulative points, always a multiple of 0.5.
    pub score: f64,
    /// One entry per game played (byes excluded), parallel to `opponents`.
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub opponents: Vec<PlayerId>,
    /// Points obtained against each opponent (1, 0.5 or 0).
    #[serde(default)]
    pub results: BTreeMap<PlayerId, f64>,
    #[serde(default)]
    pub had_bye: bool,
}

impl Player {
    /// New player with zero score and empty histories.
    pub fn new(id: PlayerId, name: impl Into<String>, rating: u32) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            gender: None,
            age: None,
            score: 0.0,
            colors: Vec::new(),
            opponents: Vec::new(),
            results: BTreeMap::new(),
            had_bye: false,
        }
    }

    /// True when `opponent` appears in the game history.
    pub fn has_played(&self, opponent: PlayerId) -> bool {
        self.opponents.contains(&opponent)
    }

    /// Games played with White.
    pub fn whites(&self) -> usize {
        self.colors.iter().filter(|c| **c == Color::White).count()
    }

    /// Games played with Black.
    pub fn blacks(&self) -> usize {
        self.colors.iter().filter(|c| **c == Color::Black).count()
    }

    /// True when the player has had strictly more Whites than Blacks.
    pub fn owes_black(&self) -> bool {
        self.whites() > self.blacks()
    }

    /// Record one played game: color, opponent and points obtained.
    pub fn record_game(&mut self, color: Color, opponent: PlayerId, points: f64) {
        self.colors.push(color);
        self.opponents.push(opponent);
        self.results.insert(opponent, points);
        self.score += points;
    }

    /// Record the round's bye (counts as a win).
    pub fn record_bye(&mut self) {
        self.had_bye = true;
        self.score += 1.0;
    }
}
