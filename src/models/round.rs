//! Round, Board, and game outcomes.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One board of a round. `black` is `None` when `white` has the bye.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(rename = "board")]
    pub number: u32,
    pub white: PlayerId,
    pub black: Option<PlayerId>,
}

impl Board {
    pub fn is_bye(&self) -> bool {
        self.black.is_none()
    }
}

/// A round's pairings in board order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round number.
    pub number: u32,
    pub boards: Vec<Board>,
}

impl Round {
    /// The player who has the bye this round, if any.
    pub fn bye(&self) -> Option<PlayerId> {
        self.boards.iter().find(|b| b.is_bye()).map(|b| b.white)
    }

    /// Boards with an actual game, as `(white, black)`.
    pub fn games(&self) -> impl Iterator<Item = (PlayerId, PlayerId)> + '_ {
        self.boards
            .iter()
            .filter_map(|b| b.black.map(|black| (b.white, black)))
    }

    /// Whether `player` sits on any board of this round.
    pub fn contains(&self, player: PlayerId) -> bool {
        self.boards
            .iter()
            .any(|b| b.white == player || b.black == Some(player))
    }
}

/// Outcome of a single game, from White's point of view.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "draw", alias = "½-½", alias = "1/2-1/2")]
    Draw,
}

impl Outcome {
    /// Points for (white, black).
    pub fn points(self) -> (f64, f64) {
        match self {
            Outcome::WhiteWins => (1.0, 0.0),
            Outcome::BlackWins => (0.0, 1.0),
            Outcome::Draw => (0.5, 0.5),
        }
    }
}

impl FromStr for Outcome {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1-0" => Ok(Outcome::WhiteWins),
            "0-1" => Ok(Outcome::BlackWins),
            "draw" | "½-½" | "1/2-1/2" => Ok(Outcome::Draw),
            other => Err(TournamentError::Validation(format!(
                "unknown outcome {other:?} (expected \"1-0\", \"0-1\" or \"draw\")"
            ))),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::WhiteWins => "1-0",
            Outcome::BlackWins => "0-1",
            Outcome::Draw => "draw",
        };
        f.write_str(s)
    }
}

/// Result entered for one board.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub white: PlayerId,
    pub black: PlayerId,
    pub outcome: Outcome,
}

impl GameResult {
    pub fn new(white: PlayerId, black: PlayerId, outcome: Outcome) -> Self {
        Self {
            white,
            black,
            outcome,
        }
    }
}
