//! Data structures for the Swiss tournament: players, rounds, tournament state.

mod player;
mod round;
mod tournament;

pub use player::{Color, Gender, Player, PlayerId, MAX_AGE, MAX_RATING, MIN_AGE, MIN_RATING};
pub use round::{Board, GameResult, Outcome, Round};
pub use tournament::{PairingError, Result, Tournament, TournamentError};
