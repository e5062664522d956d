//! Swiss chess tournament manager: library with models and the pairing/ranking engine.

pub mod logic;
pub mod models;

pub use logic::{
    apply_round, buchholz, direct_encounter, export_snapshot, generate_next_round, import_snapshot,
    pair_players, parse_results, rank, rank_with, sonneborn_berger, standings, standings_with,
    submit_results, tie_breaks, DirectEncounterScope, Standing, TieBreaks, TournamentSnapshot,
};
pub use models::{
    Board, Color, GameResult, Gender, Outcome, PairingError, Player, PlayerId, Result, Round,
    Tournament, TournamentError, MAX_AGE, MAX_RATING, MIN_AGE, MIN_RATING,
};
