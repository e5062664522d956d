//! Tournament engine: ranking, pairing, result recording, snapshots.

mod pairing;
mod ranking;
mod results;
mod snapshot;

pub use pairing::{generate_next_round, pair_players};
pub use ranking::{
    buchholz, direct_encounter, rank, rank_with, sonneborn_berger, standings, standings_with,
    tie_breaks, DirectEncounterScope, Standing, TieBreaks,
};
pub use results::{apply_round, parse_results, submit_results};
pub use snapshot::{export_snapshot, import_snapshot, TournamentSnapshot};
