//! Snapshot export/import: the whole tournament as one JSON document.

use crate::models::{
    Player, PlayerId, Result, Round, Tournament, TournamentError, MAX_AGE, MAX_RATING, MIN_AGE,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Serializable tournament state. Validated before it becomes a [`Tournament`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    #[serde(default)]
    pub name: String,
    pub players: Vec<Player>,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub round_number: u32,
}

fn invalid(msg: String) -> TournamentError {
    TournamentError::Validation(msg)
}

impl TournamentSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the snapshot as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load and validate a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&contents)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check player records and referential integrity of all histories.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for p in &self.players {
            if !ids.insert(p.id) {
                return Err(invalid(format!("duplicate player id {}", p.id)));
            }
        }
        let by_id: HashMap<PlayerId, &Player> = self.players.iter().map(|p| (p.id, p)).collect();

        for p in &self.players {
            validate_player(p, &by_id)?;
        }
        for p in &self.players {
            validate_pairings(p, &by_id)?;
        }

        if self.round_number as usize != self.rounds.len() {
            return Err(invalid(format!(
                "round_number {} but {} rounds recorded",
                self.round_number,
                self.rounds.len()
            )));
        }
        for (i, round) in self.rounds.iter().enumerate() {
            if round.number as usize != i + 1 {
                return Err(invalid(format!(
                    "round at position {} is numbered {}",
                    i + 1,
                    round.number
                )));
            }
            for board in &round.boards {
                for id in std::iter::once(board.white).chain(board.black) {
                    if !by_id.contains_key(&id) {
                        return Err(invalid(format!(
                            "round {} references unknown player {id}",
                            round.number
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_player(p: &Player, by_id: &HashMap<PlayerId, &Player>) -> Result<()> {
    let id = p.id;
    if p.name.trim().is_empty() {
        return Err(invalid(format!("player {id} has an empty name")));
    }
    if p.rating > MAX_RATING {
        return Err(invalid(format!("player {id} has rating {} above {MAX_RATING}", p.rating)));
    }
    if let Some(age) = p.age {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(invalid(format!(
                "player {id} has age {age} outside {MIN_AGE}..={MAX_AGE}"
            )));
        }
    }
    if !p.score.is_finite() || p.score < 0.0 || (p.score * 2.0).fract() != 0.0 {
        return Err(invalid(format!("player {id} has invalid score {}", p.score)));
    }
    if p.colors.len() != p.opponents.len() {
        return Err(invalid(format!(
            "player {id} has {} colors but {} opponents",
            p.colors.len(),
            p.opponents.len()
        )));
    }

    let mut met = HashSet::new();
    for &opp in &p.opponents {
        if opp == id {
            return Err(invalid(format!("player {id} is listed as their own opponent")));
        }
        if !by_id.contains_key(&opp) {
            return Err(invalid(format!("player {id} references unknown opponent {opp}")));
        }
        if !met.insert(opp) {
            return Err(invalid(format!("player {id} met opponent {opp} twice")));
        }
    }

    if p.results.len() != p.opponents.len() {
        return Err(invalid(format!(
            "player {id} has {} results for {} opponents",
            p.results.len(),
            p.opponents.len()
        )));
    }
    for (opp, points) in &p.results {
        if !met.contains(opp) {
            return Err(invalid(format!("player {id} has a result against non-opponent {opp}")));
        }
        if ![0.0, 0.5, 1.0].contains(points) {
            return Err(invalid(format!("player {id} has result {points} against {opp}")));
        }
    }

    let earned: f64 = p.results.values().sum::<f64>() + if p.had_bye { 1.0 } else { 0.0 };
    if p.score != earned {
        return Err(invalid(format!(
            "player {id} has score {} but results add up to {earned}",
            p.score
        )));
    }
    Ok(())
}

/// Both sides of every game agree: mutual opponents, opposite colors,
/// points adding up to one.
fn validate_pairings(p: &Player, by_id: &HashMap<PlayerId, &Player>) -> Result<()> {
    let id = p.id;
    for (&opp, &color) in p.opponents.iter().zip(&p.colors) {
        let Some(other) = by_id.get(&opp) else {
            return Err(invalid(format!("player {id} references unknown opponent {opp}")));
        };
        let Some(pos) = other.opponents.iter().position(|&o| o == id) else {
            return Err(invalid(format!(
                "player {id} lists {opp} as an opponent but {opp} does not list {id}"
            )));
        };
        if other.colors[pos] == color {
            return Err(invalid(format!(
                "players {id} and {opp} both have {color:?} in their game"
            )));
        }
        let mine = p.results.get(&opp).copied().unwrap_or_default();
        let theirs = other.results.get(&id).copied().unwrap_or_default();
        if mine + theirs != 1.0 {
            return Err(invalid(format!(
                "results of {id} vs {opp} add up to {}",
                mine + theirs
            )));
        }
    }
    Ok(())
}

/// Copy the tournament's state into a snapshot.
pub fn export_snapshot(tournament: &Tournament) -> TournamentSnapshot {
    TournamentSnapshot {
        name: tournament.name.clone(),
        players: tournament.players.clone(),
        rounds: tournament.rounds.clone(),
        round_number: tournament.round_number,
    }
}

/// Replace all tournament state with `snapshot`. On error nothing is replaced.
pub fn import_snapshot(tournament: &mut Tournament, snapshot: TournamentSnapshot) -> Result<()> {
    *tournament = Tournament::try_from(snapshot)?;
    log::info!(
        "Imported tournament {:?}: {} players, {} rounds",
        tournament.name,
        tournament.players.len(),
        tournament.round_number
    );
    Ok(())
}

impl TryFrom<TournamentSnapshot> for Tournament {
    type Error = TournamentError;

    fn try_from(snapshot: TournamentSnapshot) -> Result<Self> {
        snapshot.validate()?;
        Ok(Tournament {
            name: snapshot.name,
            players: snapshot.players,
            rounds: snapshot.rounds,
            round_number: snapshot.round_number,
        })
    }
}

impl From<&Tournament> for TournamentSnapshot {
    fn from(tournament: &Tournament) -> Self {
        export_snapshot(tournament)
    }
}
