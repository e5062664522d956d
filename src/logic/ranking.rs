//! Standings: score, Buchholz, Sonneborn-Berger, direct encounter, rating.

use crate::models::{Gender, Player, PlayerId, Tournament};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Which opponents count towards the direct-encounter tie-break.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectEncounterScope {
    /// Only opponents tied with the player on score.
    #[default]
    TiedOpponents,
    /// Every recorded opponent.
    AllOpponents,
}

/// Tie-break values of one player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TieBreaks {
    pub score: f64,
    pub buchholz: f64,
    pub sonneborn_berger: f64,
    /// Only computed for final standings.
    pub direct_encounter: Option<f64>,
    pub rating: u32,
}

impl TieBreaks {
    /// Descending comparison over all criteria, direct encounter only if present.
    fn cmp_desc(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.buchholz.total_cmp(&self.buchholz))
            .then_with(|| other.sonneborn_berger.total_cmp(&self.sonneborn_berger))
            .then_with(|| match (self.direct_encounter, other.direct_encounter) {
                (Some(a), Some(b)) => b.total_cmp(&a),
                _ => Ordering::Equal,
            })
            .then_with(|| other.rating.cmp(&self.rating))
    }
}

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based position.
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub rating: u32,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub score: f64,
    pub buchholz: f64,
    pub sonneborn_berger: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub direct_encounter: Option<f64>,
}

fn scores_by_id(players: &[Player]) -> HashMap<PlayerId, f64> {
    players.iter().map(|p| (p.id, p.score)).collect()
}

/// Sum of the current scores of every recorded opponent.
pub fn buchholz(player: &Player, players: &[Player]) -> f64 {
    let scores = scores_by_id(players);
    buchholz_with(player, &scores)
}

/// Sum of opponent score times the points obtained against that opponent.
pub fn sonneborn_berger(player: &Player, players: &[Player]) -> f64 {
    let scores = scores_by_id(players);
    sonneborn_berger_with(player, &scores)
}

/// Points obtained against opponents selected by `scope`.
pub fn direct_encounter(player: &Player, players: &[Player], scope: DirectEncounterScope) -> f64 {
    let scores = scores_by_id(players);
    direct_encounter_with(player, &scores, scope)
}

fn buchholz_with(player: &Player, scores: &HashMap<PlayerId, f64>) -> f64 {
    player
        .opponents
        .iter()
        .filter_map(|o| scores.get(o))
        .sum()
}

fn sonneborn_berger_with(player: &Player, scores: &HashMap<PlayerId, f64>) -> f64 {
    player
        .opponents
        .iter()
        .filter_map(|o| {
            let opp_score = scores.get(o)?;
            let points = player.results.get(o)?;
            Some(opp_score * points)
        })
        .sum()
}

fn direct_encounter_with(
    player: &Player,
    scores: &HashMap<PlayerId, f64>,
    scope: DirectEncounterScope,
) -> f64 {
    player
        .results
        .iter()
        .filter(|(opp, _)| match scope {
            DirectEncounterScope::AllOpponents => true,
            DirectEncounterScope::TiedOpponents => scores.get(*opp) == Some(&player.score),
        })
        .map(|(_, points)| points)
        .sum()
}

/// Compute tie-breaks for every player, in input order.
pub fn tie_breaks(players: &[Player], final_standings: bool, scope: DirectEncounterScope) -> Vec<TieBreaks> {
    let scores = scores_by_id(players);
    players
        .iter()
        .map(|p| TieBreaks {
            score: p.score,
            buchholz: buchholz_with(p, &scores),
            sonneborn_berger: sonneborn_berger_with(p, &scores),
            direct_encounter: final_standings.then(|| direct_encounter_with(p, &scores, scope)),
            rating: p.rating,
        })
        .collect()
}

/// Indices into `players`, best first. Full ties keep input order.
fn ranked_indices(players: &[Player], final_standings: bool, scope: DirectEncounterScope) -> (Vec<usize>, Vec<TieBreaks>) {
    let tb = tie_breaks(players, final_standings, scope);
    let mut order: Vec<usize> = (0..players.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| tb[a].cmp_desc(&tb[b]));
    (order, tb)
}

/// Rank players with the default direct-encounter scope.
pub fn rank(players: &[Player], final_standings: bool) -> Vec<PlayerId> {
    rank_with(players, final_standings, DirectEncounterScope::default())
}

/// Rank players, best first.
///
/// Sort key (descending): score, Buchholz, Sonneborn-Berger, direct encounter
/// (final standings only), rating.
pub fn rank_with(players: &[Player], final_standings: bool, scope: DirectEncounterScope) -> Vec<PlayerId> {
    let (order, _) = ranked_indices(players, final_standings, scope);
    order.into_iter().map(|i| players[i].id).collect()
}

/// Standings table of the tournament with the default direct-encounter scope.
pub fn standings(tournament: &Tournament, final_standings: bool) -> Vec<Standing> {
    standings_with(tournament, final_standings, DirectEncounterScope::default())
}

pub fn standings_with(
    tournament: &Tournament,
    final_standings: bool,
    scope: DirectEncounterScope,
) -> Vec<Standing> {
    let players = &tournament.players;
    let (order, tb) = ranked_indices(players, final_standings, scope);
    order
        .into_iter()
        .enumerate()
        .map(|(pos, i)| {
            let p = &players[i];
            Standing {
                rank: pos + 1,
                player_id: p.id,
                name: p.name.clone(),
                rating: p.rating,
                gender: p.gender,
                age: p.age,
                score: p.score,
                buchholz: tb[i].buchholz,
                sonneborn_berger: tb[i].sonneborn_berger,
                direct_encounter: tb[i].direct_encounter,
            }
        })
        .collect()
}
