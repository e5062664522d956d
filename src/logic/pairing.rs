//! Swiss pairing: bye selection, greedy score-group pairing, color assignment.

use crate::logic::ranking::rank;
use crate::models::{Board, PairingError, Player, PlayerId, Round, Tournament};
use std::collections::HashMap;

/// Pair the tournament's next round. Does not modify the tournament.
pub fn generate_next_round(tournament: &Tournament) -> Result<Round, PairingError> {
    let number = tournament.round_number + 1;
    let round = pair_players(&tournament.players, number).inspect_err(|e| {
        log::warn!("Round {number} of {:?} could not be paired: {e}", tournament.name);
    })?;
    log::info!(
        "Paired round {number} of {:?}: {} boards",
        tournament.name,
        round.boards.len()
    );
    Ok(round)
}

/// Pair `players` into round `number`.
///
/// 1. Rank players (score, Buchholz, Sonneborn-Berger, rating).
/// 2. Odd count: the lowest-ranked player without a bye sits out with the bye.
/// 3. Walk score groups from the top; each player takes the first lower-ranked
///    player of the same group they have not met yet.
/// 4. Colors: a player with more Whites than Blacks gets Black, otherwise the
///    higher-ranked player of the pair gets White.
///
/// Fails instead of floating a player into another score group.
pub fn pair_players(players: &[Player], number: u32) -> Result<Round, PairingError> {
    if players.len() < 2 {
        return Err(PairingError::NotEnoughPlayers(players.len()));
    }

    let by_id: HashMap<PlayerId, &Player> = players.iter().map(|p| (p.id, p)).collect();
    let mut pool: Vec<&Player> = rank(players, false)
        .into_iter()
        .filter_map(|id| by_id.get(&id).copied())
        .collect();

    let bye = if pool.len() % 2 == 1 {
        let idx = pool
            .iter()
            .rposition(|p| !p.had_bye)
            .ok_or(PairingError::NoByeCandidate)?;
        let p = pool.remove(idx);
        log::debug!("Round {number}: bye to player {} ({})", p.id, p.name);
        Some(p.id)
    } else {
        None
    };

    let mut pairs: Vec<(PlayerId, PlayerId)> = Vec::with_capacity(pool.len() / 2);
    for group in pool.chunk_by(|a, b| a.score == b.score) {
        let mut unpaired: Vec<&Player> = group.to_vec();
        while !unpaired.is_empty() {
            let p1 = unpaired.remove(0);
            let pos = unpaired
                .iter()
                .position(|p2| !p1.has_played(p2.id) && !p2.has_played(p1.id))
                .ok_or(PairingError::NoLegalOpponent {
                    player: p1.id,
                    score: p1.score,
                })?;
            let p2 = unpaired.remove(pos);
            pairs.push(assign_colors(p1, p2));
        }
    }

    let mut boards: Vec<Board> = pairs
        .into_iter()
        .map(|(white, black)| Board {
            number: 0,
            white,
            black: Some(black),
        })
        .collect();
    if let Some(id) = bye {
        boards.push(Board {
            number: 0,
            white: id,
            black: None,
        });
    }
    for (i, b) in boards.iter_mut().enumerate() {
        b.number = i as u32 + 1;
    }

    Ok(Round { number, boards })
}

/// Returns `(white, black)`. `p1` is the higher-ranked player of the pair.
fn assign_colors(p1: &Player, p2: &Player) -> (PlayerId, PlayerId) {
    if p1.owes_black() {
        (p2.id, p1.id)
    } else {
        // p2 owing Black and nobody owing Black both give p1 White
        (p1.id, p2.id)
    }
}
