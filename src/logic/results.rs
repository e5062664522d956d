//! Applying a played round back into player state.

use crate::models::{
    Color, GameResult, Outcome, Player, PlayerId, Result, Round, Tournament, TournamentError,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Parse raw `(white, black, outcome)` triples. Any bad outcome rejects the whole batch.
pub fn parse_results(raw: &[(PlayerId, PlayerId, &str)]) -> Result<Vec<GameResult>> {
    raw.iter()
        .map(|&(white, black, outcome)| {
            outcome
                .parse::<Outcome>()
                .map(|o| GameResult::new(white, black, o))
        })
        .collect()
}

/// Submit the results of the tournament's next round.
///
/// `round` must be numbered `round_number + 1`; after a successful submit it is
/// appended to the history, so submitting it a second time is rejected.
/// Nothing is changed when an error is returned.
pub fn submit_results(tournament: &mut Tournament, round: &Round, results: &[GameResult]) -> Result<()> {
    let expected = tournament.round_number + 1;
    if round.number != expected {
        return Err(TournamentError::Validation(format!(
            "round {} is not the next round (expected round {expected})",
            round.number
        )));
    }
    apply_round(&mut tournament.players, round, results)?;
    tournament.rounds.push(round.clone());
    tournament.round_number = expected;
    log::info!(
        "Recorded round {expected} of {:?}: {} games{}",
        tournament.name,
        results.len(),
        if round.bye().is_some() { ", 1 bye" } else { "" }
    );
    Ok(())
}

/// Apply `results` for `round` to `players`.
///
/// Appends colors, opponents and per-opponent points for both sides of every
/// game, adds the points to the scores, and credits the bye. The batch is
/// validated as a whole first, and a rematch or second bye rejects it.
pub fn apply_round(players: &mut [Player], round: &Round, results: &[GameResult]) -> Result<()> {
    let index: HashMap<PlayerId, usize> = players.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
    validate_round(players, &index, round)?;
    let ordered = match_results(round, results)?;

    for r in ordered {
        let (w_points, b_points) = r.outcome.points();
        players[index[&r.white]].record_game(Color::White, r.black, w_points);
        players[index[&r.black]].record_game(Color::Black, r.white, b_points);
    }
    if let Some(id) = round.bye() {
        players[index[&id]].record_bye();
    }
    Ok(())
}

/// Every id known, each player on at most one board, at most one bye,
/// no repeat opponents and no second bye.
fn validate_round(players: &[Player], index: &HashMap<PlayerId, usize>, round: &Round) -> Result<()> {
    let find = |id: PlayerId| lookup(players, index, id);

    let mut seen = HashSet::new();
    let mut byes = 0;
    for board in &round.boards {
        let ids = std::iter::once(board.white).chain(board.black);
        for id in ids {
            find(id)?;
            if !seen.insert(id) {
                return Err(TournamentError::Validation(format!(
                    "player {id} appears on more than one board"
                )));
            }
        }
        match board.black {
            None => {
                byes += 1;
                if find(board.white)?.had_bye {
                    return Err(TournamentError::Validation(format!(
                        "player {} already had a bye",
                        board.white
                    )));
                }
            }
            Some(black) => {
                if find(board.white)?.has_played(black) || find(black)?.has_played(board.white) {
                    return Err(TournamentError::Validation(format!(
                        "players {} and {black} have already met",
                        board.white
                    )));
                }
            }
        }
    }
    if byes > 1 {
        return Err(TournamentError::Validation(format!("round has {byes} byes")));
    }
    Ok(())
}

fn lookup<'a>(players: &'a [Player], index: &HashMap<PlayerId, usize>, id: PlayerId) -> Result<&'a Player> {
    index
        .get(&id)
        .map(|&i| &players[i])
        .ok_or(TournamentError::PlayerNotFound(id))
}

/// Exactly one result per game board, none for boards outside the round.
/// Returns the results in board order.
fn match_results<'a>(round: &Round, results: &'a [GameResult]) -> Result<Vec<&'a GameResult>> {
    let mut by_pair: BTreeMap<(PlayerId, PlayerId), &GameResult> = BTreeMap::new();
    for r in results {
        if by_pair.insert((r.white, r.black), r).is_some() {
            return Err(TournamentError::Validation(format!(
                "duplicate result for {} vs {}",
                r.white, r.black
            )));
        }
    }

    let mut ordered = Vec::with_capacity(results.len());
    for (white, black) in round.games() {
        let r = by_pair.remove(&(white, black)).ok_or_else(|| {
            TournamentError::Validation(format!("missing result for {white} vs {black}"))
        })?;
        ordered.push(r);
    }
    if let Some(((white, black), _)) = by_pair.into_iter().next() {
        return Err(TournamentError::Validation(format!(
            "result for {white} vs {black} does not match any board of round {}",
            round.number
        )));
    }
    Ok(ordered)
}
