//! Shared helpers for the integration tests.
#![allow(dead_code)]

use swiss_chess_tournament::{
    generate_next_round, parse_results, submit_results, PlayerId, Round, Tournament,
};

/// Tournament with players registered in the given rating order (ids 1..=n).
pub fn tournament_with_ratings(ratings: &[u32]) -> Tournament {
    let mut t = Tournament::new("Test Open");
    for (i, &rating) in ratings.iter().enumerate() {
        t.register_player(&format!("P{}", i + 1), rating, None, None)
            .unwrap();
    }
    t
}

/// Pair the next round and submit `outcomes`, one per game board in board order.
pub fn play_round(t: &mut Tournament, outcomes: &[&str]) -> Round {
    let round = generate_next_round(t).unwrap();
    let raw: Vec<(PlayerId, PlayerId, &str)> = round
        .games()
        .zip(outcomes.iter())
        .map(|((w, b), o)| (w, b, *o))
        .collect();
    assert_eq!(raw.len(), outcomes.len(), "one outcome per game board");
    let results = parse_results(&raw).unwrap();
    submit_results(t, &round, &results).unwrap();
    round
}

pub fn pairs(round: &Round) -> Vec<(PlayerId, Option<PlayerId>)> {
    round.boards.iter().map(|b| (b.white, b.black)).collect()
}
