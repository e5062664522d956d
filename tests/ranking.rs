//! Standings and tie-breaks.

mod common;

use common::{play_round, tournament_with_ratings};
use swiss_chess_tournament::{
    buchholz, direct_encounter, rank, rank_with, sonneborn_berger, standings, standings_with,
    DirectEncounterScope, Player, PlayerId, Tournament,
};

/// Two rounds on four players:
/// R1: 1-2 1-0, 3-4 1-0. R2: 3-1 draw, 2-4 1-0.
/// Scores 1: 1.5, 3: 1.5, 2: 1, 4: 0.
fn two_round_tournament() -> Tournament {
    let mut t = tournament_with_ratings(&[1800, 1700, 1600, 1500]);
    play_round(&mut t, &["1-0", "1-0"]);
    play_round(&mut t, &["draw", "1-0"]);
    t
}

#[test]
fn buchholz_and_sonneborn_berger() {
    let t = two_round_tournament();
    let expected = [
        // (id, score, buchholz, sonneborn-berger)
        (1, 1.5, 2.5, 1.75),
        (2, 1.0, 1.5, 0.0),
        (3, 1.5, 1.5, 0.75),
        (4, 0.0, 2.5, 0.0),
    ];
    for (id, score, bh, sb) in expected {
        let p = t.player(id).unwrap();
        assert_eq!(p.score, score, "score of {id}");
        assert_eq!(buchholz(p, &t.players), bh, "buchholz of {id}");
        assert_eq!(sonneborn_berger(p, &t.players), sb, "sonneborn-berger of {id}");
    }
}

#[test]
fn rank_orders_by_score_then_buchholz() {
    let t = two_round_tournament();
    assert_eq!(rank(&t.players, false), vec![1, 3, 2, 4]);
    assert_eq!(rank(&t.players, true), vec![1, 3, 2, 4]);
}

#[test]
fn direct_encounter_scopes() {
    let t = two_round_tournament();
    let tied = DirectEncounterScope::TiedOpponents;
    let all = DirectEncounterScope::AllOpponents;
    let de = |id: PlayerId, scope| direct_encounter(t.player(id).unwrap(), &t.players, scope);

    // 1 and 3 are tied on 1.5 and drew.
    assert_eq!(de(1, tied), 0.5);
    assert_eq!(de(3, tied), 0.5);
    assert_eq!(de(2, tied), 0.0);
    assert_eq!(de(4, tied), 0.0);

    assert_eq!(de(1, all), 1.5);
    assert_eq!(de(3, all), 1.5);
    assert_eq!(de(2, all), 1.0);
    assert_eq!(de(4, all), 0.0);
}

#[test]
fn standings_rows() {
    let t = two_round_tournament();

    let rows = standings(&t, false);
    let ids: Vec<PlayerId> = rows.iter().map(|r| r.player_id).collect();
    assert_eq!(ids, vec![1, 3, 2, 4]);
    assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert!(rows.iter().all(|r| r.direct_encounter.is_none()));
    assert_eq!(rows[0].name, "P1");
    assert_eq!(rows[0].buchholz, 2.5);
    assert_eq!(rows[0].sonneborn_berger, 1.75);

    let final_rows = standings(&t, true);
    assert_eq!(final_rows[0].direct_encounter, Some(0.5));
    assert_eq!(final_rows[3].direct_encounter, Some(0.0));
}

fn player(id: PlayerId, rating: u32, score: f64, results: &[(PlayerId, f64)]) -> Player {
    let mut p = Player::new(id, format!("P{id}"), rating);
    p.score = score;
    p.opponents = results.iter().map(|(o, _)| *o).collect();
    p.results = results.iter().copied().collect();
    p
}

/// A and B tie on score, Buchholz (3) and Sonneborn-Berger (2); A beat B head to head,
/// B is higher rated. Over all opponents both have 1.5 points.
fn head_to_head_players() -> Vec<Player> {
    vec![
        player(1, 1500, 1.0, &[(2, 1.0), (3, 0.5)]),
        player(2, 1800, 1.0, &[(1, 0.0), (4, 1.0), (5, 0.5)]),
        player(3, 1000, 2.0, &[(1, 0.5)]),
        player(4, 1000, 2.0, &[(2, 0.0)]),
        player(5, 1000, 0.0, &[(2, 0.5)]),
    ]
}

#[test]
fn direct_encounter_only_counts_for_final_standings() {
    let players = head_to_head_players();
    assert_eq!(buchholz(&players[0], &players), buchholz(&players[1], &players));
    assert_eq!(
        sonneborn_berger(&players[0], &players),
        sonneborn_berger(&players[1], &players)
    );

    assert_eq!(rank(&players, false), vec![3, 4, 2, 1, 5]);
    assert_eq!(rank(&players, true), vec![3, 4, 1, 2, 5]);
}

#[test]
fn all_opponents_scope_falls_through_to_rating() {
    let players = head_to_head_players();
    assert_eq!(
        rank_with(&players, true, DirectEncounterScope::AllOpponents),
        vec![3, 4, 2, 1, 5]
    );
    assert_eq!(
        rank_with(&players, true, DirectEncounterScope::TiedOpponents),
        vec![3, 4, 1, 2, 5]
    );
}

#[test]
fn standings_with_scope_reports_chosen_direct_encounter() {
    let mut t = Tournament::new("Handcrafted");
    t.players = head_to_head_players();
    let rows = standings_with(&t, true, DirectEncounterScope::AllOpponents);
    let a = rows.iter().find(|r| r.player_id == 1).unwrap();
    assert_eq!(a.direct_encounter, Some(1.5));
    let rows = standings_with(&t, true, DirectEncounterScope::TiedOpponents);
    let a = rows.iter().find(|r| r.player_id == 1).unwrap();
    assert_eq!(a.direct_encounter, Some(1.0));
}

#[test]
fn full_ties_keep_registration_order() {
    let t = tournament_with_ratings(&[1500, 1500, 1500, 1500]);
    assert_eq!(rank(&t.players, false), vec![1, 2, 3, 4]);
    assert_eq!(rank(&t.players, true), vec![1, 2, 3, 4]);
}

#[test]
fn rank_is_deterministic() {
    let t = two_round_tournament();
    let first = rank(&t.players, true);
    for _ in 0..10 {
        assert_eq!(rank(&t.players, true), first);
    }
}
