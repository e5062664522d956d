//! Result recording and submission.

mod common;

use common::{pairs, play_round, tournament_with_ratings};
use swiss_chess_tournament::{
    apply_round, generate_next_round, parse_results, submit_results, Color, GameResult, Outcome,
    Round, TournamentError,
};

#[test]
fn outcome_parsing() {
    assert_eq!("1-0".parse::<Outcome>().unwrap(), Outcome::WhiteWins);
    assert_eq!("0-1".parse::<Outcome>().unwrap(), Outcome::BlackWins);
    assert_eq!("draw".parse::<Outcome>().unwrap(), Outcome::Draw);
    assert_eq!("½-½".parse::<Outcome>().unwrap(), Outcome::Draw);
    assert!(matches!(
        "2-0".parse::<Outcome>(),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(Outcome::Draw.to_string(), "draw");
}

#[test]
fn outcome_json_names() {
    let r = GameResult::new(1, 2, Outcome::WhiteWins);
    assert_eq!(
        serde_json::to_string(&r).unwrap(),
        r#"{"white":1,"black":2,"outcome":"1-0"}"#
    );
    let draw: GameResult =
        serde_json::from_str(r#"{"white":1,"black":2,"outcome":"½-½"}"#).unwrap();
    assert_eq!(draw.outcome, Outcome::Draw);
    assert!(serde_json::from_str::<GameResult>(r#"{"white":1,"black":2,"outcome":"1-1"}"#).is_err());
}

#[test]
fn decisive_game_updates_both_players() {
    let mut t = tournament_with_ratings(&[1800, 1700]);
    play_round(&mut t, &["0-1"]);

    let white = t.player(1).unwrap();
    assert_eq!(white.score, 0.0);
    assert_eq!(white.colors, vec![Color::White]);
    assert_eq!(white.opponents, vec![2]);
    assert_eq!(white.results.get(&2), Some(&0.0));

    let black = t.player(2).unwrap();
    assert_eq!(black.score, 1.0);
    assert_eq!(black.colors, vec![Color::Black]);
    assert_eq!(black.opponents, vec![1]);
    assert_eq!(black.results.get(&1), Some(&1.0));

    assert_eq!(t.round_number, 1);
    assert_eq!(t.rounds.len(), 1);
}

#[test]
fn draw_gives_half_point_each() {
    let mut t = tournament_with_ratings(&[1800, 1700]);
    play_round(&mut t, &["draw"]);
    assert_eq!(t.player(1).unwrap().score, 0.5);
    assert_eq!(t.player(2).unwrap().score, 0.5);
    assert_eq!(t.player(1).unwrap().results.get(&2), Some(&0.5));
    assert_eq!(t.player(2).unwrap().results.get(&1), Some(&0.5));
}

#[test]
fn invalid_outcome_rejects_whole_batch() {
    let mut t = tournament_with_ratings(&[1800, 1700, 1600, 1500]);
    let round = generate_next_round(&t).unwrap();
    let before = t.clone();

    let err = parse_results(&[(1, 2, "1-0"), (3, 4, "white wins")]).unwrap_err();
    assert!(matches!(err, TournamentError::Validation(_)));
    assert_eq!(t, before);

    // the round can still be submitted afterwards
    let results = parse_results(&[(1, 2, "1-0"), (3, 4, "0-1")]).unwrap();
    submit_results(&mut t, &round, &results).unwrap();
    assert_eq!(t.total_score(), 2.0);
}

#[test]
fn missing_result_changes_nothing() {
    let mut t = tournament_with_ratings(&[1800, 1700, 1600, 1500]);
    let round = generate_next_round(&t).unwrap();
    let before = t.clone();
    let results = vec![GameResult::new(1, 2, Outcome::WhiteWins)];
    assert!(matches!(
        submit_results(&mut t, &round, &results),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(t, before);
}

#[test]
fn result_for_unknown_board_changes_nothing() {
    let mut t = tournament_with_ratings(&[1800, 1700, 1600, 1500]);
    let round = generate_next_round(&t).unwrap();
    let before = t.clone();
    let results = vec![
        GameResult::new(1, 2, Outcome::WhiteWins),
        GameResult::new(3, 4, Outcome::Draw),
        GameResult::new(1, 3, Outcome::Draw),
    ];
    assert!(matches!(
        submit_results(&mut t, &round, &results),
        Err(TournamentError::Validation(_))
    ));
    // colors swapped does not match the board either
    let swapped = vec![
        GameResult::new(2, 1, Outcome::WhiteWins),
        GameResult::new(3, 4, Outcome::Draw),
    ];
    assert!(matches!(
        submit_results(&mut t, &round, &swapped),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(t, before);
}

#[test]
fn same_round_cannot_be_submitted_twice() {
    let mut t = tournament_with_ratings(&[1800, 1700, 1600]);
    let round = generate_next_round(&t).unwrap();
    let results = parse_results(&[(1, 2, "1-0")]).unwrap();
    submit_results(&mut t, &round, &results).unwrap();
    let after_first = t.clone();

    assert!(matches!(
        submit_results(&mut t, &round, &results),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(t, after_first);
    assert_eq!(t.total_score(), 2.0);
}

#[test]
fn apply_round_rejects_rematch_and_second_bye() {
    let mut t = tournament_with_ratings(&[1800, 1700, 1600]);
    let round = generate_next_round(&t).unwrap();
    let results = parse_results(&[(1, 2, "draw")]).unwrap();
    apply_round(&mut t.players, &round, &results).unwrap();
    let after_first = t.clone();

    // Re-applying the same boards would repeat 1-2 and give 3 a second bye.
    assert!(matches!(
        apply_round(&mut t.players, &round, &results),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(t, after_first);
}

#[test]
fn unknown_player_in_round_is_not_found() {
    let mut t = tournament_with_ratings(&[1800, 1700]);
    let round: Round = serde_json::from_str(
        r#"{"number":1,"boards":[{"board":1,"white":1,"black":9}]}"#,
    )
    .unwrap();
    let results = vec![GameResult::new(1, 9, Outcome::Draw)];
    let before = t.clone();
    assert!(matches!(
        submit_results(&mut t, &round, &results),
        Err(TournamentError::PlayerNotFound(9))
    ));
    assert_eq!(t, before);
}

#[test]
fn bye_is_credited_once_with_the_round() {
    let mut t = tournament_with_ratings(&[1800, 1700, 1600]);
    let round = play_round(&mut t, &["1-0"]);
    assert_eq!(round.bye(), Some(3));
    let p3 = t.player(3).unwrap();
    assert!(p3.had_bye);
    assert_eq!(p3.score, 1.0);
    assert_eq!(t.rounds[0], round);
}

#[test]
fn rematch_with_colors_reversed_is_rejected() {
    let mut t = tournament_with_ratings(&[1800, 1700, 1600, 1500]);
    let first = play_round(&mut t, &["1-0", "draw"]);
    assert_eq!(pairs(&first), vec![(1, Some(2)), (3, Some(4))]);

    let round: Round = serde_json::from_str(
        r#"{"number":2,"boards":[{"board":1,"white":2,"black":1},{"board":2,"white":4,"black":3}]}"#,
    )
    .unwrap();
    let results = vec![
        GameResult::new(2, 1, Outcome::Draw),
        GameResult::new(4, 3, Outcome::Draw),
    ];
    let before = t.clone();
    assert!(matches!(
        submit_results(&mut t, &round, &results),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(t, before);
    assert_eq!(t.player(1).unwrap().opponents, vec![2]);
}
