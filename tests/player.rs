//! Integration tests for player history and round application.

use dubov_pairing::{apply_results, Color, ColorPreference, GameResult, Outcome, PairingError, Player, Tournament};

fn with_colors(colors: &[Color]) -> Player {
    let mut p = Player::new(1, "P1", 2000);
    for &c in colors {
        p.add_color(c);
    }
    p
}

#[test]
fn due_color_and_preference_from_history() {
    use Color::*;
    let cases: &[(&[Color], Color, ColorPreference)] = &[
        (&[], NoColor, ColorPreference::NoPreference),
        (&[NoColor], NoColor, ColorPreference::NoPreference),
        (&[White], Black, ColorPreference::Mild),
        (&[White, Black], White, ColorPreference::Alternation),
        (&[White, White], Black, ColorPreference::Absolute),
        (&[White, Black, White], Black, ColorPreference::Mild),
        (&[White, NoColor, White], Black, ColorPreference::Absolute),
        (&[Black, Black, White, White], Black, ColorPreference::Absolute),
        (&[White, Black, Black, Black], White, ColorPreference::Absolute),
    ];
    for (colors, due, preference) in cases {
        let p = with_colors(colors);
        assert_eq!(p.due_color(), *due, "history {:?}", colors);
        assert_eq!(p.preference_strength(), *preference, "history {:?}", colors);
    }
}

#[test]
fn games_played_skips_uncoloured_rounds() {
    let p = with_colors(&[Color::White, Color::NoColor, Color::Black]);
    assert_eq!(p.games_played(), 2);
    assert_eq!(p.colors().len(), 3);
}

#[test]
fn score_never_decreases() {
    let mut p = Player::new(1, "P1", 2000);
    p.add_points(1.0);
    p.add_points(-0.5);
    p.add_points(0.5);
    assert_eq!(p.score(), 1.5);
}

#[test]
fn average_rating_of_opponents() {
    let mut p = Player::new(1, "P1", 2000);
    assert_eq!(p.aro(), 0.0);
    p.add_opponent(2, 1800);
    p.add_opponent(3, 2200);
    assert_eq!(p.aro(), 2000.0);
    assert_eq!(p.opponents(), &[2, 3]);
}

#[test]
fn absolute_criteria_between_two_players() {
    let mut a = Player::new(1, "A", 2000);
    let mut b = Player::new(2, "B", 1900);
    assert!(a.can_play(&b));
    assert!(!a.can_play(&a.clone()));

    a.add_restriction(2);
    assert!(!a.can_play(&b));
    assert!(!b.can_play(&a));

    let a = with_colors(&[Color::Black, Color::Black]);
    for c in [Color::Black, Color::Black] {
        b.add_color(c);
    }
    assert!(!a.can_play(&b));

    let mut c = Player::new(3, "C", 1800);
    c.add_opponent(1, 2000);
    assert!(!a.can_play(&c));
    assert!(!c.can_play(&a));
}

#[test]
fn float_limit_grows_with_length() {
    let mut p = Player::new(1, "P1", 2000);
    p.upfloats = 2;
    assert!(!p.can_upfloat(4));
    assert!(p.can_upfloat(9));
    p.upfloats = 3;
    assert!(!p.can_upfloat(9));
    assert!(p.can_upfloat(10));
}

fn four_players(total_rounds: u32) -> Tournament {
    let players: Vec<Player> = (1..=4).map(|i| Player::new(i, format!("P{}", i), 2000 - i * 100)).collect();
    Tournament::with_players(players, total_rounds).unwrap()
}

#[test]
fn forfeit_gives_points_but_no_game() {
    let mut t = four_players(3);
    apply_results(
        &mut t,
        &[
            GameResult::Game {
                white: 1,
                black: 2,
                outcome: Outcome::WhiteWinsByForfeit,
            },
            GameResult::Game {
                white: 3,
                black: 4,
                outcome: Outcome::Draw,
            },
        ],
    )
    .unwrap();
    let p1 = t.player(1).unwrap();
    assert_eq!(p1.score(), 1.0);
    assert!(p1.received_bye);
    assert!(!p1.has_played(2));
    assert_eq!(p1.colors(), &[Color::NoColor]);
    assert!(!t.player(2).unwrap().received_bye);
    assert_eq!(t.player(3).unwrap().colors(), &[Color::White]);
    assert!(t.player(4).unwrap().has_played(3));
}

#[test]
fn lower_scored_side_is_marked_as_upfloater() {
    let mut t = four_players(3);
    apply_results(
        &mut t,
        &[
            GameResult::Game {
                white: 1,
                black: 3,
                outcome: Outcome::WhiteWins,
            },
            GameResult::Game {
                white: 2,
                black: 4,
                outcome: Outcome::Draw,
            },
        ],
    )
    .unwrap();
    apply_results(
        &mut t,
        &[
            GameResult::Game {
                white: 2,
                black: 1,
                outcome: Outcome::Draw,
            },
            GameResult::Game {
                white: 4,
                black: 3,
                outcome: Outcome::WhiteWins,
            },
        ],
    )
    .unwrap();
    let p2 = t.player(2).unwrap();
    assert_eq!(p2.upfloats, 1);
    assert!(p2.upfloated_last_round);
    // 3 met 4 on half a point less
    assert_eq!(t.player(3).unwrap().upfloats, 1);
    assert_eq!(t.player(4).unwrap().upfloats, 0);
    assert!(!t.player(1).unwrap().upfloated_last_round);
    assert_eq!(t.rounds_played(), 2);
    assert_eq!(t.next_round(), 3);
}

#[test]
fn missing_players_are_recorded_absent() {
    let mut t = four_players(3);
    t.absent.insert(4);
    apply_results(
        &mut t,
        &[
            GameResult::Game {
                white: 1,
                black: 2,
                outcome: Outcome::WhiteWins,
            },
            GameResult::Bye { player: 3 },
        ],
    )
    .unwrap();
    let p4 = t.player(4).unwrap();
    assert_eq!(p4.colors(), &[Color::NoColor]);
    assert_eq!(p4.score(), 0.0);
    assert!(t.absent.is_empty());
}

#[test]
fn bad_result_lists_are_rejected() {
    let mut t = four_players(1);
    let duplicate = [
        GameResult::Game {
            white: 1,
            black: 2,
            outcome: Outcome::Draw,
        },
        GameResult::Bye { player: 2 },
    ];
    assert!(matches!(
        apply_results(&mut t, &duplicate),
        Err(PairingError::DuplicateResult(2))
    ));
    assert!(matches!(
        apply_results(&mut t, &[GameResult::Bye { player: 9 }]),
        Err(PairingError::UnknownPlayer(9))
    ));
    assert_eq!(t.rounds_played(), 0);

    apply_results(&mut t, &[GameResult::Bye { player: 1 }]).unwrap();
    assert!(matches!(
        apply_results(&mut t, &[GameResult::Bye { player: 2 }]),
        Err(PairingError::InvalidRound { round: 2, total_rounds: 1 })
    ));
}
