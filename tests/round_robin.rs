//! Integration tests for small fields paired from Berger tables.

use dubov_pairing::logic::{berger_round, uses_round_robin};
use dubov_pairing::{generate_pairings, Match, PairingError, Player, Tournament};
use std::collections::HashSet;

fn tournament(n: u32, total_rounds: u32) -> Tournament {
    let players: Vec<Player> = (1..=n).map(|i| Player::new(i, format!("P{}", i), 2500 - i * 10)).collect();
    Tournament::with_players(players, total_rounds).unwrap()
}

#[test]
fn four_slot_tables() {
    assert_eq!(berger_round(4, 1), vec![(1, 4), (2, 3)]);
    assert_eq!(berger_round(4, 2), vec![(4, 3), (1, 2)]);
    assert_eq!(berger_round(4, 3), vec![(2, 4), (3, 1)]);
}

#[test]
fn round_robin_only_when_swiss_runs_out_of_opponents() {
    assert!(!uses_round_robin(6, 5));
    assert!(uses_round_robin(6, 6));
    assert!(uses_round_robin(5, 6));
    assert!(!uses_round_robin(5, 5));
    assert!(!uses_round_robin(1, 10));
}

#[test]
fn every_pair_meets_once_per_cycle() {
    let t = tournament(6, 10);
    let mut pairs = HashSet::new();
    for round in 1..=5 {
        for m in generate_pairings(&t, round).unwrap() {
            let black = m.black.unwrap();
            assert!(pairs.insert((m.white.min(black), m.white.max(black))));
        }
    }
    assert_eq!(pairs.len(), 15);
}

#[test]
fn second_cycle_reverses_colours() {
    let t = tournament(6, 10);
    let first = generate_pairings(&t, 1).unwrap();
    let sixth = generate_pairings(&t, 6).unwrap();
    let reversed: Vec<Match> = first.iter().map(|m| Match::new(m.black.unwrap(), m.white)).collect();
    assert_eq!(sixth, reversed);
}

#[test]
fn odd_field_rotates_the_bye() {
    let t = tournament(5, 10);
    let mut byes = HashSet::new();
    for round in 1..=5 {
        let matches = generate_pairings(&t, round).unwrap();
        assert_eq!(matches.len(), 3);
        let bye = matches.last().unwrap();
        assert!(bye.is_bye);
        assert!(byes.insert(bye.white));
    }
    assert_eq!(byes.len(), 5);
}

#[test]
fn tables_are_seeded_by_rating() {
    let players = vec![
        Player::new(1, "A", 1500),
        Player::new(2, "B", 2400),
        Player::new(3, "C", 2000),
        Player::new(4, "D", 1800),
    ];
    let t = Tournament::with_players(players, 4).unwrap();
    // seeds 2, 3, 4, 1: round 1 is 1-4, 2-3 in table numbers
    assert_eq!(
        generate_pairings(&t, 1).unwrap(),
        vec![Match::new(2, 1), Match::new(3, 4)]
    );
}

#[test]
fn oversized_round_robin_is_rejected() {
    let t = tournament(18, 20);
    assert!(matches!(
        generate_pairings(&t, 1),
        Err(PairingError::RoundRobinTooLarge { players: 18 })
    ));
}

#[test]
fn restricted_pair_blocks_their_round() {
    let mut t = tournament(4, 4);
    t.add_restriction(1, 2).unwrap();
    assert!(generate_pairings(&t, 1).is_ok());
    // table round 2 is 4-3, 1-2
    assert!(matches!(generate_pairings(&t, 2), Err(PairingError::NoValidPairing)));
    t.absent.insert(4);
    assert!(matches!(generate_pairings(&t, 2), Err(PairingError::NoValidPairing)));
}

#[test]
fn absent_player_is_left_out_and_partner_gets_the_bye() {
    let mut t = tournament(4, 4);
    t.absent.insert(4);
    // table round 1 is 1-4, 2-3
    assert_eq!(
        generate_pairings(&t, 1).unwrap(),
        vec![Match::new(2, 3), Match::bye(1)]
    );
}

#[test]
fn absence_in_odd_field_pairs_the_two_left_over() {
    let mut t = tournament(5, 6);
    t.absent.insert(5);
    // table round 1 is 1-bye, 2-5, 3-4
    let matches = generate_pairings(&t, 1).unwrap();
    assert_eq!(matches, vec![Match::new(3, 4), Match::new(1, 2)]);
    assert!(matches.iter().all(|m| m.white != 5 && m.black != Some(5)));
}

#[test]
fn table_numbers_survive_an_absence() {
    let mut t = tournament(6, 10);
    let full = generate_pairings(&t, 3).unwrap();
    t.absent.insert(6);
    let without = generate_pairings(&t, 3).unwrap();
    for m in full.iter().filter(|m| m.white != 6 && m.black != Some(6)) {
        assert!(without.contains(m), "{:?} moved", m);
    }
}
