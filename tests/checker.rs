//! Integration tests for the free pairings checker and the simulator.

use dubov_pairing::logic::{replay, ViolationKind};
use dubov_pairing::{
    apply_results, check_round, simulate_tournament, GameResult, Match, Outcome, PairingError, Player,
    SimulationConfig, Tournament,
};

fn game(white: u32, black: u32, outcome: Outcome) -> GameResult {
    GameResult::Game { white, black, outcome }
}

#[test]
fn engine_pairings_check_clean() {
    let config = SimulationConfig {
        players: 10,
        rounds: 4,
        seed: 7,
        ..SimulationConfig::default()
    };
    let t = simulate_tournament(&config).unwrap();
    for round in 1..=4 {
        let report = check_round(&t, round).unwrap();
        assert!(report.is_clean(), "round {}: {:?}", round, report);
        assert_eq!(report.recorded.len(), report.generated.len());
    }
}

#[test]
fn simulation_is_reproducible() {
    let config = SimulationConfig {
        players: 12,
        rounds: 5,
        seed: 3,
        accelerated: true,
        ..SimulationConfig::default()
    };
    let a = simulate_tournament(&config).unwrap();
    let b = simulate_tournament(&config).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.rounds_played(), 5);
    let total: f64 = a.players.iter().map(|p| p.score()).sum();
    // 6 boards a round, a point each
    assert_eq!(total, 30.0);
}

#[test]
fn repeat_opponent_is_reported() {
    let players: Vec<Player> = (1..=4).map(|i| Player::new(i, format!("P{}", i), 2000 - i * 100)).collect();
    let mut t = Tournament::with_players(players, 3).unwrap();
    apply_results(
        &mut t,
        &[game(1, 3, Outcome::WhiteWins), game(2, 4, Outcome::WhiteWins)],
    )
    .unwrap();
    apply_results(&mut t, &[game(3, 1, Outcome::Draw), game(4, 2, Outcome::Draw)]).unwrap();

    let report = check_round(&t, 2).unwrap();
    assert!(!report.is_clean());
    let kinds: Vec<ViolationKind> = report.violations.iter().map(|v| v.kind).collect();
    assert_eq!(kinds, vec![ViolationKind::RepeatOpponent, ViolationKind::RepeatOpponent]);
    assert_eq!(report.violations[0].board, Match::new(3, 1));
    assert_eq!(report.differences.len(), 2);
}

#[test]
fn repeat_bye_is_reported() {
    let players: Vec<Player> = (1..=3).map(|i| Player::new(i, format!("P{}", i), 2000 - i * 100)).collect();
    let mut t = Tournament::with_players(players, 3).unwrap();
    apply_results(&mut t, &[game(1, 2, Outcome::WhiteWins), GameResult::Bye { player: 3 }]).unwrap();
    apply_results(&mut t, &[game(2, 1, Outcome::WhiteWins), GameResult::Bye { player: 3 }]).unwrap();

    let report = check_round(&t, 2).unwrap();
    let kinds: Vec<ViolationKind> = report.violations.iter().map(|v| v.kind).collect();
    assert!(kinds.contains(&ViolationKind::RepeatBye));
    assert!(kinds.contains(&ViolationKind::RepeatOpponent));
}

#[test]
fn replay_rebuilds_earlier_state() {
    let config = SimulationConfig {
        players: 8,
        rounds: 3,
        seed: 11,
        ..SimulationConfig::default()
    };
    let t = simulate_tournament(&config).unwrap();
    assert_eq!(replay(&t, 3).unwrap().players, t.players);
    let start = replay(&t, 0).unwrap();
    assert!(start.players.iter().all(|p| p.colors().is_empty()));
}

#[test]
fn unrecorded_round_cannot_be_checked() {
    let players: Vec<Player> = (1..=4).map(|i| Player::new(i, format!("P{}", i), 2000)).collect();
    let t = Tournament::with_players(players, 3).unwrap();
    assert!(matches!(check_round(&t, 1), Err(PairingError::InvalidRound { .. })));
}

#[test]
fn out_of_range_simulations_are_rejected() {
    let cases = [
        SimulationConfig { players: 1, ..SimulationConfig::default() },
        SimulationConfig { players: 1_000_000, ..SimulationConfig::default() },
        SimulationConfig { players: 6, rounds: 0, ..SimulationConfig::default() },
        SimulationConfig { players: 6, rounds: 1_000_000, ..SimulationConfig::default() },
        SimulationConfig { draw_rate: 1.5, ..SimulationConfig::default() },
    ];
    for config in &cases {
        assert!(
            matches!(simulate_tournament(config), Err(PairingError::InvalidSimulation(_))),
            "{:?}",
            config
        );
    }
    let smallest = SimulationConfig { players: 2, rounds: 2, ..SimulationConfig::default() };
    assert_eq!(simulate_tournament(&smallest).unwrap().rounds_played(), 2);
}
