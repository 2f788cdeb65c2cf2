//! Integration tests for TRF and CSV files.

use chrono::NaiveDate;
use dubov_pairing::{
    generate_pairings, pairings_to_csv, read_trf, simulate_tournament, write_trf, Color, Match, Player,
    SimulationConfig, Tournament, TrfError, TrfHeader,
};

/// A `001` line with the fixed columns filled in and the given round blocks.
fn player_line(id: u32, name: &str, rating: u32, points: f64, rank: u32, rounds: &[&str]) -> String {
    let mut line = format!(
        "001 {:>4} {:<4} {:<33} {:>4} {:<26} {:>4.1} {:>4}",
        id, "", name, rating, "", points, rank
    );
    for r in rounds {
        line.push_str(r);
    }
    line
}

fn one_round_file(extra: &[&str]) -> String {
    let mut lines = vec![
        "012 Spring Open".to_string(),
        "042 2024/03/01".to_string(),
        "XXR 3".to_string(),
        player_line(1, "Alpha", 2000, 1.0, 1, &["  0003 w 1"]),
        player_line(2, "Bravo", 1900, 0.5, 2, &["  0004 b ="]),
        player_line(3, "Charlie", 1800, 0.0, 4, &["  0001 b 0"]),
        player_line(4, "Delta", 1700, 0.5, 3, &["  0002 w ="]),
    ];
    lines.extend(extra.iter().map(|s| s.to_string()));
    lines.join("\n")
}

#[test]
fn player_line_columns_line_up() {
    let line = player_line(12, "Name", 2345, 3.5, 7, &["  0005 w 1"]);
    assert_eq!(&line[4..8], "  12");
    assert_eq!(&line[48..52], "2345");
    assert_eq!(&line[80..84], " 3.5");
    assert_eq!(&line[85..89], "   7");
    assert_eq!(&line[91..95], "0005");
}

#[test]
fn reads_header_players_and_history() {
    let doc = read_trf(&one_round_file(&[])).unwrap();
    assert_eq!(doc.header.name.as_deref(), Some("Spring Open"));
    assert_eq!(doc.header.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));

    let t = &doc.tournament;
    assert_eq!(t.total_rounds, 3);
    assert_eq!(t.rounds_played(), 1);
    assert!(!t.accelerated);
    let scores: Vec<f64> = t.players.iter().map(|p| p.score()).collect();
    assert_eq!(scores, vec![1.0, 0.5, 0.0, 0.5]);
    assert_eq!(t.player(1).unwrap().colors(), &[Color::White]);
    assert_eq!(t.player(4).unwrap().colors(), &[Color::White]);
    assert!(t.player(1).unwrap().has_played(3));
    assert_eq!(t.player(3).unwrap().name, "Charlie");
}

#[test]
fn reads_extension_tags() {
    let doc = read_trf(&one_round_file(&["XXC baku", "XXP 1 4", "XXB 3"])).unwrap();
    let t = &doc.tournament;
    assert!(t.accelerated);
    assert!(t.player(1).unwrap().restrictions().contains(&4));
    assert!(t.player(4).unwrap().restrictions().contains(&1));
    assert!(t.absent.contains(&3));
}

#[test]
fn pairs_the_next_round_of_a_file() {
    let doc = read_trf(&one_round_file(&["XXP 1 4"])).unwrap();
    let t = &doc.tournament;
    // 1 has met 3 and may not meet 4
    let matches = generate_pairings(t, t.next_round()).unwrap();
    assert_eq!(matches, vec![Match::new(2, 1), Match::new(3, 4)]);
}

#[test]
fn forfeits_and_byes_decode() {
    let text = [
        "XXR 3".to_string(),
        player_line(1, "Alpha", 2000, 1.0, 1, &["  0002 w +"]),
        player_line(2, "Bravo", 1900, 0.0, 3, &["  0001 b -"]),
        player_line(3, "Charlie", 1800, 1.0, 2, &["  0000 - U"]),
        player_line(4, "Delta", 1700, 0.5, 4, &["  0000 - H"]),
    ]
    .join("\n");
    let t = read_trf(&text).unwrap().tournament;
    let p1 = t.player(1).unwrap();
    assert_eq!(p1.score(), 1.0);
    assert!(p1.received_bye);
    assert!(!p1.has_played(2));
    assert_eq!(p1.colors(), &[Color::NoColor]);
    assert!(t.player(3).unwrap().received_bye);
    assert_eq!(t.player(4).unwrap().score(), 0.5);
    assert!(!t.player(4).unwrap().received_bye);
}

#[test]
fn missing_round_count_is_an_error() {
    let text = player_line(1, "Alpha", 2000, 0.0, 1, &[]);
    assert!(matches!(read_trf(&text), Err(TrfError::MissingRounds)));
}

#[test]
fn malformed_player_line_reports_its_number() {
    let text = format!("XXR 3\n{}", "001 abcd Broken");
    assert!(matches!(read_trf(&text), Err(TrfError::Line { line: 2, .. })));
}

#[test]
fn simulated_event_survives_a_round_trip() {
    let config = SimulationConfig {
        players: 15,
        rounds: 5,
        seed: 42,
        ..SimulationConfig::default()
    };
    let t = simulate_tournament(&config).unwrap();
    let header = TrfHeader {
        name: Some("Simulated".to_string()),
        end_date: NaiveDate::from_ymd_opt(2024, 5, 12),
        ..TrfHeader::default()
    };
    let text = write_trf(&t, &header);
    assert!(text.starts_with("012 Simulated\n"));
    assert!(text.contains("052 2024/05/12"));
    assert!(text.contains("XXR 5"));

    let doc = read_trf(&text).unwrap();
    assert_eq!(doc.header.name.as_deref(), Some("Simulated"));
    assert_eq!(doc.tournament.rounds_played(), 5);
    assert_eq!(doc.tournament.players, t.players);
}

#[test]
fn written_restrictions_and_absences_are_read_back() {
    let players: Vec<Player> = (1..=4).map(|i| Player::new(i, format!("P{}", i), 2000)).collect();
    let mut t = Tournament::with_players(players, 3).unwrap();
    t.add_restriction(2, 3).unwrap();
    t.absent.insert(4);
    let text = write_trf(&t, &TrfHeader::default());
    assert!(text.contains("XXP 2 3\n"));
    assert!(text.contains("XXB 4\n"));

    let back = read_trf(&text).unwrap().tournament;
    assert!(back.player(3).unwrap().restrictions().contains(&2));
    assert!(back.absent.contains(&4));
}

#[test]
fn csv_table_marks_the_bye() {
    let players = vec![
        Player::new(1, "Alpha", 2000),
        Player::new(2, "Bravo", 1900),
        Player::new(3, "", 1800),
    ];
    let t = Tournament::with_players(players, 3).unwrap();
    let csv = pairings_to_csv(&t, &[Match::new(2, 1), Match::bye(3)]).unwrap();
    assert_eq!(csv, "White,Black\nBravo,Alpha\n3,BYE\n");
}

#[test]
fn paired_round_without_results_is_not_replayed() {
    let text = [
        "XXR 3".to_string(),
        player_line(1, "Alpha", 2000, 1.0, 1, &["  0003 w 1", "  0002 b  "]),
        player_line(2, "Bravo", 1900, 0.5, 2, &["  0004 b =", "  0001 w  "]),
        player_line(3, "Charlie", 1800, 0.0, 4, &["  0001 b 0", "  0004 w  "]),
        player_line(4, "Delta", 1700, 0.5, 3, &["  0002 w =", "  0003 b  "]),
    ]
    .join("\n");
    let t = read_trf(&text).unwrap().tournament;
    assert_eq!(t.rounds_played(), 1);
    assert_eq!(t.next_round(), 2);
    assert!(!t.player(1).unwrap().has_played(2));
    assert_eq!(t.player(1).unwrap().colors(), &[Color::White]);
    assert_eq!(t.player(2).unwrap().score(), 0.5);
}
