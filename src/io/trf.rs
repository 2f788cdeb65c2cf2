//! FIDE TRF-16 tournament report files.
//!
//! Player lines (`001`) are fixed width. Columns, 0-based: start rank 4..8,
//! name 14..47, rating 48..52, points 80..84, rank 85..89, then one 10-wide
//! block per round starting at 89: opponent 91..95, colour 96, result 98.
//! Extension tags: `XXR` rounds, `XXC baku` acceleration, `XXP a b`
//! forbidden pair, `XXB ids` requested byes for the next round.

use crate::logic::groups::standing_order;
use crate::logic::results::apply_results;
use crate::models::{GameResult, Outcome, PairingError, Player, PlayerId, Tournament};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const ROUND_START: usize = 89;
const ROUND_WIDTH: usize = 10;
const NAME_WIDTH: usize = 33;

/// Errors while decoding a TRF file.
#[derive(Clone, Debug, PartialEq)]
pub enum TrfError {
    /// Malformed line (1-based line number).
    Line { line: usize, reason: String },
    /// No `XXR` tag: the number of rounds is unknown.
    MissingRounds,
    /// The decoded data is inconsistent (duplicate ids, unknown opponents...).
    Pairing(PairingError),
}

impl std::fmt::Display for TrfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrfError::Line { line, reason } => write!(f, "TRF line {}: {}", line, reason),
            TrfError::MissingRounds => write!(f, "TRF file has no XXR (number of rounds) tag"),
            TrfError::Pairing(e) => write!(f, "TRF data rejected: {}", e),
        }
    }
}

impl std::error::Error for TrfError {}

impl From<PairingError> for TrfError {
    fn from(e: PairingError) -> Self {
        TrfError::Pairing(e)
    }
}

/// Tournament header lines (`012` to `132`).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrfHeader {
    pub name: Option<String>,
    pub city: Option<String>,
    pub federation: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub chief_arbiter: Option<String>,
    pub time_control: Option<String>,
    /// Other header lines by code, verbatim.
    pub other: BTreeMap<String, String>,
}

/// A decoded file: header plus the tournament replayed to its last round.
#[derive(Clone, Debug, PartialEq)]
pub struct TrfDocument {
    pub header: TrfHeader,
    pub tournament: Tournament,
}

#[derive(Clone, Copy, Debug)]
struct RoundEntry {
    opponent: Option<PlayerId>,
    color: char,
    result: char,
}

#[derive(Clone, Debug)]
struct PlayerLine {
    id: PlayerId,
    name: String,
    rating: u32,
    rounds: Vec<RoundEntry>,
}

fn field(chars: &[char], start: usize, end: usize) -> String {
    if start >= chars.len() {
        return String::new();
    }
    chars[start..end.min(chars.len())].iter().collect::<String>().trim().to_string()
}

fn line_error(line: usize, reason: impl Into<String>) -> TrfError {
    TrfError::Line {
        line,
        reason: reason.into(),
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    ["%Y/%m/%d", "%Y-%m-%d", "%Y.%m.%d", "%d.%m.%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text.trim(), fmt).ok())
}

fn parse_player(chars: &[char], line: usize) -> Result<PlayerLine, TrfError> {
    let id = field(chars, 4, 8)
        .parse::<PlayerId>()
        .map_err(|_| line_error(line, "bad starting rank"))?;
    let rating_text = field(chars, 48, 52);
    let rating = if rating_text.is_empty() {
        0
    } else {
        rating_text.parse::<u32>().map_err(|_| line_error(line, "bad rating"))?
    };
    let mut rounds = Vec::new();
    let mut start = ROUND_START;
    while start + 2 < chars.len() {
        let opponent_text = field(chars, start + 2, start + 6);
        let color = chars.get(start + 7).copied().unwrap_or(' ');
        let result = chars.get(start + 9).copied().unwrap_or(' ');
        if opponent_text.is_empty() && result == ' ' {
            break;
        }
        let opponent = if opponent_text.is_empty() {
            0
        } else {
            opponent_text
                .parse::<PlayerId>()
                .map_err(|_| line_error(line, format!("bad opponent '{}'", opponent_text)))?
        };
        rounds.push(RoundEntry {
            opponent: (opponent != 0).then_some(opponent),
            color: color.to_ascii_lowercase(),
            result: result.to_ascii_uppercase(),
        });
        start += ROUND_WIDTH;
    }
    Ok(PlayerLine {
        id,
        name: field(chars, 14, 47),
        rating,
        rounds,
    })
}

fn parse_ids(text: &str, line: usize) -> Result<Vec<PlayerId>, TrfError> {
    text.split_whitespace()
        .map(|t| t.parse::<PlayerId>().map_err(|_| line_error(line, format!("bad player id '{}'", t))))
        .collect()
}

/// Decode a TRF file and replay its rounds.
pub fn read_trf(text: &str) -> Result<TrfDocument, TrfError> {
    let mut header = TrfHeader::default();
    let mut lines: Vec<(usize, PlayerLine)> = Vec::new();
    let mut total_rounds = None;
    let mut accelerated = false;
    let mut forbidden: Vec<(PlayerId, PlayerId)> = Vec::new();
    let mut absent: Vec<PlayerId> = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let chars: Vec<char> = raw.trim_end().chars().collect();
        if chars.len() < 3 {
            continue;
        }
        let code: String = chars[..3].iter().collect();
        let rest = field(&chars, 4, chars.len());
        match code.as_str() {
            "001" => lines.push((line, parse_player(&chars, line)?)),
            "012" => header.name = Some(rest),
            "022" => header.city = Some(rest),
            "032" => header.federation = Some(rest),
            "042" => header.start_date = parse_date(&rest),
            "052" => header.end_date = parse_date(&rest),
            "102" => header.chief_arbiter = Some(rest),
            "122" => header.time_control = Some(rest),
            "XXR" | "TNR" => {
                let n = rest.parse::<u32>().map_err(|_| line_error(line, "bad number of rounds"))?;
                total_rounds = Some(n);
            }
            "XXC" => accelerated |= rest.to_ascii_lowercase().contains("baku"),
            "XXP" => {
                let ids = parse_ids(&rest, line)?;
                for pair in ids.chunks(2) {
                    if let [a, b] = *pair {
                        forbidden.push((a, b));
                    }
                }
            }
            "XXB" => absent.extend(parse_ids(&rest, line)?),
            c if c.chars().all(|ch| ch.is_ascii_digit()) => {
                header.other.insert(code.clone(), rest);
            }
            _ => log::debug!("TRF line {}: ignoring unknown code {}", line, code),
        }
    }

    let total_rounds = total_rounds.ok_or(TrfError::MissingRounds)?;
    let players: Vec<Player> = lines
        .iter()
        .map(|(_, l)| Player::new(l.id, l.name.clone(), l.rating))
        .collect();
    let mut tournament = Tournament::with_players(players, total_rounds)?;
    tournament.accelerated = accelerated;
    for (a, b) in forbidden {
        tournament.add_restriction(a, b)?;
    }

    let entries: HashMap<PlayerId, &[RoundEntry]> = lines.iter().map(|(_, l)| (l.id, l.rounds.as_slice())).collect();
    let recorded = lines.iter().map(|(_, l)| l.rounds.len()).max().unwrap_or(0);
    // a board with no result is a published pairing that has not been played
    let played = (0..recorded)
        .find(|&r| {
            lines
                .iter()
                .any(|(_, l)| l.rounds.get(r).is_some_and(|e| e.opponent.is_some() && e.result == ' '))
        })
        .unwrap_or(recorded);
    if played < recorded {
        log::debug!("round {} is paired but has no results, replaying {} rounds", played + 1, played);
    }
    for r in 0..played {
        let mut results = Vec::new();
        for (line, l) in &lines {
            let Some(entry) = l.rounds.get(r) else {
                continue;
            };
            if let Some(result) = decode_entry(l.id, entry, r, &entries, *line)? {
                results.push(result);
            }
        }
        apply_results(&mut tournament, &results)?;
    }
    tournament.absent = absent.into_iter().collect();
    tournament.validate()?;
    log::info!(
        "read TRF: {} players, {} of {} rounds played",
        tournament.players.len(),
        played,
        total_rounds
    );
    Ok(TrfDocument { header, tournament })
}

/// Result of one player's entry; each game is decoded from its white side only.
fn decode_entry(
    id: PlayerId,
    entry: &RoundEntry,
    round: usize,
    entries: &HashMap<PlayerId, &[RoundEntry]>,
    line: usize,
) -> Result<Option<GameResult>, TrfError> {
    let Some(opponent) = entry.opponent else {
        return match entry.result {
            'U' | 'F' | '+' => Ok(Some(GameResult::Bye { player: id })),
            'H' => Ok(Some(GameResult::Absent { player: id, points: 0.5 })),
            'Z' | '-' | '0' | ' ' => Ok(Some(GameResult::Absent { player: id, points: 0.0 })),
            c => Err(line_error(line, format!("unknown result code '{}' in round {}", c, round + 1))),
        };
    };
    let is_white = match entry.color {
        'w' => true,
        'b' => false,
        _ => id < opponent,
    };
    if !is_white {
        return Ok(None);
    }
    let opponent_result = entries
        .get(&opponent)
        .and_then(|rounds| rounds.get(round))
        .map(|e| e.result)
        .unwrap_or(' ');
    let outcome = match entry.result {
        '1' | 'W' => Outcome::WhiteWins,
        '=' | 'D' => Outcome::Draw,
        '0' | 'L' => Outcome::BlackWins,
        '+' => Outcome::WhiteWinsByForfeit,
        '-' if opponent_result == '+' => Outcome::BlackWinsByForfeit,
        '-' => Outcome::DoubleForfeit,
        c => return Err(line_error(line, format!("unknown result code '{}' in round {}", c, round + 1))),
    };
    Ok(Some(GameResult::Game {
        white: id,
        black: opponent,
        outcome,
    }))
}

fn round_block(id: PlayerId, results: &[GameResult]) -> String {
    let entry = results.iter().find_map(|r| match *r {
        GameResult::Game { white, black, outcome } if white == id || black == id => {
            let (w, b) = match outcome {
                Outcome::WhiteWins => ('1', '0'),
                Outcome::Draw => ('=', '='),
                Outcome::BlackWins => ('0', '1'),
                Outcome::WhiteWinsByForfeit => ('+', '-'),
                Outcome::BlackWinsByForfeit => ('-', '+'),
                Outcome::DoubleForfeit => ('-', '-'),
            };
            Some(if white == id {
                (black, 'w', w)
            } else {
                (white, 'b', b)
            })
        }
        GameResult::Bye { player } if player == id => Some((0, '-', 'U')),
        GameResult::Absent { player, points } if player == id => {
            let code = if points >= 1.0 {
                'F'
            } else if points > 0.0 {
                'H'
            } else {
                'Z'
            };
            Some((0, '-', code))
        }
        _ => None,
    });
    let (opponent, color, result) = entry.unwrap_or((0, '-', 'Z'));
    format!("  {:04} {} {}", opponent, color, result)
}

/// Encode a tournament, with every applied round, as TRF text.
pub fn write_trf(tournament: &Tournament, header: &TrfHeader) -> String {
    let mut out = Vec::new();
    let text_tags = [
        ("012", &header.name),
        ("022", &header.city),
        ("032", &header.federation),
    ];
    for (code, value) in text_tags {
        if let Some(v) = value {
            out.push(format!("{} {}", code, v));
        }
    }
    for (code, date) in [("042", header.start_date), ("052", header.end_date)] {
        if let Some(d) = date {
            out.push(format!("{} {}", code, d.format("%Y/%m/%d")));
        }
    }
    out.push(format!("062 {}", tournament.players.len()));
    if let Some(v) = &header.chief_arbiter {
        out.push(format!("102 {}", v));
    }
    if let Some(v) = &header.time_control {
        out.push(format!("122 {}", v));
    }
    for (code, value) in &header.other {
        if code != "062" {
            out.push(format!("{} {}", code, value));
        }
    }
    out.push(format!("XXR {}", tournament.total_rounds));
    if tournament.accelerated {
        out.push("XXC baku".to_string());
    }

    let mut ranked: Vec<&Player> = tournament.players.iter().collect();
    ranked.sort_by(|a, b| standing_order(a, b));
    let rank: HashMap<PlayerId, usize> = ranked.iter().enumerate().map(|(i, p)| (p.id, i + 1)).collect();
    let mut by_id: Vec<&Player> = tournament.players.iter().collect();
    by_id.sort_by_key(|p| p.id);
    for p in by_id {
        let name: String = p.name.chars().take(NAME_WIDTH).collect();
        let rating = if p.rating == 0 { String::new() } else { p.rating.to_string() };
        let mut line = format!(
            "001 {:>4} {:1}{:>3} {:<33} {:>4} {:>3} {:>11} {:>10} {:>4.1} {:>4}",
            p.id,
            "",
            "",
            name,
            rating,
            "",
            "",
            "",
            p.score(),
            rank.get(&p.id).copied().unwrap_or(0)
        );
        for results in &tournament.history {
            line.push_str(&round_block(p.id, results));
        }
        out.push(line);
    }

    for p in &tournament.players {
        for &r in p.restrictions() {
            if p.id < r {
                out.push(format!("XXP {} {}", p.id, r));
            }
        }
    }
    if !tournament.absent.is_empty() {
        let ids: Vec<String> = tournament.absent.iter().map(|id| id.to_string()).collect();
        out.push(format!("XXB {}", ids.join(" ")));
    }
    let mut text = out.join("\n");
    text.push('\n');
    text
}
