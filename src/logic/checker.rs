//! Free pairings checker: audit a recorded round against the absolute criteria
//! and against what the engine would have paired.

use crate::logic::engine::generate_pairings;
use crate::logic::results::apply_results;
use crate::models::{ColorPreference, GameResult, Match, PairingError, Player, PlayerId, Tournament};
use serde::Serialize;
use std::collections::HashSet;

/// Absolute criterion broken by a recorded board.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    RepeatOpponent,
    Restricted,
    AbsoluteColorClash,
    RepeatBye,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub board: Match,
}

/// Outcome of checking one round.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckReport {
    pub round: u32,
    pub recorded: Vec<Match>,
    pub generated: Vec<Match>,
    pub violations: Vec<Violation>,
    /// Recorded boards (with colours) the engine did not produce.
    pub differences: Vec<Match>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.differences.is_empty()
    }
}

/// Rebuild the tournament as it stood before `round`.
pub fn replay(tournament: &Tournament, rounds: u32) -> Result<Tournament, PairingError> {
    let fresh: Vec<Player> = tournament
        .players
        .iter()
        .map(|p| {
            let mut q = Player::new(p.id, p.name.clone(), p.rating);
            for &r in p.restrictions() {
                q.add_restriction(r);
            }
            q
        })
        .collect();
    let mut t = Tournament::with_players(fresh, tournament.total_rounds)?;
    t.accelerated = tournament.accelerated;
    t.config = tournament.config;
    for results in tournament.history.iter().take(rounds as usize) {
        apply_results(&mut t, results)?;
    }
    Ok(t)
}

/// Check recorded round `round` of `tournament`.
pub fn check_round(tournament: &Tournament, round: u32) -> Result<CheckReport, PairingError> {
    if round == 0 || round as usize > tournament.history.len() {
        return Err(PairingError::InvalidRound {
            round,
            total_rounds: tournament.total_rounds,
        });
    }
    let recorded_results = &tournament.history[round as usize - 1];
    let mut before = replay(tournament, round - 1)?;
    before.absent = recorded_results
        .iter()
        .filter_map(|r| match *r {
            GameResult::Absent { player, .. } => Some(player),
            _ => None,
        })
        .collect();

    let recorded: Vec<Match> = recorded_results.iter().filter_map(GameResult::pairing).collect();
    let violations: Vec<Violation> = recorded
        .iter()
        .filter_map(|m| violation(&before, m).map(|kind| Violation { kind, board: *m }))
        .collect();

    let generated = generate_pairings(&before, round)?;
    let produced: HashSet<Match> = generated.iter().copied().collect();
    let differences: Vec<Match> = recorded.iter().filter(|m| !produced.contains(m)).copied().collect();
    log::info!(
        "checked round {}: {} violations, {} of {} boards differ",
        round,
        violations.len(),
        differences.len(),
        recorded.len()
    );
    Ok(CheckReport {
        round,
        recorded,
        generated,
        violations,
        differences,
    })
}

fn violation(t: &Tournament, board: &Match) -> Option<ViolationKind> {
    let white = t.player(board.white)?;
    let Some(black_id) = board.black else {
        return white.received_bye.then_some(ViolationKind::RepeatBye);
    };
    let black = t.player(black_id)?;
    if white.has_played(black_id) {
        return Some(ViolationKind::RepeatOpponent);
    }
    if restricted(white, black.id) || restricted(black, white.id) {
        return Some(ViolationKind::Restricted);
    }
    let absolute = |p: &Player| p.preference_strength() == ColorPreference::Absolute;
    if white.due_color() == black.due_color() && absolute(white) && absolute(black) {
        return Some(ViolationKind::AbsoluteColorClash);
    }
    None
}

fn restricted(p: &Player, other: PlayerId) -> bool {
    p.restrictions().contains(&other)
}
