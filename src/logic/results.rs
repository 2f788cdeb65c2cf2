//! Applying a finished round to the roster.

use crate::logic::baku;
use crate::models::{Color, GameResult, PairingError, Player, PlayerId, Tournament};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Points for a pairing-allocated bye.
pub const BYE_POINTS: f64 = 1.0;

/// Record the results of the next round.
///
/// Every player gets one colour entry for the round; players missing from
/// `results` are treated as absent with no points. A forfeited game adds no
/// opponent and no colour, but the pairing still counts for floats: the
/// lower-scored side of any board between different scores has floated up.
/// Scores are compared as they were paired, Baku virtual points included.
/// A forfeit win counts as a bye for later bye selection. Clears the absent set.
pub fn apply_results(tournament: &mut Tournament, results: &[GameResult]) -> Result<(), PairingError> {
    if tournament.rounds_played() >= tournament.total_rounds {
        return Err(PairingError::InvalidRound {
            round: tournament.next_round(),
            total_rounds: tournament.total_rounds,
        });
    }
    let mut seen: HashSet<PlayerId> = HashSet::new();
    for r in results {
        let (a, b) = r.players();
        for id in std::iter::once(a).chain(b) {
            if tournament.player(id).is_none() {
                return Err(PairingError::UnknownPlayer(id));
            }
            if !seen.insert(id) {
                return Err(PairingError::DuplicateResult(id));
            }
        }
    }

    let paired_scores = pairing_scores(tournament);
    for p in tournament.players.iter_mut() {
        p.upfloated_last_round = false;
    }
    for r in results {
        match *r {
            GameResult::Game { white, black, outcome } => {
                let (w_score, w_rating) = stats(tournament, &paired_scores, white);
                let (b_score, b_rating) = stats(tournament, &paired_scores, black);
                let (w_points, b_points) = outcome.points();
                let played = outcome.is_played();
                let floater = if w_score < b_score {
                    Some(white)
                } else if b_score < w_score {
                    Some(black)
                } else {
                    None
                };
                for (id, color, opp, opp_rating, points) in [
                    (white, Color::White, black, b_rating, w_points),
                    (black, Color::Black, white, w_rating, b_points),
                ] {
                    if let Some(p) = tournament.player_mut(id) {
                        if played {
                            p.add_color(color);
                            p.add_opponent(opp, opp_rating);
                        } else {
                            p.add_color(Color::NoColor);
                            if points > 0.0 {
                                p.received_bye = true;
                            }
                        }
                        p.add_points(points);
                        if floater == Some(id) {
                            p.upfloats += 1;
                            p.upfloated_last_round = true;
                        }
                    }
                }
            }
            GameResult::Bye { player } => {
                if let Some(p) = tournament.player_mut(player) {
                    p.add_color(Color::NoColor);
                    p.add_points(BYE_POINTS);
                    p.received_bye = true;
                }
            }
            GameResult::Absent { player, points } => {
                if let Some(p) = tournament.player_mut(player) {
                    p.add_color(Color::NoColor);
                    p.add_points(points);
                }
            }
        }
    }
    for p in tournament.players.iter_mut() {
        if !seen.contains(&p.id) {
            p.add_color(Color::NoColor);
        }
    }

    debug!("round {} applied with {} results", tournament.next_round(), results.len());
    tournament.history.push(results.to_vec());
    tournament.absent.clear();
    Ok(())
}

/// Scores the round was paired on: the present players, with virtual points
/// for group A while acceleration runs.
fn pairing_scores(tournament: &Tournament) -> HashMap<PlayerId, f64> {
    let mut roster: Vec<Player> = tournament
        .players
        .iter()
        .filter(|p| !tournament.absent.contains(&p.id))
        .cloned()
        .collect();
    if tournament.accelerated {
        baku::apply_virtual_points(&mut roster, tournament.next_round(), tournament.total_rounds);
    }
    roster.iter().map(|p| (p.id, p.score())).collect()
}

fn stats(tournament: &Tournament, paired_scores: &HashMap<PlayerId, f64>, id: PlayerId) -> (f64, u32) {
    tournament
        .player(id)
        .map(|p| (paired_scores.get(&id).copied().unwrap_or(p.score()), p.rating))
        .unwrap_or((0.0, 0))
}
