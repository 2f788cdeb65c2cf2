//! Bye candidate ordering.

use crate::models::Player;

/// Roster indices in the order byes are tried.
///
/// Players without a previous bye come first; among them those who played every
/// round before those who missed games; then lowest score, lowest standing.
/// Players who already had a bye are only tried last.
pub(crate) fn bye_candidates(players: &[Player], round: u32) -> Vec<usize> {
    let missed_games = |i: usize| players[i].games_played() + 1 < round as usize;
    let order = |a: &usize, b: &usize| {
        missed_games(*a)
            .cmp(&missed_games(*b))
            .then_with(|| players[*a].score().total_cmp(&players[*b].score()))
            .then_with(|| b.cmp(a))
    };
    let (mut fresh, mut repeat): (Vec<usize>, Vec<usize>) = (0..players.len()).partition(|&i| !players[i].received_bye);
    fresh.sort_by(&order);
    repeat.sort_by(&order);
    fresh.extend(repeat);
    fresh
}
