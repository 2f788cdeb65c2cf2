//! Baku acceleration: virtual points for the top seeds in early rounds.

use crate::logic::groups::rating_order;
use crate::models::Player;

/// Accelerated rounds: the first half of the tournament, rounded up.
pub fn accelerated_rounds(total_rounds: u32) -> u32 {
    total_rounds.div_ceil(2)
}

/// Size of group A: the top 2 * ceil(n / 4) seeds.
pub fn group_a_size(players: usize) -> usize {
    2 * players.div_ceil(4)
}

/// Virtual points group A carries into `round`.
pub fn virtual_points(round: u32, total_rounds: u32) -> f64 {
    let accelerated = accelerated_rounds(total_rounds);
    if round > accelerated {
        0.0
    } else if round <= accelerated.div_ceil(2) {
        1.0
    } else {
        0.5
    }
}

/// Add virtual points to group A in the working roster. Only the pairing score changes.
pub fn apply_virtual_points(roster: &mut [Player], round: u32, total_rounds: u32) {
    let bonus = virtual_points(round, total_rounds);
    if bonus == 0.0 {
        return;
    }
    let mut seeds: Vec<usize> = (0..roster.len()).collect();
    seeds.sort_by(|&a, &b| rating_order(&roster[a], &roster[b]));
    for &i in seeds.iter().take(group_a_size(roster.len())) {
        let score = roster[i].score() + bonus;
        roster[i].set_pairing_score(score);
    }
}
