//! Berger round-robin tables, used when the field is too small for a Swiss.

use crate::logic::groups::rating_order;
use crate::models::{Match, PairingError, Player, PlayerId};
use log::debug;
use std::collections::BTreeSet;

/// Largest table (slots, a virtual bye slot included).
pub const MAX_SLOTS: usize = 16;

fn slots(players: usize) -> usize {
    players + players % 2
}

/// Whether `total_rounds` exceeds what a Swiss over `players` supports.
pub fn uses_round_robin(players: usize, total_rounds: u32) -> bool {
    players >= 2 && total_rounds as usize > slots(players) - 1
}

/// Pairings of `round` (1-based; cycles repeat with colours reversed).
///
/// Players take table numbers by rating, so a table number stays with its
/// player for the whole event. With an odd field the last table number is a
/// bye. A board with an `absent` player is dropped; the players left without
/// a board are paired among themselves by table number, the last one odd out
/// taking the bye. A board between restricted players fails the round.
pub fn round_pairings(players: &[Player], absent: &BTreeSet<PlayerId>, round: u32) -> Result<Vec<Match>, PairingError> {
    let n = players.len();
    let slot_count = slots(n);
    if n < 2 {
        return Err(PairingError::NotEnoughPlayers);
    }
    if slot_count > MAX_SLOTS {
        return Err(PairingError::RoundRobinTooLarge { players: n });
    }
    if players.iter().filter(|p| !absent.contains(&p.id)).count() < 2 {
        return Err(PairingError::NotEnoughPlayers);
    }
    let mut seeded: Vec<&Player> = players.iter().collect();
    seeded.sort_by(|a, b| rating_order(a, b));

    let rounds_per_cycle = slot_count - 1;
    let index = round.saturating_sub(1) as usize;
    let reversed = (index / rounds_per_cycle) % 2 == 1;
    let table = berger_round(slot_count, index % rounds_per_cycle + 1);

    let present = |slot: usize| seeded.get(slot - 1).copied().filter(|p| !absent.contains(&p.id));
    let mut boards = Vec::new();
    let mut unpaired: Vec<usize> = Vec::new();
    for (white, black) in table {
        let (white, black) = if reversed { (black, white) } else { (white, black) };
        match (present(white), present(black)) {
            (Some(w), Some(b)) => boards.push(board(w, b)?),
            (Some(_), None) => unpaired.push(white),
            (None, Some(_)) => unpaired.push(black),
            (None, None) => {}
        }
    }

    unpaired.sort_unstable();
    let mut rest = unpaired.chunks_exact(2);
    for pair in rest.by_ref() {
        if let (Some(w), Some(b)) = (present(pair[0]), present(pair[1])) {
            debug!("round {}: {} and {} lost their opponents, paired together", round, w.id, b.id);
            boards.push(board(w, b)?);
        }
    }
    if let Some(p) = rest.remainder().first().and_then(|&slot| present(slot)) {
        boards.push(Match::bye(p.id));
    }
    Ok(boards)
}

fn board(white: &Player, black: &Player) -> Result<Match, PairingError> {
    if white.restrictions().contains(&black.id) || black.restrictions().contains(&white.id) {
        return Err(PairingError::NoValidPairing);
    }
    Ok(Match::new(white.id, black.id))
}

/// Table numbers (white, black) for round `r` of a `slots`-player Berger table.
pub fn berger_round(slots: usize, r: usize) -> Vec<(usize, usize)> {
    let m = slots - 1;
    let half = slots / 2;
    let a: Vec<usize> = (0..m).map(|j| ((r - 1) * half + j) % m + 1).collect();
    let mut boards = Vec::with_capacity(half);
    if r % 2 == 1 {
        boards.push((a[0], slots));
    } else {
        boards.push((slots, a[0]));
    }
    for i in 1..half {
        boards.push((a[i], a[m - i]));
    }
    boards
}
