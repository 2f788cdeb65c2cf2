//! Colour allocation for the boards of one score group.

use crate::models::{Color, Match, Player};
use std::cmp::Ordering;

/// Give colours to the pairs of one group. Pairs are roster indices.
pub(crate) fn allocate(players: &[Player], pairs: &[(usize, usize)]) -> Vec<Match> {
    let mut colorless: Option<bool> = None;
    pairs
        .iter()
        .map(|&(a, b)| {
            let (hi, lo) = if a < b { (a, b) } else { (b, a) };
            let hi_white = higher_gets_white(players, hi, lo, &mut colorless);
            let (white, black) = if hi_white { (hi, lo) } else { (lo, hi) };
            Match::new(players[white].id, players[black].id)
        })
        .collect()
}

/// `hi` is the higher-standing player (smaller roster index).
fn higher_gets_white(players: &[Player], hi: usize, lo: usize, colorless: &mut Option<bool>) -> bool {
    let (ph, pl) = (&players[hi], &players[lo]);
    match (ph.due_color(), pl.due_color()) {
        (Color::NoColor, Color::NoColor) => {
            // first colourless board: odd standing takes white; then alternate
            let white = match *colorless {
                None => (hi + 1) % 2 == 1,
                Some(previous) => !previous,
            };
            *colorless = Some(white);
            white
        }
        (Color::NoColor, due) => due == Color::Black,
        (due, Color::NoColor) => due == Color::White,
        (dh, dl) if dh != dl => dh == Color::White,
        (due, _) => {
            let hi_gets_due = match ph.preference_strength().cmp(&pl.preference_strength()) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => should_alternate(ph, pl, due),
            };
            hi_gets_due == (due == Color::White)
        }
    }
}

/// Whether `first` rather than `second` should receive `due`.
///
/// The latest round where both played with different colours decides: whoever
/// had the other colour then alternates now. Identical histories fall back to
/// score, rating, then id.
pub(crate) fn should_alternate(first: &Player, second: &Player, due: Color) -> bool {
    let (h1, h2) = (first.colors(), second.colors());
    for r in (0..h1.len().min(h2.len())).rev() {
        let (c1, c2) = (h1[r], h2[r]);
        if c1.is_colored() && c2.is_colored() && c1 != c2 {
            return c1 != due;
        }
    }
    first
        .score()
        .total_cmp(&second.score())
        .then_with(|| first.rating.cmp(&second.rating))
        .then_with(|| second.id.cmp(&first.id))
        == Ordering::Greater
}
