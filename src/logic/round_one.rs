//! Seeded first round: top half against bottom half by rating.

use crate::logic::groups::rating_order;
use crate::models::{Match, Player, RoundOneColors};

/// Pair round 1, or `None` when a restriction forbids one of the seeded boards.
///
/// Players are seeded by rating. Each score group (more than one only with
/// acceleration) is split in half and rank `i` meets rank `i + half`. An odd
/// player out in the last group, the lowest seed, gets the bye.
pub fn pair_round_one(roster: &[Player], colors: RoundOneColors) -> Option<Vec<Match>> {
    let mut seeded: Vec<&Player> = roster.iter().collect();
    seeded.sort_by(|a, b| b.score().total_cmp(&a.score()).then_with(|| rating_order(a, b)));

    let mut groups: Vec<Vec<&Player>> = Vec::new();
    for p in seeded {
        match groups.last_mut() {
            Some(g) if g[0].score() == p.score() => g.push(p),
            _ => groups.push(vec![p]),
        }
    }

    let mut matches = Vec::new();
    let mut bye = None;
    let last = groups.len().saturating_sub(1);
    for (gi, mut group) in groups.into_iter().enumerate() {
        if group.len() % 2 == 1 {
            if gi != last {
                return None;
            }
            bye = group.pop();
        }
        let half = group.len() / 2;
        for i in 0..half {
            let (top, bottom) = (group[i], group[i + half]);
            if !top.can_play(bottom) {
                return None;
            }
            let top_white = match colors {
                RoundOneColors::TopHalfWhite => true,
                RoundOneColors::Alternating => i % 2 == 0,
            };
            matches.push(if top_white {
                Match::new(top.id, bottom.id)
            } else {
                Match::new(bottom.id, top.id)
            });
        }
    }
    if let Some(p) = bye {
        matches.push(Match::bye(p.id));
    }
    Some(matches)
}
