//! Pairing one score group: direct assignment, transposition, then shifters.

use crate::logic::engine::SearchBudget;
use crate::logic::groups::SeekerLists;
use crate::logic::matching::{has_bipartite_assignment, MatchingGraph, MatchingOracle};
use crate::models::{Color, ColorPreference, MatchEval, PairingError, Player};
use log::{debug, trace};

/// Base cost of matching two players from the same seeker list.
const SHIFT_PENALTY: u64 = 1_000;

/// Compatibility inside a group: absolute criteria, and two upfloaters never meet.
pub(crate) struct GroupRules<'a> {
    pub players: &'a [Player],
    pub floaters: &'a [usize],
}

impl GroupRules<'_> {
    pub fn fits(&self, a: usize, b: usize) -> bool {
        self.players[a].can_play(&self.players[b]) && !(self.floaters.contains(&a) && self.floaters.contains(&b))
    }
}

/// Index-wise candidates: i-th white seeker against i-th black seeker.
pub(crate) fn direct_candidates(rules: &GroupRules<'_>, lists: &SeekerLists) -> Vec<MatchEval> {
    lists
        .white
        .iter()
        .zip(&lists.black)
        .map(|(&white, &black)| MatchEval {
            white,
            black,
            problem: !rules.fits(white, black),
        })
        .collect()
}

/// Pair every member of `group`, or `None` if the repair ladder cannot.
pub(crate) fn pair_group(
    rules: &GroupRules<'_>,
    group: &[usize],
    oracle: &dyn MatchingOracle,
    budget: &mut SearchBudget,
) -> Result<Option<Vec<(usize, usize)>>, PairingError> {
    if group.is_empty() {
        return Ok(Some(Vec::new()));
    }
    if group.len() % 2 == 1 {
        return Ok(None);
    }
    let lists = SeekerLists::split(rules.players, group);
    if lists.is_balanced() {
        let direct = direct_candidates(rules, &lists);
        let problems = direct.iter().filter(|m| m.problem).count();
        if problems == 0 {
            return Ok(Some(direct.iter().map(|m| (m.white, m.black)).collect()));
        }
        debug!("{} problem boards in direct pairing, transposing", problems);
        if let Some(pairs) = transpose(rules, &lists, budget)? {
            return Ok(Some(pairs));
        }
    }
    budget.tick()?;
    let Some(shifted) = shift(rules, &lists, oracle) else {
        debug!("no shifter exchange pairs group of {}", group.len());
        return Ok(None);
    };
    debug!(
        "shifters moved seekers from {}/{} to {}/{}",
        lists.white.len(),
        lists.black.len(),
        shifted.white.len(),
        shifted.black.len()
    );
    transpose(rules, &shifted, budget)
}

/// Re-order black seekers, pivot by pivot from the top board, keeping each
/// current partner when possible. Each pivot only takes a partner that still
/// leaves the boards below it completable.
pub(crate) fn transpose(
    rules: &GroupRules<'_>,
    lists: &SeekerLists,
    budget: &mut SearchBudget,
) -> Result<Option<Vec<(usize, usize)>>, PairingError> {
    if !lists.is_balanced() {
        return Ok(None);
    }
    let whites = &lists.white;
    let mut blacks = lists.black.clone();
    let n = whites.len();
    if !has_bipartite_assignment(n, n, |r, c| rules.fits(whites[r], blacks[c])) {
        return Ok(None);
    }
    for pivot in 0..n {
        let mut placed = false;
        for candidate in pivot..n {
            budget.tick()?;
            if !rules.fits(whites[pivot], blacks[candidate]) {
                continue;
            }
            blacks[pivot..=candidate].rotate_right(1);
            let rest = n - pivot - 1;
            let tail = &blacks[pivot + 1..];
            if has_bipartite_assignment(rest, rest, |r, c| rules.fits(whites[pivot + 1 + r], tail[c])) {
                if candidate != pivot {
                    trace!("board {}: transposed black seeker {} up", pivot, candidate);
                }
                placed = true;
                break;
            }
            blacks[pivot..=candidate].rotate_left(1);
        }
        if !placed {
            return Ok(None);
        }
    }
    Ok(Some(whites.iter().copied().zip(blacks).collect()))
}

/// Cost of moving a player out of its list: central players first, colourless
/// players before anyone, absolute preferences never.
fn migration_priority(player: &Player, position: usize, len: usize) -> Option<u64> {
    if player.preference_strength() == ColorPreference::Absolute {
        return None;
    }
    if player.due_color() == Color::NoColor {
        return Some(0);
    }
    Some((2 * position as i64 - (len as i64 - 1)).unsigned_abs())
}

/// Move seekers across lists along a minimum-cost perfect matching of the group.
fn shift(rules: &GroupRules<'_>, lists: &SeekerLists, oracle: &dyn MatchingOracle) -> Option<SeekerLists> {
    // (player, in white list, priority)
    let members: Vec<(usize, bool, Option<u64>)> = lists
        .white
        .iter()
        .enumerate()
        .map(|(pos, &i)| (i, true, migration_priority(&rules.players[i], pos, lists.white.len())))
        .chain(
            lists
                .black
                .iter()
                .enumerate()
                .map(|(pos, &i)| (i, false, migration_priority(&rules.players[i], pos, lists.black.len()))),
        )
        .collect();
    let smaller_white = lists.white.len() < lists.black.len();
    let smaller_black = lists.black.len() < lists.white.len();

    let mut graph = MatchingGraph::new(members.len());
    for a in 0..members.len() {
        for b in a + 1..members.len() {
            let (pa, white_a, prio_a) = members[a];
            let (pb, white_b, prio_b) = members[b];
            if !rules.fits(pa, pb) {
                continue;
            }
            if white_a != white_b {
                graph.add_edge(a, b, 0);
                continue;
            }
            let Some(mover) = [prio_a, prio_b].into_iter().flatten().min() else {
                continue;
            };
            let mut cost = SHIFT_PENALTY + mover;
            if (white_a && smaller_white) || (!white_a && smaller_black) {
                cost += SHIFT_PENALTY;
            }
            graph.add_edge(a, b, cost);
        }
    }
    let matching = oracle.min_cost_perfect_matching(&graph)?;

    let mut next = lists.clone();
    for (a, b) in matching {
        let (pa, white_a, prio_a) = members[a];
        let (pb, white_b, prio_b) = members[b];
        if white_a != white_b {
            continue;
        }
        // lower priority moves; on a tie the lower-ranked player
        let mover = match (prio_a, prio_b) {
            (Some(x), Some(y)) if x < y => pa,
            (Some(x), Some(y)) if y < x => pb,
            (Some(_), Some(_)) => pa.max(pb),
            (Some(_), None) => pa,
            _ => pb,
        };
        let (from, to) = if white_a {
            (&mut next.white, &mut next.black)
        } else {
            (&mut next.black, &mut next.white)
        };
        from.retain(|&i| i != mover);
        to.push(mover);
    }
    next.sort(rules.players);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::matching::BlossomOracle;

    fn seeker(id: u32, rating: u32, colors: &[Color]) -> Player {
        let mut p = Player::new(id, format!("P{}", id), rating);
        for &c in colors {
            p.add_color(c);
        }
        p
    }

    #[test]
    fn transposition_swaps_a_repeat_pairing() {
        let mut players = vec![
            seeker(1, 2000, &[Color::Black]),
            seeker(2, 1900, &[Color::Black]),
            seeker(3, 1800, &[Color::White]),
            seeker(4, 1700, &[Color::White]),
        ];
        players[0].add_opponent(3, 1800);
        players[1].add_opponent(10, 1800);
        players[2].add_opponent(1, 2000);
        let rules = GroupRules {
            players: &players,
            floaters: &[],
        };
        let mut budget = SearchBudget::new(100);
        let pairs = pair_group(&rules, &[0, 1, 2, 3], &BlossomOracle, &mut budget).unwrap();
        assert_eq!(pairs, Some(vec![(0, 3), (1, 2)]));
    }

    #[test]
    fn shifters_leave_absolute_players_in_place() {
        let players = vec![
            seeker(1, 2000, &[Color::Black, Color::Black]),
            seeker(2, 1900, &[Color::Black, Color::Black]),
            seeker(3, 1800, &[Color::Black]),
            seeker(4, 1700, &[Color::Black]),
        ];
        let rules = GroupRules {
            players: &players,
            floaters: &[],
        };
        let mut budget = SearchBudget::new(100);
        let pairs = pair_group(&rules, &[0, 1, 2, 3], &BlossomOracle, &mut budget)
            .unwrap()
            .unwrap();
        assert_eq!(pairs.len(), 2);
        for (white, black) in pairs {
            assert!(white < 2 && black >= 2);
        }
    }

    #[test]
    fn floaters_never_meet_each_other() {
        let players: Vec<Player> = (1..=4).map(|i| seeker(i, 2000 - i * 10, &[])).collect();
        let rules = GroupRules {
            players: &players,
            floaters: &[2, 3],
        };
        let mut budget = SearchBudget::new(100);
        let pairs = pair_group(&rules, &[0, 1, 2, 3], &BlossomOracle, &mut budget)
            .unwrap()
            .unwrap();
        for (a, b) in pairs {
            assert!(!(rules.floaters.contains(&a) && rules.floaters.contains(&b)));
        }
    }

    #[test]
    fn odd_group_cannot_be_paired() {
        let players: Vec<Player> = (1..=3).map(|i| seeker(i, 2000, &[])).collect();
        let rules = GroupRules {
            players: &players,
            floaters: &[],
        };
        let mut budget = SearchBudget::new(100);
        assert_eq!(pair_group(&rules, &[0, 1, 2], &BlossomOracle, &mut budget).unwrap(), None);
    }
}
