//! Choosing players to float up from lower score groups.

use crate::logic::groups::SeekerLists;
use crate::logic::matching::{MatchingGraph, MatchingOracle};
use crate::models::{Color, Player};

/// Rules shared by the floater searches.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FloatContext {
    pub round: u32,
    pub total_rounds: u32,
}

impl FloatContext {
    /// Float history limits are waived in the last round.
    fn limits_apply(&self) -> bool {
        self.round < self.total_rounds
    }
}

/// Single floater candidates for an odd group, best first.
///
/// Each lower group is scanned in order and bucketed: eligible, wrong colour for
/// the group's seeker imbalance, at the float limit, floated last round.
/// Candidates with no possible opponent in the group are dropped.
pub(crate) fn find_upfloaters(
    players: &[Player],
    group: &[usize],
    lower: &[Vec<usize>],
    ctx: FloatContext,
) -> Vec<usize> {
    let lists = SeekerLists::split(players, group);
    let surplus = lists.white.len() as i64 - lists.black.len() as i64;
    let mut out = Vec::new();
    for g in lower {
        let (mut eligible, mut wrong, mut maxed, mut repeated) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        for &i in g {
            let p = &players[i];
            if ctx.limits_apply() && !p.can_upfloat(ctx.total_rounds) {
                maxed.push(i);
            } else if ctx.limits_apply() && p.upfloated_last_round {
                repeated.push(i);
            } else if (surplus > 0 && p.due_color() == Color::White) || (surplus < 0 && p.due_color() == Color::Black) {
                wrong.push(i);
            } else {
                eligible.push(i);
            }
        }
        out.extend(eligible);
        out.extend(wrong);
        out.extend(maxed);
        out.extend(repeated);
    }
    out.retain(|&c| group.iter().any(|&m| players[m].can_play(&players[c])));
    out
}

/// Every lower player in float preference order, colour ignored. Buckets
/// follow `find_upfloaters`: eligible, at the float limit, floated last round.
pub(crate) fn float_queue(players: &[Player], lower: &[Vec<usize>], ctx: FloatContext) -> Vec<usize> {
    let mut out = Vec::new();
    for g in lower {
        let (mut eligible, mut maxed, mut repeated) = (Vec::new(), Vec::new(), Vec::new());
        for &i in g {
            let p = &players[i];
            if ctx.limits_apply() && !p.can_upfloat(ctx.total_rounds) {
                maxed.push(i);
            } else if ctx.limits_apply() && p.upfloated_last_round {
                repeated.push(i);
            } else {
                eligible.push(i);
            }
        }
        out.extend(eligible);
        out.extend(maxed);
        out.extend(repeated);
    }
    out
}

/// Floaters needed so that `group` plus floaters pairs internally while the
/// rest still pairs: the outside ends of cross edges in a matching that prices
/// every cross edge above any number of in-group edges.
pub(crate) fn find_multi_upfloaters(
    players: &[Player],
    group: &[usize],
    queue: &[usize],
    oracle: &dyn MatchingOracle,
) -> Option<Vec<usize>> {
    let vertices: Vec<usize> = group.iter().chain(queue).copied().collect();
    let n = vertices.len() as u64;
    let cross_base = (n + 1) * (n + 1);
    let inside = group.len();
    let mut graph = MatchingGraph::new(vertices.len());
    for a in 0..vertices.len() {
        for b in a + 1..vertices.len() {
            if !players[vertices[a]].can_play(&players[vertices[b]]) {
                continue;
            }
            let cost = match (a < inside, b < inside) {
                (true, false) => cross_base + (b - inside) as u64,
                _ => 0,
            };
            graph.add_edge(a, b, cost);
        }
    }
    let matching = oracle.min_cost_perfect_matching(&graph)?;
    let mut floaters: Vec<usize> = matching
        .into_iter()
        .filter(|&(a, b)| a < inside && b >= inside)
        .map(|(_, b)| b)
        .collect();
    floaters.sort_unstable();
    let floaters: Vec<usize> = floaters.into_iter().map(|v| vertices[v]).collect();
    (!floaters.is_empty()).then_some(floaters)
}
