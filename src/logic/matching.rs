//! Minimum-cost perfect matching: the graph the engine builds and the oracle that solves it.

use crate::logic::blossom::max_weight_matching;

/// Undirected graph over `0..vertex_count` with non-negative edge costs.
#[derive(Clone, Debug, Default)]
pub struct MatchingGraph {
    vertex_count: usize,
    edges: Vec<(usize, usize, u64)>,
}

impl MatchingGraph {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
        }
    }

    /// Add an edge. Self loops and out-of-range vertices are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize, cost: u64) {
        if a != b && a < self.vertex_count && b < self.vertex_count {
            self.edges.push((a, b, cost));
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edges(&self) -> &[(usize, usize, u64)] {
        &self.edges
    }
}

/// Solver for minimum-cost perfect matchings.
pub trait MatchingOracle {
    /// Matched pairs `(a, b)` with `a < b`, sorted by `a`, covering every
    /// vertex at minimum total cost; `None` when no perfect matching exists.
    fn min_cost_perfect_matching(&self, graph: &MatchingGraph) -> Option<Vec<(usize, usize)>>;
}

/// Default oracle backed by the weighted blossom algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlossomOracle;

impl MatchingOracle for BlossomOracle {
    fn min_cost_perfect_matching(&self, graph: &MatchingGraph) -> Option<Vec<(usize, usize)>> {
        let n = graph.vertex_count();
        if n == 0 {
            return Some(Vec::new());
        }
        if n % 2 == 1 {
            return None;
        }
        // Maximum cardinality first, then maximum weight; weight falls as cost rises.
        let ceiling = graph.edges().iter().map(|e| e.2).max().unwrap_or(0) + 1;
        let weighted: Vec<(usize, usize, i64)> = graph
            .edges()
            .iter()
            .map(|&(a, b, cost)| (a, b, 2 * (ceiling - cost) as i64))
            .collect();
        let mates = max_weight_matching(n, &weighted, true);
        let mut pairs = Vec::with_capacity(n / 2);
        for (v, mate) in mates.iter().enumerate().take(n) {
            match mate {
                Some(m) if v < *m => pairs.push((v, *m)),
                Some(_) => {}
                None => return None,
            }
        }
        Some(pairs)
    }
}

/// Whether `n` vertices admit any perfect matching using edges where `edge` holds.
pub(crate) fn has_perfect_matching(
    oracle: &dyn MatchingOracle,
    n: usize,
    edge: impl Fn(usize, usize) -> bool,
) -> bool {
    let mut graph = MatchingGraph::new(n);
    for a in 0..n {
        for b in a + 1..n {
            if edge(a, b) {
                graph.add_edge(a, b, 0);
            }
        }
    }
    oracle.min_cost_perfect_matching(&graph).is_some()
}

/// Kuhn's augmenting path check: can every row be assigned a distinct column?
pub(crate) fn has_bipartite_assignment(rows: usize, cols: usize, edge: impl Fn(usize, usize) -> bool) -> bool {
    if rows != cols {
        return false;
    }
    let adj: Vec<Vec<usize>> = (0..rows).map(|r| (0..cols).filter(|&c| edge(r, c)).collect()).collect();
    let mut owner: Vec<Option<usize>> = vec![None; cols];
    for r in 0..rows {
        let mut seen = vec![false; cols];
        if !augment(r, &adj, &mut owner, &mut seen) {
            return false;
        }
    }
    true
}

fn augment(r: usize, adj: &[Vec<usize>], owner: &mut [Option<usize>], seen: &mut [bool]) -> bool {
    for &c in &adj[r] {
        if seen[c] {
            continue;
        }
        seen[c] = true;
        let free = match owner[c] {
            None => true,
            Some(other) => augment(other, adj, owner, seen),
        };
        if free {
            owner[c] = Some(r);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_cheapest_perfect_matching() {
        let mut g = MatchingGraph::new(4);
        g.add_edge(0, 1, 0);
        g.add_edge(2, 3, 0);
        g.add_edge(0, 2, 5);
        g.add_edge(1, 3, 5);
        assert_eq!(BlossomOracle.min_cost_perfect_matching(&g), Some(vec![(0, 1), (2, 3)]));
    }

    #[test]
    fn perfect_beats_cheap_partial() {
        // 1-2 is free but leaves 0 and 3 stranded
        let mut g = MatchingGraph::new(4);
        g.add_edge(1, 2, 0);
        g.add_edge(0, 1, 9);
        g.add_edge(2, 3, 9);
        assert_eq!(BlossomOracle.min_cost_perfect_matching(&g), Some(vec![(0, 1), (2, 3)]));
    }

    #[test]
    fn no_perfect_matching() {
        let mut g = MatchingGraph::new(4);
        g.add_edge(0, 1, 0);
        g.add_edge(0, 2, 0);
        g.add_edge(0, 3, 0);
        assert_eq!(BlossomOracle.min_cost_perfect_matching(&g), None);
        assert_eq!(BlossomOracle.min_cost_perfect_matching(&MatchingGraph::new(3)), None);
    }

    #[test]
    fn bipartite_assignment() {
        assert!(has_bipartite_assignment(2, 2, |r, c| r != c));
        assert!(!has_bipartite_assignment(2, 2, |_, c| c == 0));
    }
}
