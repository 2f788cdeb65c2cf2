//! Maximum weight matching in general graphs (Edmonds' blossom algorithm with
//! primal-dual updates, O(n^3)).
//!
//! Integer weights only; duals stay integral when all weights are even.
//! Endpoint indices `p` address edge `p / 2`, side `p % 2`, so `p ^ 1` is the
//! other end of the same edge.

const UNSET: isize = -1;

/// Compute a maximum weight matching. With `max_cardinality`, only matchings of
/// maximum size are considered. Returns the mate of each vertex.
pub(crate) fn max_weight_matching(
    vertex_count: usize,
    edges: &[(usize, usize, i64)],
    max_cardinality: bool,
) -> Vec<Option<usize>> {
    if edges.is_empty() {
        return vec![None; vertex_count];
    }
    let mut state = Blossom::new(vertex_count, edges);
    state.solve(max_cardinality);
    state
        .mate
        .iter()
        .map(|&m| (m >= 0).then(|| state.endpoint[m as usize]))
        .collect()
}

/// Wrap a possibly negative cyclic index into `0..len`.
fn at(len: usize, j: isize) -> usize {
    j.rem_euclid(len as isize) as usize
}

struct Blossom<'a> {
    n: usize,
    edges: &'a [(usize, usize, i64)],
    endpoint: Vec<usize>,
    neighbors: Vec<Vec<usize>>,
    mate: Vec<isize>,
    label: Vec<u8>,
    label_end: Vec<isize>,
    in_blossom: Vec<usize>,
    parent: Vec<isize>,
    children: Vec<Vec<usize>>,
    base: Vec<isize>,
    endps: Vec<Vec<usize>>,
    best_edge: Vec<isize>,
    best_edges: Vec<Option<Vec<usize>>>,
    unused: Vec<usize>,
    dual: Vec<i64>,
    allowed: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a> Blossom<'a> {
    fn new(vertex_count: usize, edges: &'a [(usize, usize, i64)]) -> Self {
        let n = edges
            .iter()
            .map(|&(i, j, _)| i.max(j) + 1)
            .max()
            .unwrap_or(0)
            .max(vertex_count);
        let max_weight = edges.iter().map(|e| e.2).max().unwrap_or(0).max(0);
        let endpoint: Vec<usize> = (0..2 * edges.len())
            .map(|p| {
                let (i, j, _) = edges[p / 2];
                if p % 2 == 0 {
                    i
                } else {
                    j
                }
            })
            .collect();
        let mut neighbors = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            neighbors[i].push(2 * k + 1);
            neighbors[j].push(2 * k);
        }
        let mut dual = vec![max_weight; n];
        dual.extend(std::iter::repeat(0).take(n));
        Self {
            n,
            edges,
            endpoint,
            neighbors,
            mate: vec![UNSET; n],
            label: vec![0; 2 * n],
            label_end: vec![UNSET; 2 * n],
            in_blossom: (0..n).collect(),
            parent: vec![UNSET; 2 * n],
            children: vec![Vec::new(); 2 * n],
            base: (0..n as isize).chain(std::iter::repeat(UNSET).take(n)).collect(),
            endps: vec![Vec::new(); 2 * n],
            best_edge: vec![UNSET; 2 * n],
            best_edges: vec![None; 2 * n],
            unused: (n..2 * n).collect(),
            dual,
            allowed: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    fn slack(&self, k: usize) -> i64 {
        let (i, j, w) = self.edges[k];
        self.dual[i] + self.dual[j] - 2 * w
    }

    fn leaves(&self, b: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                out.push(t);
            } else {
                stack.extend(self.children[t].iter().rev());
            }
        }
        out
    }

    fn assign_label(&mut self, w: usize, t: u8, p: isize) {
        let b = self.in_blossom[w];
        self.label[w] = t;
        self.label[b] = t;
        self.label_end[w] = p;
        self.label_end[b] = p;
        self.best_edge[w] = UNSET;
        self.best_edge[b] = UNSET;
        if t == 1 {
            let leaves = self.leaves(b);
            self.queue.extend(leaves);
        } else if t == 2 {
            let base = self.base[b] as usize;
            let m = self.mate[base];
            self.assign_label(self.endpoint[m as usize], 1, m ^ 1);
        }
    }

    /// Trace back from `v` and `w` to find a new blossom base, or UNSET for an augmenting path.
    fn scan_blossom(&mut self, v: usize, w: usize) -> isize {
        let mut path = Vec::new();
        let mut base = UNSET;
        let (mut v, mut w) = (v as isize, w as isize);
        while v != UNSET || w != UNSET {
            let mut b = self.in_blossom[v as usize];
            if self.label[b] & 4 != 0 {
                base = self.base[b];
                break;
            }
            path.push(b);
            self.label[b] = 5;
            if self.label_end[b] == UNSET {
                v = UNSET;
            } else {
                v = self.endpoint[self.label_end[b] as usize] as isize;
                b = self.in_blossom[v as usize];
                v = self.endpoint[self.label_end[b] as usize] as isize;
            }
            if w != UNSET {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = 1;
        }
        base
    }

    fn add_blossom(&mut self, base: usize, k: usize) {
        let (v, w, _) = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];
        let Some(b) = self.unused.pop() else {
            return;
        };
        self.base[b] = base as isize;
        self.parent[b] = UNSET;
        self.parent[bb] = b as isize;
        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.parent[bv] = b as isize;
            path.push(bv);
            endps.push(self.label_end[bv] as usize);
            let next = self.endpoint[self.label_end[bv] as usize];
            bv = self.in_blossom[next];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.parent[bw] = b as isize;
            path.push(bw);
            endps.push((self.label_end[bw] ^ 1) as usize);
            let next = self.endpoint[self.label_end[bw] as usize];
            bw = self.in_blossom[next];
        }
        self.children[b] = path.clone();
        self.endps[b] = endps;
        self.label[b] = 1;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0;
        for v in self.leaves(b) {
            if self.label[self.in_blossom[v]] == 2 {
                self.queue.push(v);
            }
            self.in_blossom[v] = b;
        }

        let mut best_to = vec![UNSET; 2 * self.n];
        for &sub in &path {
            let lists: Vec<Vec<usize>> = match self.best_edges[sub].take() {
                Some(list) => vec![list],
                None => self
                    .leaves(sub)
                    .into_iter()
                    .map(|v| self.neighbors[v].iter().map(|p| p / 2).collect())
                    .collect(),
            };
            for list in lists {
                for k in list {
                    let (mut i, mut j, _) = self.edges[k];
                    if self.in_blossom[j] == b {
                        std::mem::swap(&mut i, &mut j);
                    }
                    let bj = self.in_blossom[j];
                    if bj != b
                        && self.label[bj] == 1
                        && (best_to[bj] == UNSET || self.slack(k) < self.slack(best_to[bj] as usize))
                    {
                        best_to[bj] = k as isize;
                    }
                }
            }
            self.best_edge[sub] = UNSET;
        }
        let best: Vec<usize> = best_to.into_iter().filter(|&k| k != UNSET).map(|k| k as usize).collect();
        self.best_edge[b] = UNSET;
        for &k in &best {
            if self.best_edge[b] == UNSET || self.slack(k) < self.slack(self.best_edge[b] as usize) {
                self.best_edge[b] = k as isize;
            }
        }
        self.best_edges[b] = Some(best);
    }

    fn expand_blossom(&mut self, b: usize, end_stage: bool) {
        let children = self.children[b].clone();
        for &s in &children {
            self.parent[s] = UNSET;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] == 0 {
                self.expand_blossom(s, end_stage);
            } else {
                for v in self.leaves(s) {
                    self.in_blossom[v] = s;
                }
            }
        }

        if !end_stage && self.label[b] == 2 {
            let len = children.len();
            let endps = self.endps[b].clone();
            let entry = self.in_blossom[self.endpoint[(self.label_end[b] ^ 1) as usize]];
            let mut j = children.iter().position(|&c| c == entry).unwrap_or(0) as isize;
            let (step, trick): (isize, usize) = if j & 1 != 0 {
                j -= len as isize;
                (1, 0)
            } else {
                (-1, 1)
            };
            let mut p = self.label_end[b];
            while j != 0 {
                self.label[self.endpoint[(p ^ 1) as usize]] = 0;
                let e = endps[at(len, j - trick as isize)];
                self.label[self.endpoint[e ^ trick ^ 1]] = 0;
                self.assign_label(self.endpoint[(p ^ 1) as usize], 2, p);
                self.allowed[e / 2] = true;
                j += step;
                p = (endps[at(len, j - trick as isize)] ^ trick) as isize;
                self.allowed[(p / 2) as usize] = true;
                j += step;
            }
            let bv = children[at(len, j)];
            let ep = self.endpoint[(p ^ 1) as usize];
            self.label[ep] = 2;
            self.label[bv] = 2;
            self.label_end[ep] = p;
            self.label_end[bv] = p;
            self.best_edge[bv] = UNSET;
            j += step;
            while children[at(len, j)] != entry {
                let bv = children[at(len, j)];
                if self.label[bv] == 1 {
                    j += step;
                    continue;
                }
                let reached = self.leaves(bv).into_iter().find(|&v| self.label[v] != 0);
                if let Some(v) = reached {
                    self.label[v] = 0;
                    let m = self.mate[self.base[bv] as usize];
                    self.label[self.endpoint[m as usize]] = 0;
                    self.assign_label(v, 2, self.label_end[v]);
                }
                j += step;
            }
        }

        self.label[b] = 0;
        self.label_end[b] = UNSET;
        self.children[b].clear();
        self.endps[b].clear();
        self.base[b] = UNSET;
        self.best_edges[b] = None;
        self.best_edge[b] = UNSET;
        self.unused.push(b);
    }

    /// Swap matched and unmatched edges along the even path from `v` to the base of `b`.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.parent[t] != b as isize {
            t = self.parent[t] as usize;
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }
        let len = self.children[b].len();
        let i = self.children[b].iter().position(|&c| c == t).unwrap_or(0);
        let mut j = i as isize;
        let (step, trick): (isize, usize) = if i & 1 != 0 {
            j -= len as isize;
            (1, 0)
        } else {
            (-1, 1)
        };
        while j != 0 {
            j += step;
            let t = self.children[b][at(len, j)];
            let p = self.endps[b][at(len, j - trick as isize)] ^ trick;
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p]);
            }
            j += step;
            let t = self.children[b][at(len, j)];
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p ^ 1]);
            }
            self.mate[self.endpoint[p]] = (p ^ 1) as isize;
            self.mate[self.endpoint[p ^ 1]] = p as isize;
        }
        self.children[b].rotate_left(i);
        self.endps[b].rotate_left(i);
        self.base[b] = self.base[self.children[b][0]];
    }

    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (start, first) in [(v, 2 * k + 1), (w, 2 * k)] {
            let (mut s, mut p) = (start, first);
            loop {
                let bs = self.in_blossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p as isize;
                if self.label_end[bs] == UNSET {
                    break;
                }
                let t = self.endpoint[self.label_end[bs] as usize];
                let bt = self.in_blossom[t];
                s = self.endpoint[self.label_end[bt] as usize];
                let j = self.endpoint[(self.label_end[bt] ^ 1) as usize];
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.label_end[bt];
                p = (self.label_end[bt] ^ 1) as usize;
            }
        }
    }

    fn solve(&mut self, max_cardinality: bool) {
        let n = self.n;
        for _ in 0..n {
            self.label.iter_mut().for_each(|l| *l = 0);
            self.best_edge.iter_mut().for_each(|e| *e = UNSET);
            for b in n..2 * n {
                self.best_edges[b] = None;
            }
            self.allowed.iter_mut().for_each(|a| *a = false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v] == UNSET && self.label[self.in_blossom[v]] == 0 {
                    self.assign_label(v, 1, UNSET);
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(v) = self.queue.pop() else {
                        break;
                    };
                    for idx in 0..self.neighbors[v].len() {
                        let p = self.neighbors[v][idx];
                        let k = p / 2;
                        let w = self.endpoint[p];
                        if self.in_blossom[v] == self.in_blossom[w] {
                            continue;
                        }
                        let mut k_slack = 0;
                        if !self.allowed[k] {
                            k_slack = self.slack(k);
                            if k_slack <= 0 {
                                self.allowed[k] = true;
                            }
                        }
                        if self.allowed[k] {
                            if self.label[self.in_blossom[w]] == 0 {
                                self.assign_label(w, 2, (p ^ 1) as isize);
                            } else if self.label[self.in_blossom[w]] == 1 {
                                let base = self.scan_blossom(v, w);
                                if base >= 0 {
                                    self.add_blossom(base as usize, k);
                                } else {
                                    self.augment_matching(k);
                                    augmented = true;
                                    break;
                                }
                            } else if self.label[w] == 0 {
                                self.label[w] = 2;
                                self.label_end[w] = (p ^ 1) as isize;
                            }
                        } else if self.label[self.in_blossom[w]] == 1 {
                            let b = self.in_blossom[v];
                            if self.best_edge[b] == UNSET || k_slack < self.slack(self.best_edge[b] as usize) {
                                self.best_edge[b] = k as isize;
                            }
                        } else if self.label[w] == 0
                            && (self.best_edge[w] == UNSET || k_slack < self.slack(self.best_edge[w] as usize))
                        {
                            self.best_edge[w] = k as isize;
                        }
                    }
                }
                if augmented {
                    break;
                }

                let mut delta_type = 0u8;
                let mut delta = 0i64;
                let mut delta_edge = 0usize;
                let mut delta_blossom = 0usize;
                if !max_cardinality {
                    delta_type = 1;
                    delta = self.dual[..n].iter().copied().min().unwrap_or(0);
                }
                for v in 0..n {
                    if self.label[self.in_blossom[v]] == 0 && self.best_edge[v] != UNSET {
                        let d = self.slack(self.best_edge[v] as usize);
                        if delta_type == 0 || d < delta {
                            delta = d;
                            delta_type = 2;
                            delta_edge = self.best_edge[v] as usize;
                        }
                    }
                }
                for b in 0..2 * n {
                    if self.parent[b] == UNSET && self.label[b] == 1 && self.best_edge[b] != UNSET {
                        let d = self.slack(self.best_edge[b] as usize) / 2;
                        if delta_type == 0 || d < delta {
                            delta = d;
                            delta_type = 3;
                            delta_edge = self.best_edge[b] as usize;
                        }
                    }
                }
                for b in n..2 * n {
                    if self.base[b] >= 0
                        && self.parent[b] == UNSET
                        && self.label[b] == 2
                        && (delta_type == 0 || self.dual[b] < delta)
                    {
                        delta = self.dual[b];
                        delta_type = 4;
                        delta_blossom = b;
                    }
                }
                if delta_type == 0 {
                    delta_type = 1;
                    delta = self.dual[..n].iter().copied().min().unwrap_or(0).max(0);
                }

                for v in 0..n {
                    match self.label[self.in_blossom[v]] {
                        1 => self.dual[v] -= delta,
                        2 => self.dual[v] += delta,
                        _ => {}
                    }
                }
                for b in n..2 * n {
                    if self.base[b] >= 0 && self.parent[b] == UNSET {
                        match self.label[b] {
                            1 => self.dual[b] += delta,
                            2 => self.dual[b] -= delta,
                            _ => {}
                        }
                    }
                }

                match delta_type {
                    1 => break,
                    2 => {
                        self.allowed[delta_edge] = true;
                        let (mut i, mut j, _) = self.edges[delta_edge];
                        if self.label[self.in_blossom[i]] == 0 {
                            std::mem::swap(&mut i, &mut j);
                        }
                        self.queue.push(i);
                    }
                    3 => {
                        self.allowed[delta_edge] = true;
                        let (i, _, _) = self.edges[delta_edge];
                        self.queue.push(i);
                    }
                    _ => self.expand_blossom(delta_blossom, false),
                }
            }

            if !augmented {
                break;
            }
            for b in n..2 * n {
                if self.parent[b] == UNSET && self.base[b] >= 0 && self.label[b] == 1 && self.dual[b] == 0 {
                    self.expand_blossom(b, true);
                }
            }
        }
    }
}
