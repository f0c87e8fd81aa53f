//! Dense ranking problem extracted from the layout graph.
//!
//! Ranking runs on leaf nodes only, with parallel edges merged (weights summed, `minlen`
//! maximized) in first-occurrence order. Each weakly connected component becomes its own
//! problem with local indices, so the ranker never sees compound structure or arena handles.

use crate::model::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;
use sirenia_graph::{NodeIx, alg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankEdge {
    pub v: usize,
    pub w: usize,
    pub minlen: i32,
    pub weight: i64,
}

#[derive(Debug, Clone, Default)]
pub struct RankProblem {
    pub nodes: Vec<NodeIx>,
    pub edges: Vec<RankEdge>,
    pub out: Vec<Vec<usize>>,
    pub inc: Vec<Vec<usize>>,
    pub rank: Vec<i32>,
    index: HashMap<(usize, usize), usize>,
}

impl RankProblem {
    pub fn new(node_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            edges: Vec::new(),
            out: vec![Vec::new(); node_count],
            inc: vec![Vec::new(); node_count],
            rank: vec![0; node_count],
            index: HashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Adds `v -> w`, merging into an existing edge between the same ordered pair.
    pub fn add_edge(&mut self, v: usize, w: usize, minlen: i32, weight: i64) {
        if let Some(&i) = self.index.get(&(v, w)) {
            let e = &mut self.edges[i];
            e.weight += weight;
            e.minlen = e.minlen.max(minlen);
            return;
        }
        let i = self.edges.len();
        self.edges.push(RankEdge {
            v,
            w,
            minlen,
            weight,
        });
        self.out[v].push(i);
        self.inc[w].push(i);
        self.index.insert((v, w), i);
    }

    pub fn edge_between(&self, v: usize, w: usize) -> Option<usize> {
        self.index.get(&(v, w)).copied()
    }

    pub fn slack(&self, e: usize) -> i32 {
        let edge = &self.edges[e];
        self.rank[edge.w] - self.rank[edge.v] - edge.minlen
    }

    /// Incoming edges followed by outgoing edges of `v`.
    pub fn node_edges(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.inc[v].iter().chain(self.out[v].iter()).copied()
    }

    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&v| self.inc[v].is_empty())
    }

    pub fn normalize(&mut self) {
        if let Some(min) = self.rank.iter().copied().min() {
            for r in &mut self.rank {
                *r -= min;
            }
        }
    }
}

/// One problem per weakly connected component of the leaf graph, in node insertion order.
pub fn build_components(g: &LayoutGraph) -> Vec<RankProblem> {
    const NONE: usize = usize::MAX;
    let mut component_of = vec![NONE; g.node_bound()];
    let mut local = vec![0usize; g.node_bound()];
    let mut problems: Vec<RankProblem> = Vec::new();
    for mut members in alg::components(g) {
        members.retain(|&v| !g.has_children(v));
        if members.is_empty() {
            continue;
        }
        members.sort();
        for (i, &v) in members.iter().enumerate() {
            component_of[v.index()] = problems.len();
            local[v.index()] = i;
        }
        let mut p = RankProblem::new(members.len());
        p.nodes = members;
        problems.push(p);
    }

    for e in g.edges() {
        let (v, w) = g.endpoints(e);
        let c = component_of[v.index()];
        if v == w || c == NONE || component_of[w.index()] != c {
            continue;
        }
        let label = g.edge(e);
        problems[c].add_edge(local[v.index()], local[w.index()], label.minlen, label.weight);
    }
    problems
}

/// Writes solved ranks back to the graph.
pub fn apply(g: &mut LayoutGraph, p: &RankProblem) {
    for (i, &v) in p.nodes.iter().enumerate() {
        g.node_mut(v).rank = Some(p.rank[i]);
    }
}
