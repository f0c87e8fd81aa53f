//! Feasible tight spanning tree.
//!
//! Starting from the first node, the tree greedily absorbs every node reachable through tight
//! edges (slack 0). When it stalls, the minimum-slack edge leaving the tree is made tight by
//! shifting all tree nodes, and the search resumes. The input problem must be connected.

use super::problem::RankProblem;

#[derive(Debug, Clone, Default)]
pub struct TightTree {
    /// Tree nodes in insertion order; `nodes[0]` is the root.
    pub nodes: Vec<usize>,
    /// Tree edges `(a, b)` in insertion order, oriented as they were added.
    pub edges: Vec<(usize, usize)>,
    pub in_tree: Vec<bool>,
}

impl TightTree {
    fn with_root(n: usize, root: usize) -> Self {
        let mut in_tree = vec![false; n];
        in_tree[root] = true;
        Self {
            nodes: vec![root],
            edges: Vec::new(),
            in_tree,
        }
    }

    fn add(&mut self, parent: usize, v: usize) {
        self.in_tree[v] = true;
        self.nodes.push(v);
        self.edges.push((parent, v));
    }
}

pub fn feasible_tree(p: &mut RankProblem) -> TightTree {
    let n = p.len();
    if n == 0 {
        return TightTree::default();
    }
    let mut t = TightTree::with_root(n, 0);

    while grow_tight_tree(&mut t, p) < n {
        let Some(e) = find_min_slack_edge(&t, p) else {
            break;
        };
        let edge = p.edges[e];
        let delta = if t.in_tree[edge.v] {
            p.slack(e)
        } else {
            -p.slack(e)
        };
        for &v in &t.nodes {
            p.rank[v] += delta;
        }
    }
    t
}

fn grow_tight_tree(t: &mut TightTree, p: &RankProblem) -> usize {
    let snapshot = t.nodes.clone();
    for start in snapshot {
        // Depth-first over node edges (incoming first), matching the recursive formulation.
        let mut frames: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some((v, i)) = frames.last_mut() {
            let v = *v;
            let Some(e) = p.node_edges(v).nth(*i) else {
                frames.pop();
                continue;
            };
            *i += 1;
            let edge = p.edges[e];
            let w = if edge.v == v { edge.w } else { edge.v };
            if !t.in_tree[w] && p.slack(e) == 0 {
                t.add(v, w);
                frames.push((w, 0));
            }
        }
    }
    t.nodes.len()
}

fn find_min_slack_edge(t: &TightTree, p: &RankProblem) -> Option<usize> {
    let mut best: Option<(i32, usize)> = None;
    for (e, edge) in p.edges.iter().enumerate() {
        if t.in_tree[edge.v] == t.in_tree[edge.w] {
            continue;
        }
        let slack = p.slack(e);
        if best.is_none_or(|(s, _)| slack < s) {
            best = Some((slack, e));
        }
    }
    best.map(|(_, e)| e)
}
