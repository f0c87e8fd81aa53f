//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! Minimizes `sum(weight * (rank(w) - rank(v)))` subject to `rank(w) - rank(v) >= minlen`.
//! Cut values are exact integers. The leaving edge is the first tree edge (in tree edge order)
//! with a negative cut value; the entering edge is the minimum-slack edge crossing the induced
//! cut, the earliest edge winning ties.

use super::feasible_tree::{TightTree, feasible_tree};
use super::longest_path::longest_path;
use super::problem::RankProblem;

#[derive(Debug, Clone)]
struct TreeState {
    low: Vec<usize>,
    lim: Vec<usize>,
    parent: Vec<Option<usize>>,
    /// Cut value of the tree edge between a node and its parent.
    cut: Vec<i64>,
    /// Nodes in DFS preorder from the root.
    preorder: Vec<usize>,
    /// Non-root nodes in increasing `lim` (DFS postorder).
    postorder: Vec<usize>,
}

pub fn network_simplex(p: &mut RankProblem) {
    if p.len() <= 1 {
        p.rank.iter_mut().for_each(|r| *r = 0);
        return;
    }
    longest_path(p);
    let mut t = feasible_tree(p);
    let mut state = init_state(&t, p);

    while let Some(leave) = leave_edge(&t, &state) {
        let Some(enter) = enter_edge(&t, &state, p, leave) else {
            break;
        };
        exchange_edges(&mut t, &mut state, p, leave, enter);
    }
}

fn init_state(t: &TightTree, p: &RankProblem) -> TreeState {
    let mut state = TreeState {
        low: vec![0; p.len()],
        lim: vec![0; p.len()],
        parent: vec![None; p.len()],
        cut: vec![0; p.len()],
        preorder: Vec::with_capacity(p.len()),
        postorder: Vec::with_capacity(p.len()),
    };
    init_low_lim(t, &mut state);
    init_cut_values(&mut state, p);
    state
}

fn tree_neighbors(t: &TightTree, n: usize) -> Vec<Vec<usize>> {
    let mut nbrs: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(a, b) in &t.edges {
        nbrs[a].push(b);
        nbrs[b].push(a);
    }
    nbrs
}

fn init_low_lim(t: &TightTree, state: &mut TreeState) {
    let n = state.low.len();
    let Some(&root) = t.nodes.first() else {
        return;
    };
    let nbrs = tree_neighbors(t, n);
    let mut visited = vec![false; n];
    state.preorder.clear();
    state.postorder.clear();

    let mut next_lim = 1usize;
    visited[root] = true;
    state.parent[root] = None;
    state.low[root] = next_lim;
    state.preorder.push(root);
    let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
    while let Some((v, i)) = frames.last_mut() {
        let v = *v;
        if let Some(&w) = nbrs[v].get(*i) {
            *i += 1;
            if !visited[w] {
                visited[w] = true;
                state.parent[w] = Some(v);
                state.low[w] = next_lim;
                state.preorder.push(w);
                frames.push((w, 0));
            }
            continue;
        }
        state.lim[v] = next_lim;
        next_lim += 1;
        if v != root {
            state.postorder.push(v);
        }
        frames.pop();
    }
}

fn init_cut_values(state: &mut TreeState, p: &RankProblem) {
    let order = std::mem::take(&mut state.postorder);
    for &v in &order {
        state.cut[v] = calc_cut_value(state, p, v);
    }
    state.postorder = order;
}

fn calc_cut_value(state: &TreeState, p: &RankProblem, child: usize) -> i64 {
    let Some(parent) = state.parent[child] else {
        return 0;
    };
    let (child_is_tail, tree_edge) = match p.edge_between(child, parent) {
        Some(e) => (true, e),
        None => match p.edge_between(parent, child) {
            Some(e) => (false, e),
            None => return 0,
        },
    };

    let mut cut = p.edges[tree_edge].weight;
    for e in p.node_edges(child) {
        let edge = p.edges[e];
        let is_out = edge.v == child;
        let other = if is_out { edge.w } else { edge.v };
        if other == parent {
            continue;
        }
        let points_to_head = is_out == child_is_tail;
        cut += if points_to_head {
            edge.weight
        } else {
            -edge.weight
        };
        if state.parent[other] == Some(child) {
            let other_cut = state.cut[other];
            cut += if points_to_head { -other_cut } else { other_cut };
        }
    }
    cut
}

fn cut_of(state: &TreeState, (a, b): (usize, usize)) -> i64 {
    if state.parent[a] == Some(b) {
        state.cut[a]
    } else {
        state.cut[b]
    }
}

fn leave_edge(t: &TightTree, state: &TreeState) -> Option<usize> {
    t.edges.iter().position(|&e| cut_of(state, e) < 0)
}

fn is_descendant(state: &TreeState, v: usize, root: usize) -> bool {
    state.low[root] <= state.lim[v] && state.lim[v] <= state.lim[root]
}

fn enter_edge(t: &TightTree, state: &TreeState, p: &RankProblem, leave: usize) -> Option<usize> {
    let (mut v, mut w) = t.edges[leave];
    if p.edge_between(v, w).is_none() {
        (v, w) = (w, v);
    }

    let (tail, flip) = if state.lim[v] > state.lim[w] {
        (w, true)
    } else {
        (v, false)
    };

    let mut best: Option<(i32, usize)> = None;
    for (e, edge) in p.edges.iter().enumerate() {
        if flip != is_descendant(state, edge.v, tail) || flip == is_descendant(state, edge.w, tail)
        {
            continue;
        }
        let slack = p.slack(e);
        if best.is_none_or(|(s, _)| slack < s) {
            best = Some((slack, e));
        }
    }
    best.map(|(_, e)| e)
}

fn exchange_edges(
    t: &mut TightTree,
    state: &mut TreeState,
    p: &mut RankProblem,
    leave: usize,
    enter: usize,
) {
    t.edges.remove(leave);
    let f = p.edges[enter];
    t.edges.push((f.v, f.w));
    init_low_lim(t, state);
    init_cut_values(state, p);
    update_ranks(state, p);
}

fn update_ranks(state: &TreeState, p: &mut RankProblem) {
    for &v in state.preorder.iter().skip(1) {
        let Some(parent) = state.parent[v] else {
            continue;
        };
        let (minlen, flipped) = match p.edge_between(v, parent) {
            Some(e) => (p.edges[e].minlen, false),
            None => match p.edge_between(parent, v) {
                Some(e) => (p.edges[e].minlen, true),
                None => continue,
            },
        };
        p.rank[v] = p.rank[parent] + if flipped { minlen } else { -minlen };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(n: usize, edges: &[(usize, usize, i32, i64)]) -> RankProblem {
        let mut p = RankProblem::new(n);
        for &(v, w, minlen, weight) in edges {
            p.add_edge(v, w, minlen, weight);
        }
        p
    }

    #[test]
    fn cut_values_are_computed_for_every_tree_edge() {
        // Gansner et al. figure 2-1 style graph.
        let mut p = problem(
            8,
            &[
                (0, 1, 1, 1),
                (1, 2, 1, 1),
                (2, 3, 1, 1),
                (3, 7, 1, 1),
                (0, 4, 1, 1),
                (4, 6, 1, 1),
                (0, 5, 1, 1),
                (5, 6, 1, 1),
                (6, 7, 1, 1),
            ],
        );
        longest_path(&mut p);
        let t = feasible_tree(&mut p);
        let state = init_state(&t, &p);
        assert_eq!(t.nodes.len(), 8);
        for &v in &state.postorder {
            assert!(state.parent[v].is_some());
        }
    }

    #[test]
    fn simplex_tightens_long_edges() {
        let mut p = problem(
            4,
            &[(0, 1, 1, 1), (1, 2, 1, 1), (0, 3, 1, 1), (3, 2, 1, 1), (0, 2, 1, 1)],
        );
        network_simplex(&mut p);
        p.normalize();
        assert_eq!(p.rank, vec![0, 1, 2, 1]);
    }
}
