//! Traversal helpers over [`Graph`](super::Graph).
//!
//! Traversals use explicit stacks and queues, so deep chains of dummy nodes do not exhaust the
//! call stack.

use super::{Graph, NodeIx};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleFound;

impl std::fmt::Display for CycleFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("graph contains a cycle")
    }
}

impl std::error::Error for CycleFound {}

/// Weakly connected components. Components and their members appear in discovery order,
/// starting from nodes in insertion order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<NodeIx>> {
    let mut seen = vec![false; g.node_bound()];
    let mut out: Vec<Vec<NodeIx>> = Vec::new();

    for start in g.nodes() {
        if seen[start.index()] {
            continue;
        }
        seen[start.index()] = true;
        let mut comp: Vec<NodeIx> = Vec::new();
        let mut q: VecDeque<NodeIx> = VecDeque::from([start]);
        while let Some(v) = q.pop_front() {
            comp.push(v);
            for n in g.neighbors(v) {
                if !seen[n.index()] {
                    seen[n.index()] = true;
                    q.push_back(n);
                }
            }
        }
        out.push(comp);
    }
    out
}

/// Kahn topological sort; sources are released in insertion order.
pub fn topsort<N, E, G>(g: &Graph<N, E, G>) -> Result<Vec<NodeIx>, CycleFound> {
    let mut indegree = vec![0usize; g.node_bound()];
    for e in g.edges() {
        indegree[g.target(e).index()] += 1;
    }
    let mut ready: VecDeque<NodeIx> = g
        .nodes()
        .filter(|v| indegree[v.index()] == 0)
        .collect();
    let mut out: Vec<NodeIx> = Vec::with_capacity(g.node_count());
    while let Some(v) = ready.pop_front() {
        out.push(v);
        for &e in g.out_edges(v) {
            let w = g.target(e);
            indegree[w.index()] -= 1;
            if indegree[w.index()] == 0 {
                ready.push_back(w);
            }
        }
    }
    if out.len() == g.node_count() {
        Ok(out)
    } else {
        Err(CycleFound)
    }
}

pub fn is_acyclic<N, E, G>(g: &Graph<N, E, G>) -> bool {
    topsort(g).is_ok()
}

/// Strongly connected components that contain a cycle: components of more than one node, plus
/// single nodes carrying a self-loop. Members are listed in insertion order; components are
/// ordered by their first member.
pub fn find_cycles<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<NodeIx>> {
    const UNSEEN: usize = usize::MAX;
    let bound = g.node_bound();
    let mut index = vec![UNSEEN; bound];
    let mut lowlink = vec![0usize; bound];
    let mut on_stack = vec![false; bound];
    let mut stack: Vec<NodeIx> = Vec::new();
    let mut next_index = 0usize;
    let mut sccs: Vec<Vec<NodeIx>> = Vec::new();

    for start in g.nodes() {
        if index[start.index()] != UNSEEN {
            continue;
        }
        // Iterative Tarjan: frames hold the node and the position in its successor list.
        let mut frames: Vec<(NodeIx, Vec<NodeIx>, usize)> = Vec::new();
        index[start.index()] = next_index;
        lowlink[start.index()] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack[start.index()] = true;
        frames.push((start, g.successors(start), 0));

        while let Some((v, succ, i)) = frames.last_mut() {
            let v = *v;
            if let Some(&w) = succ.get(*i) {
                *i += 1;
                if index[w.index()] == UNSEEN {
                    index[w.index()] = next_index;
                    lowlink[w.index()] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w.index()] = true;
                    frames.push((w, g.successors(w), 0));
                } else if on_stack[w.index()] {
                    lowlink[v.index()] = lowlink[v.index()].min(index[w.index()]);
                }
                continue;
            }

            frames.pop();
            if let Some((parent, _, _)) = frames.last() {
                let p = parent.index();
                lowlink[p] = lowlink[p].min(lowlink[v.index()]);
            }
            if lowlink[v.index()] == index[v.index()] {
                let mut scc: Vec<NodeIx> = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w.index()] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                sccs.push(scc);
            }
        }
    }

    let mut cycles: Vec<Vec<NodeIx>> = sccs
        .into_iter()
        .filter(|scc| scc.len() > 1 || g.has_edge(scc[0], scc[0]))
        .map(|mut scc| {
            scc.sort();
            scc
        })
        .collect();
    cycles.sort_by_key(|scc| scc[0]);
    cycles
}
