//! Break cycles by reversing a feedback arc set (FAS).
//!
//! The default strategy is a depth-first search in node declaration order that reverses every
//! edge closing a cycle back onto the DFS stack. `Acyclicer::Greedy` uses the Eades–Lin–Smyth
//! heuristic from [`crate::greedy_fas`] instead. Self-edges must already be removed.

use crate::model::LayoutGraph;
use crate::options::Acyclicer;
use sirenia_graph::{EdgeIx, NodeIx, alg};

/// Reverses the edges of a feedback arc set and returns the new (reversed) edge handles.
pub fn run(g: &mut LayoutGraph, acyclicer: Acyclicer) -> Vec<EdgeIx> {
    let fas = match acyclicer {
        Acyclicer::Dfs => dfs_fas(g),
        Acyclicer::Greedy => crate::greedy_fas::greedy_fas(g, |lbl| lbl.weight),
    };

    let mut reversed: Vec<EdgeIx> = Vec::with_capacity(fas.len());
    for e in fas {
        let (v, w) = g.endpoints(e);
        if v == w || !g.is_edge_live(e) {
            continue;
        }
        let rev = g.reverse_edge(e);
        g.edge_mut(rev).reversed = true;
        reversed.push(rev);
    }
    debug_assert!(alg::is_acyclic(g), "feedback arc set left a cycle");
    tracing::debug!(reversed = reversed.len(), ?acyclicer, "cycles broken");
    reversed
}

/// Restores the declared orientation of reversed edges, reversing their polylines too.
///
/// The `reversed` flag is kept so callers can still report which edges were flipped.
pub fn undo(g: &mut LayoutGraph) {
    let edges: Vec<EdgeIx> = g.edges().filter(|&e| g.edge(e).reversed).collect();
    for e in edges {
        let restored = g.reverse_edge(e);
        g.edge_mut(restored).points.reverse();
    }
}

fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeIx> {
    let mut fas: Vec<EdgeIx> = Vec::new();
    let mut visited = vec![false; g.node_bound()];
    let mut on_stack = vec![false; g.node_bound()];

    for root in g.nodes() {
        if visited[root.index()] {
            continue;
        }
        visited[root.index()] = true;
        on_stack[root.index()] = true;
        let mut frames: Vec<(NodeIx, usize)> = vec![(root, 0)];

        while let Some((v, i)) = frames.last_mut() {
            let v = *v;
            let Some(&e) = g.out_edges(v).get(*i) else {
                on_stack[v.index()] = false;
                frames.pop();
                continue;
            };
            *i += 1;
            let w = g.target(e);
            if w == v {
                continue;
            }
            if on_stack[w.index()] {
                fas.push(e);
            } else if !visited[w.index()] {
                visited[w.index()] = true;
                on_stack[w.index()] = true;
                frames.push((w, 0));
            }
        }
    }
    fas
}
