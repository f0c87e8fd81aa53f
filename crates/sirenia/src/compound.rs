//! Compound-node helpers.

use crate::model::{Dummy, EdgeLabel, LayoutGraph, Point};
use crate::util::{self, Rect};
use sirenia_graph::{EdgeIx, NodeIx};

/// Sets each subgraph's box from its border nodes, then removes every border node.
pub fn remove_border_nodes(g: &mut LayoutGraph) {
    let vs: Vec<NodeIx> = g.nodes().filter(|&v| g.has_children(v)).collect();
    for v in vs {
        let node = g.node(v);
        let (Some(bt), Some(bb)) = (node.border_top, node.border_bottom) else {
            continue;
        };
        let bl = node.border_left.iter().rev().find_map(|b| *b);
        let br = node.border_right.iter().rev().find_map(|b| *b);
        let (Some(bl), Some(br)) = (bl, br) else {
            continue;
        };
        let (t, b) = (g.node(bt).y, g.node(bb).y);
        let (l, r) = (g.node(bl).x, g.node(br).x);

        let width = (r - l).abs();
        let height = (b - t).abs();
        let n = g.node_mut(v);
        n.width = width;
        n.height = height;
        n.x = l + width / 2.0;
        n.y = t + height / 2.0;
    }

    let borders: Vec<NodeIx> = g
        .nodes()
        .filter(|&v| g.node(v).dummy == Some(Dummy::Border))
        .collect();
    for v in borders {
        g.remove_node(v);
    }
}

/// An edge with a subgraph endpoint, kept out of the layered phases.
#[derive(Debug, Clone)]
pub struct ClusterEdge {
    pub v: NodeIx,
    pub w: NodeIx,
    pub label: EdgeLabel,
}

/// Removes edges incident to nodes that have children. Such edges cannot be ranked against a
/// cluster, so they are routed straight between the final boxes instead.
pub fn stash_cluster_edges(g: &mut LayoutGraph) -> Vec<ClusterEdge> {
    let edges: Vec<EdgeIx> = g
        .edges()
        .filter(|&e| {
            let (v, w) = g.endpoints(e);
            g.has_children(v) || g.has_children(w)
        })
        .collect();
    let mut out = Vec::with_capacity(edges.len());
    for e in edges {
        let (v, w) = g.endpoints(e);
        out.push(ClusterEdge {
            v,
            w,
            label: g.edge(e).clone(),
        });
        g.remove_edge(e);
    }
    out
}

/// Re-adds stashed edges as two-point polylines between the clipped box outlines, with the label
/// at the midpoint.
pub fn restore_cluster_edges(g: &mut LayoutGraph, edges: Vec<ClusterEdge>) {
    for ClusterEdge { v, w, mut label } in edges {
        let (rv, rw) = (Rect::of(g.node(v)), Rect::of(g.node(w)));
        let start = util::intersect_rect(rv, Point { x: rw.x, y: rw.y });
        let end = util::intersect_rect(rw, Point { x: rv.x, y: rv.y });
        label.points = vec![start, end];
        if label.has_label() {
            label.x = Some((start.x + end.x) / 2.0);
            label.y = Some((start.y + end.y) / 2.0);
        }
        g.add_edge(v, w, label);
    }
}
