//! Self-loop extraction and reinsertion.
//!
//! Self-loops take no part in ranking or ordering. They are stashed on their node, come back as
//! placeholder nodes right after ordering (so placement reserves room for them), and turn into
//! five-point loop polylines once coordinates are known.

use crate::model::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, Point, SelfEdge};
use crate::util;
use sirenia_graph::{EdgeIx, NodeIx};

/// Removes every self-loop and returns `(edge, node)` pairs in edge order.
pub fn remove_self_edges(g: &mut LayoutGraph) -> Vec<(EdgeIx, NodeIx)> {
    let loops: Vec<EdgeIx> = g
        .edges()
        .filter(|&e| g.source(e) == g.target(e))
        .collect();
    let mut removed = Vec::with_capacity(loops.len());
    for e in loops {
        let v = g.source(e);
        let label = g.edge(e).clone();
        g.node_mut(v).self_edges.push(SelfEdge { edge: e, label });
        g.remove_edge(e);
        removed.push((e, v));
    }
    removed
}

/// Re-inserts stashed self-loops as placeholder nodes right after their owner in its layer.
pub fn insert_self_edges(g: &mut LayoutGraph) {
    for layer in util::build_layer_matrix(g) {
        let mut shift = 0usize;
        for (i, v) in layer.into_iter().enumerate() {
            g.node_mut(v).order = Some(i + shift);
            let self_edges = std::mem::take(&mut g.node_mut(v).self_edges);
            let rank = g.node(v).rank;
            for se in self_edges {
                shift += 1;
                util::add_dummy_node(
                    g,
                    Dummy::SelfEdge,
                    NodeLabel {
                        rank,
                        order: Some(i + shift),
                        edge_obj: Some(se.edge),
                        edge_label: Some(Box::new(se.label.clone())),
                        ..NodeLabel::new(se.label.width, se.label.height)
                    },
                    "_se",
                );
            }
        }
    }
}

/// Turns placeholder nodes into loop polylines on the restored self-loop edges.
pub fn position_self_edges(g: &mut LayoutGraph) {
    let placeholders: Vec<NodeIx> = g
        .nodes()
        .filter(|&v| g.node(v).dummy == Some(Dummy::SelfEdge))
        .collect();
    for dummy in placeholders {
        let node = g.node(dummy);
        let (Some(e), Some(label)) = (node.edge_obj, node.edge_label.as_deref()) else {
            continue;
        };
        let mut label: EdgeLabel = label.clone();
        let (x, y) = (node.x, node.y);
        let owner = g.source(e);
        let self_node = g.node(owner);

        let left = self_node.x + self_node.width / 2.0;
        let dx = x - left;
        let dy = self_node.height / 2.0;
        let cy = self_node.y;
        label.points = vec![
            Point {
                x: left + 2.0 * dx / 3.0,
                y: cy - dy,
            },
            Point {
                x: left + 5.0 * dx / 6.0,
                y: cy - dy,
            },
            Point { x: left + dx, y: cy },
            Point {
                x: left + 5.0 * dx / 6.0,
                y: cy + dy,
            },
            Point {
                x: left + 2.0 * dx / 3.0,
                y: cy + dy,
            },
        ];
        label.x = Some(x);
        label.y = Some(y);

        g.add_edge(owner, owner, label);
        g.remove_node(dummy);
    }
}
