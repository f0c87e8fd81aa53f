//! Long-edge normalization.
//!
//! An edge spanning `k > 1` ranks is replaced by a chain of `k - 1` dummy nodes, one per
//! intermediate rank, so every remaining edge joins adjacent ranks. The dummy on the edge's
//! `label_rank` takes the label's extent. `undo` folds each chain back into the original edge's
//! polyline.

use crate::model::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, Point};
use crate::util;
use sirenia_graph::{EdgeIx, NodeIx};

pub fn run(g: &mut LayoutGraph) {
    g.graph_mut().dummy_chains.clear();
    let edges: Vec<EdgeIx> = g.edges().collect();
    for e in edges {
        normalize_edge(g, e);
    }
}

fn normalize_edge(g: &mut LayoutGraph, e: EdgeIx) {
    let (v, w) = g.endpoints(e);
    let (Some(v_rank), Some(w_rank)) = (g.node(v).rank, g.node(w).rank) else {
        return;
    };
    if w_rank <= v_rank + 1 {
        return;
    }

    g.remove_edge(e);
    let mut label = g.edge(e).clone();
    label.points.clear();
    let weight = label.weight;
    let model_order = label.model_order;
    let label_rank = label.label_rank;

    let mut prev = v;
    for (i, rank) in (v_rank + 1..w_rank).enumerate() {
        let mut attrs = NodeLabel {
            rank: Some(rank),
            edge_obj: Some(e),
            ..Default::default()
        };
        if i == 0 {
            attrs.edge_label = Some(Box::new(label.clone()));
        }
        let kind = if Some(rank) == label_rank {
            attrs.width = label.width;
            attrs.height = label.height;
            attrs.labelpos = label.labelpos;
            Dummy::EdgeLabel
        } else {
            Dummy::Edge
        };
        let dummy = util::add_dummy_node(g, kind, attrs, "_d");
        g.add_edge(prev, dummy, EdgeLabel::segment(weight, model_order));
        if i == 0 {
            g.graph_mut().dummy_chains.push(dummy);
        }
        prev = dummy;
    }
    g.add_edge(prev, w, EdgeLabel::segment(weight, model_order));
}

/// Restores every chained edge with its polyline and label position.
pub fn undo(g: &mut LayoutGraph) {
    let heads: Vec<NodeIx> = std::mem::take(&mut g.graph_mut().dummy_chains);
    for head in heads {
        if !g.is_live(head) {
            continue;
        }
        let node = g.node(head);
        let (Some(e), Some(label)) = (node.edge_obj, node.edge_label.as_deref()) else {
            continue;
        };
        let mut label = label.clone();
        let (v, w) = g.endpoints(e);

        let mut cur = head;
        while g.is_live(cur) && g.node(cur).is_dummy() {
            let node = g.node(cur);
            label.points.push(Point {
                x: node.x,
                y: node.y,
            });
            if node.dummy == Some(Dummy::EdgeLabel) {
                label.x = Some(node.x);
                label.y = Some(node.y);
                label.width = node.width;
                label.height = node.height;
            }
            let next = g.successors(cur).first().copied();
            g.remove_node(cur);
            match next {
                Some(n) => cur = n,
                None => break,
            }
        }
        g.add_edge(v, w, label);
    }
}
