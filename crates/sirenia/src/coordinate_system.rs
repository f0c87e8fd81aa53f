//! Coordinate system adjustment.
//!
//! Every phase works top-to-bottom. Horizontal layouts swap node and label extents before
//! placement; `undo` mirrors and transposes the finished coordinates.

use crate::model::{LayoutGraph, RankDir};
use sirenia_graph::{EdgeIx, NodeIx};

pub fn adjust(g: &mut LayoutGraph) {
    if g.graph().rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn live(g: &LayoutGraph) -> (Vec<NodeIx>, Vec<EdgeIx>) {
    (g.nodes().collect(), g.edges().collect())
}

fn swap_width_height(g: &mut LayoutGraph) {
    let (nodes, edges) = live(g);
    for v in nodes {
        let n = g.node_mut(v);
        (n.width, n.height) = (n.height, n.width);
        // Labels parked on nodes must follow the same transform as live edges.
        if let Some(label) = n.edge_label.as_deref_mut() {
            (label.width, label.height) = (label.height, label.width);
        }
        for se in &mut n.self_edges {
            (se.label.width, se.label.height) = (se.label.height, se.label.width);
        }
    }
    for e in edges {
        let label = g.edge_mut(e);
        (label.width, label.height) = (label.height, label.width);
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    let (nodes, edges) = live(g);
    for v in nodes {
        let n = g.node_mut(v);
        n.y = -n.y;
    }
    for e in edges {
        let label = g.edge_mut(e);
        for p in &mut label.points {
            p.y = -p.y;
        }
        if let Some(y) = label.y.as_mut() {
            *y = -*y;
        }
    }
}

fn swap_xy(g: &mut LayoutGraph) {
    let (nodes, edges) = live(g);
    for v in nodes {
        let n = g.node_mut(v);
        (n.x, n.y) = (n.y, n.x);
    }
    for e in edges {
        let label = g.edge_mut(e);
        for p in &mut label.points {
            (p.x, p.y) = (p.y, p.x);
        }
        if let (Some(x), Some(y)) = (label.x, label.y) {
            label.x = Some(y);
            label.y = Some(x);
        }
    }
}
