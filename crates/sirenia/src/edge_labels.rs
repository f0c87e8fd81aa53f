//! Rank space for edge labels.
//!
//! Labelled edges get a chain node at a midpoint rank that carries the label box. The dagre
//! engine doubles every `minlen` and halves `ranksep` so that midpoint always exists; the ELK
//! engine only stretches labelled edges to span at least two ranks.

use crate::model::{Dummy, LabelPos, LayoutGraph, NodeLabel};
use crate::util;
use sirenia_graph::{EdgeIx, NodeIx};

pub fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    g.graph_mut().ranksep /= 2.0;
    let horizontal = g.graph().rankdir.is_horizontal();
    let edges: Vec<EdgeIx> = g.edges().collect();
    for e in edges {
        let label = g.edge_mut(e);
        label.minlen *= 2;
        if label.labelpos != LabelPos::C {
            if horizontal {
                label.height += label.labeloffset;
            } else {
                label.width += label.labeloffset;
            }
        }
    }
}

/// ELK-style label ranks: only labelled edges are stretched.
pub fn stretch_labelled_edges(g: &mut LayoutGraph) {
    let horizontal = g.graph().rankdir.is_horizontal();
    let edges: Vec<EdgeIx> = g.edges().collect();
    for e in edges {
        let label = g.edge_mut(e);
        if !label.has_label() {
            continue;
        }
        label.minlen = label.minlen.max(2);
        if label.labelpos != LabelPos::C {
            if horizontal {
                label.height += label.labeloffset;
            } else {
                label.width += label.labeloffset;
            }
        }
    }
}

/// Adds a proxy node at the midpoint rank of each labelled edge.
pub fn inject_edge_label_proxies(g: &mut LayoutGraph) {
    let edges: Vec<EdgeIx> = g.edges().filter(|&e| g.edge(e).has_label()).collect();
    for e in edges {
        let (v, w) = g.endpoints(e);
        let (Some(v_rank), Some(w_rank)) = (g.node(v).rank, g.node(w).rank) else {
            continue;
        };
        util::add_dummy_node(
            g,
            Dummy::EdgeProxy,
            NodeLabel {
                rank: Some((w_rank - v_rank) / 2 + v_rank),
                edge_obj: Some(e),
                ..Default::default()
            },
            "_ep",
        );
    }
}

/// Records each proxy's (possibly compacted) rank as its edge's `label_rank` and drops it.
pub fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    let proxies: Vec<NodeIx> = g
        .nodes()
        .filter(|&v| g.node(v).dummy == Some(Dummy::EdgeProxy))
        .collect();
    for v in proxies {
        let node = g.node(v);
        if let Some(e) = node.edge_obj {
            let rank = node.rank;
            g.edge_mut(e).label_rank = rank;
        }
        g.remove_node(v);
    }
}

/// Moves side labels off the edge line and removes the offset added for them.
pub fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    let edges: Vec<EdgeIx> = g.edges().collect();
    for e in edges {
        let label = g.edge_mut(e);
        let Some(x) = label.x else {
            continue;
        };
        if matches!(label.labelpos, LabelPos::L | LabelPos::R) {
            label.width -= label.labeloffset;
        }
        match label.labelpos {
            LabelPos::L => label.x = Some(x - label.width / 2.0 - label.labeloffset),
            LabelPos::R => label.x = Some(x + label.width / 2.0 + label.labeloffset),
            LabelPos::C => {}
        }
    }
}
