//! Left/right border segments for subgraphs.
//!
//! Each subgraph gets one left and one right border node on every rank it spans, chained by
//! unit-weight edges. The orderer pins them to the ends of the subgraph's run in each layer and
//! placement turns them into the subgraph's rectangle.

use crate::model::{BorderType, Dummy, EdgeLabel, LayoutGraph, NodeLabel};
use crate::util;
use sirenia_graph::NodeIx;

pub fn add_border_segments(g: &mut LayoutGraph) {
    fn dfs(g: &mut LayoutGraph, v: NodeIx) {
        let children: Vec<NodeIx> = g.children(Some(v)).to_vec();
        for c in children {
            dfs(g, c);
        }
        let node = g.node(v);
        let (Some(min_rank), Some(max_rank)) = (node.min_rank, node.max_rank) else {
            return;
        };
        let len = (max_rank.max(0) + 1) as usize;
        {
            let node = g.node_mut(v);
            node.border_left = vec![None; len];
            node.border_right = vec![None; len];
        }
        for rank in min_rank..=max_rank {
            add_border_node(g, BorderType::Left, "_bl", v, rank);
            add_border_node(g, BorderType::Right, "_br", v, rank);
        }
    }

    let top: Vec<NodeIx> = g.children(None).to_vec();
    for v in top {
        dfs(g, v);
    }
}

fn add_border_node(g: &mut LayoutGraph, side: BorderType, prefix: &str, sg: NodeIx, rank: i32) {
    if rank < 0 {
        return;
    }
    let r = rank as usize;
    let prev = r.checked_sub(1).and_then(|p| {
        let node = g.node(sg);
        let slots = match side {
            BorderType::Left => &node.border_left,
            BorderType::Right => &node.border_right,
        };
        slots.get(p).copied().flatten()
    });

    let curr = util::add_dummy_node(
        g,
        Dummy::Border,
        NodeLabel {
            rank: Some(rank),
            border_type: Some(side),
            ..Default::default()
        },
        prefix,
    );
    {
        let node = g.node_mut(sg);
        let slots = match side {
            BorderType::Left => &mut node.border_left,
            BorderType::Right => &mut node.border_right,
        };
        if let Some(slot) = slots.get_mut(r) {
            *slot = Some(curr);
        }
    }
    g.set_parent(curr, Some(sg));
    if let Some(prev) = prev {
        g.add_edge(prev, curr, EdgeLabel::segment(1, None));
    }
}
