//! Nesting graph construction for compound graphs.
//!
//! Every subgraph gets a top and a bottom border node. Nesting edges run from the top border to
//! each child (or the child's own top border) and from each child to the bottom border, so the
//! ranker keeps a subgraph's members strictly between its borders.
//!
//! The dagre engine scales every `minlen` by `2 * height + 1` (height = nesting depth) which
//! leaves room for nested borders on their own ranks; that factor is kept as
//! `node_rank_factor` so [`crate::util::remove_empty_ranks`] keeps the grid. The ELK engine uses
//! a factor of 1 and unit-length nesting edges.

use crate::model::{Dummy, EdgeLabel, LayoutGraph, NodeLabel};
use crate::util;
use sirenia_graph::{EdgeIx, NodeIx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingMode {
    Dagre,
    Elk,
}

struct Ctx {
    mode: NestingMode,
    weight: i64,
    height: i32,
    depths: Vec<i32>,
}

fn tree_depths(g: &LayoutGraph) -> Vec<i32> {
    let mut depths = vec![0i32; g.node_bound()];
    let mut stack: Vec<(NodeIx, i32)> = g.children(None).iter().map(|&v| (v, 1)).collect();
    while let Some((v, depth)) = stack.pop() {
        depths[v.index()] = depth;
        stack.extend(g.children(Some(v)).iter().map(|&c| (c, depth + 1)));
    }
    depths
}

fn add_border_node(g: &mut LayoutGraph, prefix: &str) -> NodeIx {
    util::add_dummy_node(g, Dummy::Border, NodeLabel::default(), prefix)
}

/// Returns `true` when the graph has at least one subgraph.
pub fn run(g: &mut LayoutGraph, mode: NestingMode) -> bool {
    let depths = tree_depths(g);
    let height = depths.iter().copied().max().unwrap_or(1).max(1) - 1;
    let node_sep = match mode {
        NestingMode::Dagre => 2 * height + 1,
        NestingMode::Elk => 1,
    };

    let edges: Vec<EdgeIx> = g.edges().collect();
    let mut sum_weights = 0i64;
    for &e in &edges {
        let label = g.edge_mut(e);
        label.minlen *= node_sep;
        sum_weights += label.weight;
    }
    g.graph_mut().node_rank_factor = Some(node_sep);

    if height == 0 {
        return false;
    }

    let ctx = Ctx {
        mode,
        weight: sum_weights + 1,
        height,
        depths,
    };
    let top_level: Vec<NodeIx> = g.children(None).to_vec();
    for v in top_level {
        if g.has_children(v) {
            add_borders(g, &ctx, v);
        }
    }
    true
}

/// Creates `v`'s borders before recursing, then links each child once its own borders exist.
fn add_borders(g: &mut LayoutGraph, ctx: &Ctx, v: NodeIx) {
    let children: Vec<NodeIx> = g.children(Some(v)).to_vec();
    let top = add_border_node(g, "_bt");
    let bottom = add_border_node(g, "_bb");
    g.set_parent(top, Some(v));
    g.set_parent(bottom, Some(v));
    {
        let label = g.node_mut(v);
        label.border_top = Some(top);
        label.border_bottom = Some(bottom);
    }

    for child in children {
        if g.has_children(child) {
            add_borders(g, ctx, child);
        }
        let child_label = g.node(child);
        let child_top = child_label.border_top.unwrap_or(child);
        let child_bottom = child_label.border_bottom.unwrap_or(child);
        let this_weight = if child_label.border_top.is_some() {
            ctx.weight
        } else {
            2 * ctx.weight
        };
        let minlen = match ctx.mode {
            NestingMode::Elk => 1,
            NestingMode::Dagre if child_top != child_bottom => 1,
            NestingMode::Dagre => ctx.height - ctx.depths[v.index()] + 1,
        };
        let nesting = EdgeLabel {
            weight: this_weight,
            minlen,
            nesting_edge: true,
            ..Default::default()
        };
        g.add_edge(top, child_top, nesting.clone());
        g.add_edge(child_bottom, bottom, nesting);
    }
}

/// Removes nesting edges once ranks are assigned.
pub fn cleanup(g: &mut LayoutGraph) {
    let nesting: Vec<EdgeIx> = g.edges().filter(|&e| g.edge(e).nesting_edge).collect();
    for e in nesting {
        g.remove_edge(e);
    }
}

/// Records the rank span of every subgraph from its top/bottom borders.
pub fn assign_rank_min_max(g: &mut LayoutGraph) {
    let mut max_rank = 0i32;
    let subgraphs: Vec<NodeIx> = g
        .nodes()
        .filter(|&v| g.node(v).border_top.is_some())
        .collect();
    for v in subgraphs {
        let label = g.node(v);
        let (Some(top), Some(bottom)) = (label.border_top, label.border_bottom) else {
            continue;
        };
        let (min, max) = (g.node(top).rank, g.node(bottom).rank);
        let label = g.node_mut(v);
        label.min_rank = min;
        label.max_rank = max;
        max_rank = max_rank.max(max.unwrap_or(0));
    }
    g.graph_mut().max_rank = max_rank;
}
