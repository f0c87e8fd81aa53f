//! Local refinement by adjacent swaps.
//!
//! Two neighbors in a layer trade places when that strictly lowers the crossings between their
//! edges and the neighbor layer(s). Only siblings (same parent, neither a border node) are ever
//! swapped, so subgraph runs stay contiguous.

use crate::model::{Dummy, LayoutGraph};
use sirenia_graph::NodeIx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Count against the rank above.
    Above,
    /// Count against the rank below.
    Below,
    Both,
}

fn swappable(g: &LayoutGraph, a: NodeIx, b: NodeIx) -> bool {
    let border = |v: NodeIx| g.node(v).dummy == Some(Dummy::Border);
    g.parent(a) == g.parent(b) && !border(a) && !border(b)
}

fn neighbor_orders(g: &LayoutGraph, v: NodeIx, above: bool) -> Vec<(usize, i64)> {
    let edges = if above { g.in_edges(v) } else { g.out_edges(v) };
    edges
        .iter()
        .filter_map(|&e| {
            let (src, dst) = g.endpoints(e);
            let u = if above { src } else { dst };
            g.node(u).order.map(|o| (o, g.edge(e).weight))
        })
        .collect()
}

/// Crossings among the edges of `a` and `b` when `a` sits left of `b`.
fn pair_crossings(g: &LayoutGraph, a: NodeIx, b: NodeIx, side: Side) -> i64 {
    let count = |above: bool| {
        let na = neighbor_orders(g, a, above);
        let nb = neighbor_orders(g, b, above);
        let mut c = 0i64;
        for &(oa, wa) in &na {
            for &(ob, wb) in &nb {
                if oa > ob {
                    c += wa * wb;
                }
            }
        }
        c
    };
    match side {
        Side::Above => count(true),
        Side::Below => count(false),
        Side::Both => count(true) + count(false),
    }
}

/// Repeats left-to-right swap passes over `layer` until none applies. Returns the number of
/// swaps and keeps `order` labels in sync with the layer.
pub fn switch_layer(g: &mut LayoutGraph, layer: &mut [NodeIx], side: Side) -> usize {
    let mut swaps = 0usize;
    loop {
        let mut improved = false;
        for i in 1..layer.len() {
            let (a, b) = (layer[i - 1], layer[i]);
            if !swappable(g, a, b) {
                continue;
            }
            if pair_crossings(g, b, a, side) < pair_crossings(g, a, b, side) {
                layer.swap(i - 1, i);
                g.node_mut(b).order = Some(i - 1);
                g.node_mut(a).order = Some(i);
                improved = true;
                swaps += 1;
            }
        }
        if !improved {
            return swaps;
        }
    }
}

/// Two-sided switching over every layer until a full round makes no swap.
pub fn transpose(g: &mut LayoutGraph, layering: &mut [Vec<NodeIx>]) -> usize {
    let mut swaps = 0usize;
    loop {
        let round: usize = layering
            .iter_mut()
            .map(|layer| switch_layer(g, layer, Side::Both))
            .sum();
        if round == 0 {
            return swaps;
        }
        swaps += round;
    }
}
