//! Port-aware Brandes & Köpf placement in the manner of ELK's `BKNodePlacer`.
//!
//! Edges attach at ports spread evenly along the node side that faces them. When two nodes are
//! aligned into a block, the lower one carries an inner shift so that the aligned edge runs
//! straight between its two ports. Of the four layouts, the narrowest one that keeps every
//! layer's left-to-right order wins, unless a fixed or balanced alignment is requested.

use super::bk::{
    self, Alignment, DIRECTIONS, adjust_layering, block_sizes, horizontal_compaction, is_right,
    is_up, layout_width,
};
use crate::model::LayoutGraph;
use crate::options::BkAlign;
use crate::trace::{Trace, TraceRecord};
use crate::util;
use sirenia_graph::{EdgeIx, NodeIx};

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Ports for incoming edges (top side in top-to-bottom layouts).
    North,
    /// Ports for outgoing edges.
    South,
}

/// Offset of edge `e`'s port from the center of `v`.
fn port_offset(g: &LayoutGraph, v: NodeIx, e: EdgeIx, side: Side) -> f64 {
    let mut edges: Vec<(usize, EdgeIx)> = match side {
        Side::North => g
            .in_edges(v)
            .iter()
            .map(|&f| (g.node(g.source(f)).order.unwrap_or(0), f))
            .collect(),
        Side::South => g
            .out_edges(v)
            .iter()
            .map(|&f| (g.node(g.target(f)).order.unwrap_or(0), f))
            .collect(),
    };
    edges.sort();
    let Some(k) = edges.iter().position(|&(_, f)| f == e) else {
        return 0.0;
    };
    let width = g.node(v).width;
    let n = edges.len() as f64;
    width * (k as f64 + 1.0) / (n + 1.0) - width / 2.0
}

/// Inner shift of every node relative to its block root, in the frame of `dir`.
fn inner_shifts(g: &LayoutGraph, adjusted: &[Vec<NodeIx>], alignment: &Alignment, dir: BkAlign) -> Vec<f64> {
    let sign = if is_right(dir) { -1.0 } else { 1.0 };
    let mut shift = vec![0.0_f64; g.node_bound()];
    for layer in adjusted {
        for &v in layer {
            let Some(w) = alignment.upper[v.index()] else {
                continue;
            };
            // `w` sits in the previous layer of the sweep.
            let (edge, w_side, v_side) = if is_up(dir) {
                (g.edge_between(w, v), Side::South, Side::North)
            } else {
                (g.edge_between(v, w), Side::North, Side::South)
            };
            let Some(e) = edge else {
                continue;
            };
            let delta = port_offset(g, w, e, w_side) - port_offset(g, v, e, v_side);
            shift[v.index()] = shift[w.index()] + sign * delta;
        }
    }
    shift
}

/// Whether `xs` keeps every layer's order with nodes not overlapping.
fn preserves_order(g: &LayoutGraph, layering: &[Vec<NodeIx>], xs: &[f64]) -> bool {
    layering.iter().all(|layer| {
        layer.windows(2).all(|pair| {
            let (u, v) = (pair[0], pair[1]);
            let right_of_u = xs[u.index()] + g.node(u).width / 2.0;
            let left_of_v = xs[v.index()] - g.node(v).width / 2.0;
            right_of_u <= left_of_v + EPSILON
        })
    })
}

pub fn position_x(g: &LayoutGraph, align: Option<BkAlign>, trace: &mut Trace) -> Vec<(NodeIx, f64)> {
    let layering = util::build_layer_matrix(g);
    let nodes: Vec<NodeIx> = layering.iter().flatten().copied().collect();
    if nodes.is_empty() {
        return Vec::new();
    }
    let mut conflicts = bk::find_type1_conflicts(g, &layering);
    conflicts.extend(bk::find_type2_conflicts(g, &layering));

    let mut xss: Vec<(BkAlign, Vec<f64>)> = Vec::with_capacity(DIRECTIONS.len());
    for dir in DIRECTIONS {
        let adjusted = adjust_layering(&layering, dir);
        let alignment = bk::vertical_alignment(g, &adjusted, &conflicts, |v| {
            if is_up(dir) {
                g.predecessors(v)
            } else {
                g.successors(v)
            }
        });
        trace.push(|| TraceRecord::BkBlocks {
            align: dir.key(),
            sizes: block_sizes(&adjusted, &alignment),
        });
        let shift = inner_shifts(g, &adjusted, &alignment, dir);
        let mut xs = horizontal_compaction(g, &adjusted, &alignment, is_right(dir), Some(&shift));
        if is_right(dir) {
            for &v in &nodes {
                xs[v.index()] = -xs[v.index()];
            }
        }
        trace.push(|| TraceRecord::BkWidth {
            align: dir.key(),
            width: layout_width(g, &nodes, &xs),
        });
        xss.push((dir, xs));
    }

    match align {
        Some(BkAlign::Balanced) => {
            let smallest = bk::find_smallest_width_alignment(g, &nodes, &xss);
            bk::align_coordinates(&nodes, &mut xss, smallest);
            let n = xss.len() as f64;
            nodes
                .iter()
                .map(|&v| {
                    let sum: f64 = xss.iter().map(|(_, xs)| xs[v.index()]).sum();
                    (v, sum / n)
                })
                .collect()
        }
        Some(fixed) => {
            let xs = xss
                .iter()
                .find(|(d, _)| *d == fixed)
                .map(|(_, xs)| xs.as_slice())
                .unwrap_or(&[]);
            nodes
                .iter()
                .map(|&v| (v, xs.get(v.index()).copied().unwrap_or(0.0)))
                .collect()
        }
        None => {
            let mut chosen: Option<(usize, f64)> = None;
            for (i, (_, xs)) in xss.iter().enumerate() {
                if !preserves_order(g, &layering, xs) {
                    continue;
                }
                let w = layout_width(g, &nodes, xs);
                if chosen.is_none_or(|(_, best)| w < best) {
                    chosen = Some((i, w));
                }
            }
            let pick = chosen
                .map(|(i, _)| i)
                .unwrap_or_else(|| bk::find_smallest_width_alignment(g, &nodes, &xss));
            tracing::debug!(layout = xss[pick].0.key(), valid = chosen.is_some(), "elk placement");
            let xs = &xss[pick].1;
            nodes.iter().map(|&v| (v, xs[v.index()])).collect()
        }
    }
}
