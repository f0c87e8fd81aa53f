//! Shared helpers over the layout arena.

use crate::model::{Dummy, LayoutGraph, NodeLabel, Point};
use sirenia_graph::NodeIx;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn of(node: &NodeLabel) -> Self {
        Self {
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
        }
    }
}

/// Adds a synthetic node with a fresh `<prefix><n>` id.
pub fn add_dummy_node(
    g: &mut LayoutGraph,
    dummy: Dummy,
    mut label: NodeLabel,
    prefix: &str,
) -> NodeIx {
    let id = loop {
        let n = g.graph().next_dummy;
        g.graph_mut().next_dummy += 1;
        let candidate = format!("{prefix}{n}");
        if !g.contains(&candidate) {
            break candidate;
        }
    };
    label.dummy = Some(dummy);
    g.add_node(id, label)
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    g.nodes().filter_map(|v| g.node(v).rank).max()
}

/// Ranked nodes grouped by rank and sorted by order. Ranks must be non-negative.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<NodeIx>> {
    let Some(max) = max_rank(g) else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<(usize, NodeIx)>> = vec![Vec::new(); (max.max(0) + 1) as usize];
    for v in g.nodes() {
        let node = g.node(v);
        let Some(rank) = node.rank else {
            continue;
        };
        if rank < 0 {
            continue;
        }
        layers[rank as usize].push((node.order.unwrap_or(usize::MAX), v));
    }
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|&(order, _)| order);
            layer.into_iter().map(|(_, v)| v).collect()
        })
        .collect()
}

/// Shifts every rank so the minimum becomes 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let Some(min) = g.nodes().filter_map(|v| g.node(v).rank).min() else {
        return;
    };
    let vs: Vec<NodeIx> = g.nodes().collect();
    for v in vs {
        if let Some(rank) = g.node_mut(v).rank.as_mut() {
            *rank -= min;
        }
    }
}

/// Removes empty ranks that are not on the `node_rank_factor` grid.
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let Some(offset) = g.nodes().filter_map(|v| g.node(v).rank).min() else {
        return;
    };
    let mut layers: Vec<Vec<NodeIx>> = Vec::new();
    for v in g.nodes() {
        let Some(rank) = g.node(v).rank else {
            continue;
        };
        let idx = (rank - offset) as usize;
        if layers.len() <= idx {
            layers.resize_with(idx + 1, Vec::new);
        }
        layers[idx].push(v);
    }

    let factor = g.graph().node_rank_factor;
    let mut delta = 0i32;
    for (i, vs) in layers.iter().enumerate() {
        let on_grid = factor.is_some_and(|f| f != 0 && (i as i32) % f == 0);
        if vs.is_empty() && !on_grid {
            delta -= 1;
        } else if delta != 0 {
            for &v in vs {
                if let Some(rank) = g.node_mut(v).rank.as_mut() {
                    *rank += delta;
                }
            }
        }
    }
}

/// Point where the segment from the center of `rect` towards `point` leaves the rectangle.
pub fn intersect_rect(rect: Rect, point: Point) -> Point {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;
    if dx == 0.0 && dy == 0.0 {
        return Point {
            x: rect.x,
            y: rect.y,
        };
    }

    let (sx, sy) = if dx == 0.0 || dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };
    Point {
        x: rect.x + sx,
        y: rect.y + sy,
    }
}

/// Whether `SIRENIA_TIMING` asks for per-phase timing.
pub(crate) fn timing_enabled() -> bool {
    std::env::var("SIRENIA_TIMING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_rect_clips_on_the_dominant_side() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 20.0,
            height: 10.0,
        };
        let p = intersect_rect(rect, Point { x: 0.0, y: 100.0 });
        assert_eq!(p, Point { x: 0.0, y: 5.0 });
        let p = intersect_rect(rect, Point { x: -100.0, y: 0.0 });
        assert_eq!(p, Point { x: -10.0, y: 0.0 });
        let p = intersect_rect(rect, Point { x: 0.0, y: 0.0 });
        assert_eq!(p, Point { x: 0.0, y: 0.0 });
        let empty = Rect {
            width: 0.0,
            height: 0.0,
            ..rect
        };
        let p = intersect_rect(empty, Point { x: 0.0, y: 30.0 });
        assert_eq!(p, Point { x: 0.0, y: 0.0 });
    }

    #[test]
    fn remove_empty_ranks_keeps_factor_grid() {
        let mut g = LayoutGraph::new();
        let a = g.add_node("a", NodeLabel::default());
        let b = g.add_node("b", NodeLabel::default());
        g.node_mut(a).rank = Some(0);
        g.node_mut(b).rank = Some(4);
        g.graph_mut().node_rank_factor = Some(4);
        remove_empty_ranks(&mut g);
        assert_eq!(g.node(b).rank, Some(4));

        g.graph_mut().node_rank_factor = Some(3);
        remove_empty_ranks(&mut g);
        // Ranks 1 and 2 are dropped, rank 3 is kept on the grid.
        assert_eq!(g.node(b).rank, Some(2));
    }
}
