//! Layered layout pipeline.
//!
//! One call builds the arena, runs every phase in order and collects the result. Both engines
//! share the pipeline; they differ in how label ranks are reserved, how subgraphs are nested,
//! in the rank balancing step and in horizontal placement.

use crate::compound;
use crate::error::Result;
use crate::input::{DiagramInput, build_graph};
use crate::model::{LabelPos, LayoutGraph, Point};
use crate::nesting_graph::{self, NestingMode};
use crate::options::{Engine, LayoutOptions};
use crate::output::LayoutResult;
use crate::trace::{Phase, Trace, TraceRecord};
use crate::util::{self, Rect};
use crate::{
    acyclic, add_border_segments, coordinate_system, edge_labels, normalize, order,
    parent_dummy_chains, position, rank, self_edges,
};
use sirenia_graph::{EdgeIx, NodeIx};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
struct Timings {
    total: Duration,
    preprocess: Duration,
    self_edges_remove: Duration,
    acyclic: Duration,
    rank: Duration,
    rank_cleanup: Duration,
    normalize: Duration,
    compound_border: Duration,
    order: Duration,
    position: Duration,
    finalize: Duration,
}

/// Runs `$body` inside the `sirenia.<field>` span and records its duration when timing is on.
macro_rules! step {
    ($timing:expr, $timings:ident . $field:ident, $body:expr) => {{
        let _span = tracing::debug_span!(concat!("sirenia.", stringify!($field))).entered();
        let start = $timing.then(std::time::Instant::now);
        let out = $body;
        if let Some(s) = start {
            $timings.$field = s.elapsed();
        }
        out
    }};
}

/// Lays out `input`.
///
/// Invalid input (duplicate ids, dangling references, parent cycles) is rejected up front; an
/// input without nodes yields an empty result.
pub fn layout(input: &DiagramInput, opts: &LayoutOptions) -> Result<LayoutResult> {
    let mut g = build_graph(input, opts)?;
    if g.node_count() == 0 {
        return Ok(LayoutResult::default());
    }
    let mut trace = Trace::new(opts.trace);
    run(&mut g, opts, &mut trace);
    Ok(LayoutResult::collect(&g, trace.into_records()))
}

/// Runs every phase on a built graph.
pub fn run(g: &mut LayoutGraph, opts: &LayoutOptions, trace: &mut Trace) {
    let timing = util::timing_enabled();
    let total_start = timing.then(std::time::Instant::now);
    let mut timings = Timings::default();
    trace.enter(Phase::Built);

    let cluster_edges = step!(timing, timings.preprocess, {
        let stashed = compound::stash_cluster_edges(g);
        match opts.engine {
            Engine::Dagre => edge_labels::make_space_for_edge_labels(g),
            Engine::Elk => edge_labels::stretch_labelled_edges(g),
        }
        stashed
    });

    step!(timing, timings.self_edges_remove, {
        let removed = self_edges::remove_self_edges(g);
        trace_self_loops(g, trace, &removed);
    });

    step!(timing, timings.acyclic, {
        acyclic::run(g, opts.acyclicer);
        trace.enter(Phase::CycleBroken);
        trace_edges(g, trace, &cluster_edges);
    });

    let nesting = match opts.engine {
        Engine::Dagre => NestingMode::Dagre,
        Engine::Elk => NestingMode::Elk,
    };
    step!(timing, timings.rank, {
        nesting_graph::run(g, nesting);
        rank::rank(g, opts.ranker, opts.engine);
    });

    step!(timing, timings.rank_cleanup, {
        edge_labels::inject_edge_label_proxies(g);
        util::remove_empty_ranks(g);
        nesting_graph::cleanup(g);
        util::normalize_ranks(g);
        nesting_graph::assign_rank_min_max(g);
        edge_labels::remove_edge_label_proxies(g);
    });
    trace.enter(Phase::Ranked);
    trace_ranks(g, trace);

    step!(timing, timings.normalize, normalize::run(g));
    step!(timing, timings.compound_border, {
        parent_dummy_chains::parent_dummy_chains(g);
        add_border_segments::add_border_segments(g);
    });
    trace.enter(Phase::Normalized);

    let stats = step!(timing, timings.order, order::order(g, &opts.order, trace));
    trace.enter(Phase::Ordered);

    step!(timing, timings.position, {
        self_edges::insert_self_edges(g);
        coordinate_system::adjust(g);
        position::position(g, opts.engine, &opts.placement, trace);
        self_edges::position_self_edges(g);
        compound::remove_border_nodes(g);
    });
    trace.enter(Phase::Placed);

    step!(timing, timings.finalize, {
        normalize::undo(g);
        edge_labels::fixup_edge_label_coords(g);
        coordinate_system::undo(g);
        translate_graph(g);
        assign_node_intersects(g);
        compound::restore_cluster_edges(g, cluster_edges);
        acyclic::undo(g);
    });
    trace.enter(Phase::Finalized);
    trace_positions(g, trace);

    if let Some(s) = total_start {
        timings.total = s.elapsed();
        tracing::info!(
            nodes = g.node_count(),
            edges = g.edge_count(),
            crossings = stats.crossings,
            total = ?timings.total,
            preprocess = ?timings.preprocess,
            self_edges_remove = ?timings.self_edges_remove,
            acyclic = ?timings.acyclic,
            rank = ?timings.rank,
            rank_cleanup = ?timings.rank_cleanup,
            normalize = ?timings.normalize,
            compound_border = ?timings.compound_border,
            order = ?timings.order,
            position = ?timings.position,
            finalize = ?timings.finalize,
            "sirenia timing"
        );
    }
}

/// Shifts the drawing so its bounding box starts at `(marginx, marginy)` and records its size.
///
/// The box covers node boxes and edge label boxes only; polyline points are moved along but
/// never widen it.
fn translate_graph(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut extend = |x: f64, y: f64, w: f64, h: f64| {
        min_x = min_x.min(x - w / 2.0);
        max_x = max_x.max(x + w / 2.0);
        min_y = min_y.min(y - h / 2.0);
        max_y = max_y.max(y + h / 2.0);
    };
    for v in g.nodes() {
        let n = g.node(v);
        extend(n.x, n.y, n.width, n.height);
    }
    for e in g.edges() {
        let label = g.edge(e);
        if let (Some(x), Some(y)) = (label.x, label.y) {
            extend(x, y, label.width, label.height);
        }
    }
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }

    let (marginx, marginy) = (g.graph().marginx, g.graph().marginy);
    let dx = marginx - min_x;
    let dy = marginy - min_y;
    let nodes: Vec<NodeIx> = g.nodes().collect();
    for v in nodes {
        let n = g.node_mut(v);
        n.x += dx;
        n.y += dy;
    }
    let edges: Vec<EdgeIx> = g.edges().collect();
    for e in edges {
        let label = g.edge_mut(e);
        for p in &mut label.points {
            p.x += dx;
            p.y += dy;
        }
        if let Some(x) = label.x.as_mut() {
            *x += dx;
        }
        if let Some(y) = label.y.as_mut() {
            *y += dy;
        }
    }

    let graph = g.graph_mut();
    graph.width = max_x - min_x + 2.0 * marginx;
    graph.height = max_y - min_y + 2.0 * marginy;
}

/// Clips both ends of every polyline to the endpoint boxes.
fn assign_node_intersects(g: &mut LayoutGraph) {
    let edges: Vec<EdgeIx> = g.edges().collect();
    for e in edges {
        let (v, w) = g.endpoints(e);
        let (rv, rw) = (Rect::of(g.node(v)), Rect::of(g.node(w)));
        let label = g.edge_mut(e);
        let (first, last) = match (label.points.first(), label.points.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (Point { x: rw.x, y: rw.y }, Point { x: rv.x, y: rv.y }),
        };
        let start = util::intersect_rect(rv, first);
        let end = util::intersect_rect(rw, last);
        label.points.insert(0, start);
        label.points.push(end);

        if label.has_label() && label.x.is_none() {
            let Some(mid) = label.points.get(label.points.len() / 2).copied() else {
                continue;
            };
            let x = match label.labelpos {
                LabelPos::C => mid.x,
                LabelPos::L => mid.x - label.labeloffset - label.width / 2.0,
                LabelPos::R => mid.x + label.labeloffset + label.width / 2.0,
            };
            label.x = Some(x);
            label.y = Some(mid.y);
        }
    }
}

fn trace_self_loops(g: &LayoutGraph, trace: &mut Trace, removed: &[(EdgeIx, NodeIx)]) {
    if !trace.is_enabled() {
        return;
    }
    let mut loops: Vec<(usize, String)> = removed
        .iter()
        .filter_map(|&(e, v)| {
            let se = g.node(v).self_edges.iter().find(|se| se.edge == e)?;
            Some((se.label.model_order?, g.node_id(v).to_string()))
        })
        .collect();
    loops.sort();
    for (index, node) in loops {
        trace.push(|| TraceRecord::SelfLoop { index, node });
    }
}

/// One record per input edge other than self-loops, in declared orientation. Stashed cluster
/// edges are listed too; they are never reversed.
fn trace_edges(g: &LayoutGraph, trace: &mut Trace, cluster_edges: &[compound::ClusterEdge]) {
    if !trace.is_enabled() {
        return;
    }
    let mut edges: Vec<(usize, NodeIx, NodeIx, bool)> = g
        .edges()
        .filter_map(|e| {
            let label = g.edge(e);
            let (v, w) = g.endpoints(e);
            let index = label.model_order?;
            Some(if label.reversed {
                (index, w, v, true)
            } else {
                (index, v, w, false)
            })
        })
        .chain(
            cluster_edges
                .iter()
                .filter_map(|c| Some((c.label.model_order?, c.v, c.w, false))),
        )
        .collect();
    edges.sort();
    for (index, v, w, reversed) in edges {
        trace.push(|| TraceRecord::Edge {
            index,
            source: g.node_id(v).to_string(),
            target: g.node_id(w).to_string(),
            reversed,
        });
    }
}

fn declared_nodes(g: &LayoutGraph) -> Vec<NodeIx> {
    let mut vs: Vec<(usize, NodeIx)> = g
        .nodes()
        .filter_map(|v| g.node(v).model_order.map(|i| (i, v)))
        .collect();
    vs.sort();
    vs.into_iter().map(|(_, v)| v).collect()
}

fn trace_ranks(g: &LayoutGraph, trace: &mut Trace) {
    if !trace.is_enabled() {
        return;
    }
    for v in declared_nodes(g) {
        let Some(rank) = g.node(v).rank else {
            continue;
        };
        trace.push(|| TraceRecord::Rank {
            node: g.node_id(v).to_string(),
            rank,
        });
    }
}

fn trace_positions(g: &LayoutGraph, trace: &mut Trace) {
    if !trace.is_enabled() {
        return;
    }
    for v in declared_nodes(g) {
        let n = g.node(v);
        trace.push(|| TraceRecord::Pos {
            node: g.node_id(v).to_string(),
            x: n.x,
            y: n.y,
        });
    }
}
