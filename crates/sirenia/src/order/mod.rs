//! Node ordering / crossing minimization.
//!
//! Layer-by-layer sweeps alternate between sorting against the rank above (down) and the rank
//! below (up), with a period-4 right-bias schedule. Each pass produces a candidate layering;
//! the lowest-scoring candidate of all trials is applied to the graph.

pub mod constraints;
pub mod cross_count;
pub mod greedy_switch;
pub mod init_order;
pub mod kernel;
pub mod layer_graph;
pub mod resolve_conflicts;
pub mod rng;
pub mod sort;
pub mod sort_subgraph;

use crate::model::LayoutGraph;
use crate::options::{Continuation, OrderOptions, Refinement};
use crate::trace::{Trace, TraceRecord};
use crate::util;
use constraints::{ConstraintGraph, add_subgraph_constraints};
use greedy_switch::Side;
use layer_graph::{LayerGraph, Relationship, build_layer_graphs};
use rng::XorShift64Star;
use sirenia_graph::NodeIx;

pub use cross_count::{cross_count, model_order_inversions};
pub use init_order::init_order;

/// Outcome of [`order`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderStats {
    pub crossings: u64,
    pub inversions: u64,
    pub score: f64,
    /// Crossings of the initial DFS layering.
    pub initial_crossings: u64,
    /// Trial that produced the applied layering.
    pub trial: usize,
    /// Sweep passes run across all trials.
    pub passes: usize,
}

#[derive(Debug, Clone)]
struct Candidate {
    layering: Vec<Vec<NodeIx>>,
    crossings: u64,
    inversions: u64,
    score: f64,
    trial: usize,
}

impl Candidate {
    fn evaluate(g: &LayoutGraph, layering: Vec<Vec<NodeIx>>, influence: f64, trial: usize) -> Self {
        let crossings = cross_count(g, &layering);
        let inversions = if influence != 0.0 {
            model_order_inversions(g, &layering)
        } else {
            0
        };
        Self {
            layering,
            crossings,
            inversions,
            score: crossings as f64 + influence * inversions as f64,
            trial,
        }
    }
}

struct Sweeps {
    down: Vec<LayerGraph>,
    up: Vec<LayerGraph>,
}

/// Assigns `order` to every ranked node.
pub fn order(g: &mut LayoutGraph, opts: &OrderOptions, trace: &mut Trace) -> OrderStats {
    let Some(max_rank) = util::max_rank(g) else {
        return OrderStats::default();
    };
    let sweeps = Sweeps {
        down: build_layer_graphs(g, 1..=max_rank, Relationship::InEdges),
        up: build_layer_graphs(g, (0..max_rank).rev(), Relationship::OutEdges),
    };
    let compound = g.nodes().any(|v| g.has_children(v));

    let initial = init_order(g);
    trace_layers(g, trace, "init", &initial);
    let influence = opts.model_order_influence;
    let initial_crossings = cross_count(g, &initial);

    let mut best: Option<Candidate> = None;
    let mut passes = 0usize;
    for trial in 0..opts.trials.max(1) {
        let mut start = initial.clone();
        if trial > 0 {
            let mut rng = XorShift64Star::new(trial as u64);
            for layer in &mut start {
                rng.shuffle(layer);
            }
        }
        assign_order(g, &start);
        let baseline = Candidate::evaluate(g, start, influence, trial);

        let (mut candidate, n) = run_trial(g, &sweeps, opts, trial, trace);
        passes += n;
        // The starting layering is kept when no pass beats it. Compound graphs are exempt: only
        // sorted layerings keep subgraphs contiguous.
        if trial == 0 && !compound && candidate.as_ref().is_none_or(|c| baseline.score < c.score)
        {
            candidate = Some(baseline);
        }
        let Some(candidate) = candidate else {
            continue;
        };
        if best.as_ref().is_none_or(|b| candidate.score < b.score) {
            best = Some(candidate);
        }
    }

    let Some(best) = best else {
        assign_order(g, &initial);
        return OrderStats {
            initial_crossings,
            crossings: initial_crossings,
            score: initial_crossings as f64,
            ..OrderStats::default()
        };
    };
    assign_order(g, &best.layering);
    trace_layers(g, trace, "final", &best.layering);
    for (rank, layer) in best.layering.iter().enumerate() {
        for (i, &v) in layer.iter().enumerate() {
            trace.push(|| TraceRecord::Order {
                node: g.node_id(v).to_string(),
                rank: rank as i32,
                order: i,
            });
        }
    }
    tracing::debug!(
        crossings = best.crossings,
        inversions = best.inversions,
        trial = best.trial,
        passes,
        "order selected"
    );

    OrderStats {
        crossings: best.crossings,
        inversions: best.inversions,
        score: best.score,
        initial_crossings,
        trial: best.trial,
        passes,
    }
}

fn run_trial(
    g: &mut LayoutGraph,
    sweeps: &Sweeps,
    opts: &OrderOptions,
    trial: usize,
    trace: &mut Trace,
) -> (Option<Candidate>, usize) {
    let max_passes = opts.max_passes.or(match opts.continuation {
        Continuation::Exhaustive => Some(OrderOptions::DEFAULT_EXHAUSTIVE_PASSES),
        _ => None,
    });

    let mut best: Option<Candidate> = None;
    let mut pass = 0usize;
    let mut last_best = 0usize;
    loop {
        if max_passes.is_some_and(|m| pass >= m) {
            break;
        }
        let down = pass % 2 == 1;
        let bias_right = pass % 4 >= 2;
        let lgs = if down { &sweeps.down } else { &sweeps.up };
        sweep(g, lgs, opts, down, bias_right);
        if opts.refinement == Refinement::Transpose {
            let mut layering = util::build_layer_matrix(g);
            greedy_switch::transpose(g, &mut layering);
        }

        let candidate =
            Candidate::evaluate(g, util::build_layer_matrix(g), opts.model_order_influence, trial);
        let crossings = candidate.crossings;
        let improved = best.as_ref().is_none_or(|b| candidate.score < b.score);
        if improved {
            last_best = 0;
            best = Some(candidate);
        } else if best.as_ref().is_some_and(|b| candidate.score == b.score) {
            best = Some(candidate);
        }
        let best_crossings = best.as_ref().map_or(crossings, |b| b.crossings);
        trace.push(|| TraceRecord::Sweep {
            trial,
            pass,
            down,
            bias_right,
            crossings,
            best: best_crossings,
        });

        pass += 1;
        last_best += 1;
        let stop = match opts.continuation {
            Continuation::Lookback { window } => last_best >= window.max(1),
            Continuation::Exhaustive => false,
            Continuation::FirstStall => !improved,
        };
        if stop {
            break;
        }
    }
    (best, pass)
}

fn sweep(g: &mut LayoutGraph, lgs: &[LayerGraph], opts: &OrderOptions, down: bool, bias_right: bool) {
    let mut cg = ConstraintGraph::new();
    for lg in lgs {
        let sorted = sort_subgraph::sort_subgraph(g, lg, None, &cg, opts.kernel, bias_right);
        let mut layer = sorted.vs;
        for (i, &v) in layer.iter().enumerate() {
            g.node_mut(v).order = Some(i);
        }
        let side = match opts.refinement {
            Refinement::GreedySwitch if down => Some(Side::Above),
            Refinement::GreedySwitch => Some(Side::Below),
            Refinement::GreedySwitchTwoSided => Some(Side::Both),
            Refinement::None | Refinement::Transpose => None,
        };
        if let Some(side) = side {
            greedy_switch::switch_layer(g, &mut layer, side);
        }
        add_subgraph_constraints(lg, &mut cg, &layer);
    }
}

pub fn assign_order(g: &mut LayoutGraph, layering: &[Vec<NodeIx>]) {
    for layer in layering {
        for (i, &v) in layer.iter().enumerate() {
            g.node_mut(v).order = Some(i);
        }
    }
}

fn trace_layers(g: &LayoutGraph, trace: &mut Trace, stage: &'static str, layering: &[Vec<NodeIx>]) {
    for (rank, layer) in layering.iter().enumerate() {
        trace.push(|| TraceRecord::Layer {
            stage,
            rank,
            nodes: layer.iter().map(|&v| g.node_id(v).to_string()).collect(),
        });
    }
}
