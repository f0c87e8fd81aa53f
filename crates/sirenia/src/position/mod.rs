//! Coordinate assignment.
//!
//! `y` follows the layering: each rank is as tall as its tallest node and ranks are `ranksep`
//! apart. `x` comes from Brandes & Köpf (dagre) or its port-aware variant (ELK).

pub mod bk;
pub mod elk;

use crate::model::LayoutGraph;
use crate::options::{Engine, PlacementOptions};
use crate::trace::Trace;
use crate::util;

pub fn position(g: &mut LayoutGraph, engine: Engine, placement: &PlacementOptions, trace: &mut Trace) {
    position_y(g);
    let xs = match engine {
        Engine::Dagre => bk::position_x(g, placement.align, trace),
        Engine::Elk => elk::position_x(g, placement.align, trace),
    };
    for (v, x) in xs {
        g.node_mut(v).x = x;
    }
}

pub fn position_y(g: &mut LayoutGraph) {
    let layering = util::build_layer_matrix(g);
    let rank_sep = g.graph().ranksep;
    let mut prev_y = 0.0;
    for layer in layering {
        let max_height = layer
            .iter()
            .map(|&v| g.node(v).height)
            .fold(0.0_f64, f64::max);
        for &v in &layer {
            g.node_mut(v).y = prev_y + max_height / 2.0;
        }
        prev_y += max_height + rank_sep;
    }
}
