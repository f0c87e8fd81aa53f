//! Deterministic layered graph layout.
//!
//! Two engines share one pipeline: a dagre-parity engine and an ELK-style engine with
//! port-aware placement. Call [`layout()`] with a [`DiagramInput`] and [`LayoutOptions`].
//!
//! ```no_run
//! use sirenia::{DiagramInput, LayoutOptions};
//!
//! let input = DiagramInput::new()
//!     .node("a", 40.0, 20.0)
//!     .node("b", 40.0, 20.0)
//!     .edge("a", "b");
//! let result = sirenia::layout(&input, &LayoutOptions::default())?;
//! assert_eq!(result.nodes.len(), 2);
//! # Ok::<(), sirenia::Error>(())
//! ```

#![forbid(unsafe_code)]

pub use sirenia_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod acyclic;
pub mod add_border_segments;
pub mod compound;
pub mod coordinate_system;
pub mod edge_labels;
pub mod error;
pub mod greedy_fas;
pub mod input;
pub mod layout;
pub mod model;
pub mod nesting_graph;
pub mod normalize;
pub mod options;
pub mod order;
pub mod output;
pub mod parent_dummy_chains;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod trace;
pub mod util;

pub use error::{Error, Result};
pub use input::{DiagramInput, InputEdge, InputLabel, InputNode, build_graph};
pub use layout::layout;
pub use model::{Dummy, EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel, Point, RankDir};
pub use options::{
    Acyclicer, BkAlign, Continuation, Engine, LayoutOptions, OrderOptions, PlacementOptions,
    Ranker, Refinement, Spacing, SweepKernel,
};
pub use output::{EdgeLayout, LabelLayout, LayoutResult, NodeLayout, SubgraphLayout};
pub use trace::{Phase, Trace, TraceRecord};
