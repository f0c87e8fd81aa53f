//! Arena-backed compound multigraph used by `sirenia`.
//!
//! Nodes and edges live in flat vectors addressed by [`NodeIx`] / [`EdgeIx`] handles. Removal
//! tombstones a slot instead of shifting, so handles stay valid for the lifetime of the graph,
//! and every iteration API walks slots in insertion order.

#![forbid(unsafe_code)]

pub mod graph;

pub use graph::{EdgeIx, Graph, NodeIx, alg};
