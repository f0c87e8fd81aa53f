//! Left-to-right constraints between sibling subgraphs.
//!
//! Once a layer is sorted, every pair of sibling subgraphs that appear next to each other gets a
//! constraint edge. Later layers of the same sweep must keep that relative order, which keeps
//! each subgraph contiguous across ranks.

use super::layer_graph::LayerGraph;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use sirenia_graph::NodeIx;

/// Simple directed graph of `left -> right` constraints, edges in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ConstraintGraph {
    edges: Vec<(NodeIx, NodeIx)>,
    seen: HashSet<(NodeIx, NodeIx)>,
}

impl ConstraintGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, v: NodeIx, w: NodeIx) {
        if self.seen.insert((v, w)) {
            self.edges.push((v, w));
        }
    }

    pub fn has_edge(&self, v: NodeIx, w: NodeIx) -> bool {
        self.seen.contains(&(v, w))
    }

    pub fn edges(&self) -> &[(NodeIx, NodeIx)] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

pub fn add_subgraph_constraints(lg: &LayerGraph, cg: &mut ConstraintGraph, vs: &[NodeIx]) {
    let mut prev: HashMap<Option<NodeIx>, NodeIx> = HashMap::default();

    for &v in vs {
        let mut child = lg.parent(v);
        while let Some(c) = child {
            let parent = lg.parent(c);
            if let Some(prev_child) = prev.insert(parent, c) {
                if prev_child != c {
                    cg.add_edge(prev_child, c);
                    break;
                }
            }
            child = parent;
        }
    }
}
