//! Per-rank view of the layout graph used while sorting one layer.
//!
//! A layer graph holds the nodes on one rank plus every subgraph spanning that rank, with the
//! subgraph nesting preserved under an implicit root. Edges towards the fixed neighbor layer are
//! aggregated per node pair, weights summed, in first-appearance order.

use crate::model::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;
use sirenia_graph::NodeIx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Sort against the rank above (downward sweep).
    InEdges,
    /// Sort against the rank below (upward sweep).
    OutEdges,
}

#[derive(Debug, Clone, Default)]
pub struct LayerGraph {
    pub rank: i32,
    /// Member nodes in graph insertion order.
    nodes: Vec<NodeIx>,
    /// Children per parent; `None` is the layer root.
    children: HashMap<Option<NodeIx>, Vec<NodeIx>>,
    parent: HashMap<NodeIx, Option<NodeIx>>,
    /// Fixed-layer neighbors of each node with aggregated weights.
    neighbors: HashMap<NodeIx, Vec<(NodeIx, i64)>>,
    /// Left and right border node of each subgraph on this rank.
    borders: HashMap<NodeIx, (NodeIx, NodeIx)>,
}

impl LayerGraph {
    pub fn children(&self, parent: Option<NodeIx>) -> &[NodeIx] {
        self.children
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_children(&self, v: NodeIx) -> bool {
        !self.children(Some(v)).is_empty()
    }

    /// Parent inside the layer graph; `None` is the layer root.
    pub fn parent(&self, v: NodeIx) -> Option<NodeIx> {
        self.parent.get(&v).copied().flatten()
    }

    pub fn neighbors(&self, v: NodeIx) -> &[(NodeIx, i64)] {
        self.neighbors.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn borders(&self, sg: Option<NodeIx>) -> Option<(NodeIx, NodeIx)> {
        sg.and_then(|sg| self.borders.get(&sg).copied())
    }

    pub fn contains(&self, v: NodeIx) -> bool {
        self.parent.contains_key(&v)
    }

    /// Every aggregated edge `(fixed, movable, weight)` of the layer.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIx, NodeIx, i64)> + '_ {
        self.nodes
            .iter()
            .flat_map(move |&v| self.neighbors(v).iter().map(move |&(u, w)| (u, v, w)))
    }
}

fn in_range(g: &LayoutGraph, v: NodeIx, rank: i32) -> bool {
    let node = g.node(v);
    node.rank == Some(rank)
        || matches!((node.min_rank, node.max_rank), (Some(min), Some(max)) if min <= rank && rank <= max)
}

pub fn build_layer_graph(g: &LayoutGraph, rank: i32, relationship: Relationship) -> LayerGraph {
    let mut lg = LayerGraph {
        rank,
        ..Default::default()
    };

    for v in g.nodes() {
        if !in_range(g, v, rank) {
            continue;
        }
        let parent = g.parent(v);
        lg.nodes.push(v);
        lg.parent.insert(v, parent);
        lg.children.entry(parent).or_default().push(v);

        let incident = match relationship {
            Relationship::InEdges => g.in_edges(v),
            Relationship::OutEdges => g.out_edges(v),
        };
        let mut nbrs: Vec<(NodeIx, i64)> = Vec::new();
        for &e in incident {
            let (src, dst) = g.endpoints(e);
            let u = if src == v { dst } else { src };
            let weight = g.edge(e).weight;
            match nbrs.iter_mut().find(|(n, _)| *n == u) {
                Some((_, w)) => *w += weight,
                None => nbrs.push((u, weight)),
            }
        }
        if !nbrs.is_empty() {
            lg.neighbors.insert(v, nbrs);
        }

        let node = g.node(v);
        if node.min_rank.is_some() && rank >= 0 {
            let at = |slots: &[Option<NodeIx>]| slots.get(rank as usize).copied().flatten();
            if let (Some(bl), Some(br)) = (at(&node.border_left), at(&node.border_right)) {
                lg.borders.insert(v, (bl, br));
            }
        }
    }
    lg
}

/// Layer graphs for every rank of a downward (`1..=max`) and upward (`max-1..=0`) sweep.
pub fn build_layer_graphs(
    g: &LayoutGraph,
    ranks: impl IntoIterator<Item = i32>,
    relationship: Relationship,
) -> Vec<LayerGraph> {
    ranks
        .into_iter()
        .map(|rank| build_layer_graph(g, rank, relationship))
        .collect()
}
