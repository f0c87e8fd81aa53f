//! Layout results handed back to renderers.
//!
//! Coordinates are node centers, in the final (translated, direction-adjusted) frame.

use crate::model::{LayoutGraph, Point};
use crate::trace::TraceRecord;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutResult {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub subgraphs: Vec<SubgraphLayout>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rank: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    /// Position of the edge in the input.
    pub index: usize,
    pub source: String,
    pub target: String,
    pub points: Vec<Point>,
    /// Whether cycle breaking laid this edge out against its declared direction.
    pub reversed: bool,
    pub label: Option<LabelLayout>,
    pub label_rank: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgraphLayout {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutResult {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn subgraph(&self, id: &str) -> Option<&SubgraphLayout> {
        self.subgraphs.iter().find(|s| s.id == id)
    }

    /// The rendered trace, one record per line.
    pub fn trace_text(&self) -> String {
        crate::trace::render(&self.trace)
    }

    /// Collects declared nodes and edges of a finished layout graph in input order.
    pub(crate) fn collect(g: &LayoutGraph, trace: Vec<TraceRecord>) -> Self {
        let mut declared: Vec<(usize, sirenia_graph::NodeIx)> = g
            .nodes()
            .filter_map(|v| g.node(v).model_order.map(|i| (i, v)))
            .collect();
        declared.sort_unstable_by_key(|&(i, _)| i);

        let mut nodes = Vec::new();
        let mut subgraphs = Vec::new();
        for (_, v) in declared {
            let n = g.node(v);
            let id = g.node_id(v).to_string();
            if g.has_children(v) {
                subgraphs.push(SubgraphLayout {
                    id,
                    x: n.x,
                    y: n.y,
                    width: n.width,
                    height: n.height,
                });
            } else {
                nodes.push(NodeLayout {
                    id,
                    x: n.x,
                    y: n.y,
                    width: n.width,
                    height: n.height,
                    rank: n.rank.unwrap_or(0),
                });
            }
        }

        let mut edges: Vec<EdgeLayout> = g
            .edges()
            .filter_map(|e| {
                let label = g.edge(e);
                let index = label.model_order?;
                let (v, w) = g.endpoints(e);
                let label_box = match (label.x, label.y) {
                    (Some(x), Some(y)) if label.has_label() => Some(LabelLayout {
                        x,
                        y,
                        width: label.width,
                        height: label.height,
                    }),
                    _ => None,
                };
                Some(EdgeLayout {
                    index,
                    source: g.node_id(v).to_string(),
                    target: g.node_id(w).to_string(),
                    points: label.points.clone(),
                    reversed: label.reversed,
                    label: label_box,
                    label_rank: label.label_rank,
                })
            })
            .collect();
        edges.sort_by_key(|e| e.index);

        let graph = g.graph();
        Self {
            width: graph.width,
            height: graph.height,
            nodes,
            edges,
            subgraphs,
            trace,
        }
    }
}
