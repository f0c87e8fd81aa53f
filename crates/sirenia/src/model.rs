//! Label types carried by the layout graph.
//!
//! Every phase reads and writes these labels through [`LayoutGraph`] handles. Fields that only
//! matter to one phase (border handles, self-edge stash, chain back-references) live here too so
//! the arena stays the single source of truth for a layout call.

use serde::{Deserialize, Serialize};
use sirenia_graph::{EdgeIx, Graph, NodeIx};

pub type LayoutGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::LR | RankDir::RL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelPos {
    #[serde(rename = "l")]
    L,
    #[default]
    #[serde(rename = "c")]
    C,
    #[serde(rename = "r")]
    R,
}

/// Kind of a synthetic node inserted by a layout phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dummy {
    /// Interior node of a normalized long edge.
    Edge,
    /// The chain node that carries the edge label.
    EdgeLabel,
    /// Subgraph border (top/bottom/left/right).
    Border,
    /// Placeholder that reserves room for a self-loop.
    SelfEdge,
    /// Temporary node pinning the rank of an edge label.
    EdgeProxy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderType {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    pub nodesep: f64,
    pub ranksep: f64,
    pub edgesep: f64,
    pub marginx: f64,
    pub marginy: f64,
    pub dummy_chains: Vec<NodeIx>,
    pub node_rank_factor: Option<i32>,
    pub max_rank: i32,
    pub width: f64,
    pub height: f64,
    pub(crate) next_dummy: usize,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            ranksep: 50.0,
            edgesep: 20.0,
            marginx: 0.0,
            marginy: 0.0,
            dummy_chains: Vec::new(),
            node_rank_factor: None,
            max_rank: 0,
            width: 0.0,
            height: 0.0,
            next_dummy: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub dummy: Option<Dummy>,
    /// Declaration index of a real node; `None` for synthetic nodes.
    pub model_order: Option<usize>,
    pub labelpos: LabelPos,
    /// Original label of the edge a dummy stands for (chain heads, self-edge placeholders).
    pub edge_label: Option<Box<EdgeLabel>>,
    /// Edge a dummy stands for. May be tombstoned while the dummy exists.
    pub edge_obj: Option<EdgeIx>,
    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_type: Option<BorderType>,
    pub border_top: Option<NodeIx>,
    pub border_bottom: Option<NodeIx>,
    pub border_left: Vec<Option<NodeIx>>,
    pub border_right: Vec<Option<NodeIx>>,
    pub self_edges: Vec<SelfEdge>,
}

impl NodeLabel {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.dummy.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub width: f64,
    pub height: f64,
    pub labelpos: LabelPos,
    pub labeloffset: f64,
    pub label_rank: Option<i32>,
    pub minlen: i32,
    pub weight: i64,
    pub nesting_edge: bool,
    pub reversed: bool,
    /// Declaration index of the input edge this edge (or chain segment) belongs to.
    pub model_order: Option<usize>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Vec<Point>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            labelpos: LabelPos::C,
            labeloffset: 10.0,
            label_rank: None,
            minlen: 1,
            weight: 1,
            nesting_edge: false,
            reversed: false,
            model_order: None,
            x: None,
            y: None,
            points: Vec::new(),
        }
    }
}

impl EdgeLabel {
    /// Only edges with a two-dimensional label get a label rank.
    pub fn has_label(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub(crate) fn segment(weight: i64, model_order: Option<usize>) -> Self {
        Self {
            weight,
            model_order,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub edge: EdgeIx,
    pub label: EdgeLabel,
}
