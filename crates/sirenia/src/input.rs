//! Diagram input and construction of the layout arena.

use crate::error::{Error, Result};
use crate::model::{EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel};
use crate::options::LayoutOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramInput {
    pub nodes: Vec<InputNode>,
    pub edges: Vec<InputEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
    pub minlen: u32,
    pub label: Option<InputLabel>,
}

impl Default for InputEdge {
    fn default() -> Self {
        Self {
            source: String::new(),
            target: String::new(),
            weight: 1,
            minlen: 1,
            label: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLabel {
    pub width: f64,
    pub height: f64,
    pub pos: LabelPos,
    pub offset: f64,
}

impl Default for InputLabel {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            pos: LabelPos::C,
            offset: 10.0,
        }
    }
}

impl DiagramInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, id: impl Into<String>, width: f64, height: f64) -> Self {
        self.nodes.push(InputNode {
            id: id.into(),
            width,
            height,
            parent: None,
        });
        self
    }

    pub fn child(
        mut self,
        id: impl Into<String>,
        parent: impl Into<String>,
        width: f64,
        height: f64,
    ) -> Self {
        self.nodes.push(InputNode {
            id: id.into(),
            width,
            height,
            parent: Some(parent.into()),
        });
        self
    }

    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push(InputEdge {
            source: source.into(),
            target: target.into(),
            ..Default::default()
        });
        self
    }

    pub fn labeled_edge(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        width: f64,
        height: f64,
    ) -> Self {
        self.edges.push(InputEdge {
            source: source.into(),
            target: target.into(),
            label: Some(InputLabel {
                width,
                height,
                ..Default::default()
            }),
            ..Default::default()
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Validates `input` and builds the arena graph for one layout call.
pub fn build_graph(input: &DiagramInput, opts: &LayoutOptions) -> Result<LayoutGraph> {
    let mut g = LayoutGraph::with_graph(GraphLabel {
        rankdir: opts.direction,
        nodesep: opts.spacing.node_sep,
        ranksep: opts.spacing.rank_sep,
        edgesep: opts.spacing.edge_sep,
        marginx: opts.spacing.margin_x,
        marginy: opts.spacing.margin_y,
        ..Default::default()
    });

    for (i, n) in input.nodes.iter().enumerate() {
        if g.contains(&n.id) {
            return Err(Error::DuplicateNode { id: n.id.clone() });
        }
        g.add_node(
            n.id.clone(),
            NodeLabel {
                model_order: Some(i),
                ..NodeLabel::new(n.width.max(0.0), n.height.max(0.0))
            },
        );
    }

    for n in &input.nodes {
        let Some(parent_id) = n.parent.as_deref() else {
            continue;
        };
        let Some(parent) = g.node_ix(parent_id) else {
            return Err(Error::UnknownParent {
                node: n.id.clone(),
                parent: parent_id.to_string(),
            });
        };
        let Some(v) = g.node_ix(&n.id) else {
            continue;
        };
        g.set_parent(v, Some(parent));
    }
    check_parent_cycles(&g)?;

    for (i, e) in input.edges.iter().enumerate() {
        let lookup = |id: &str| {
            g.node_ix(id).ok_or_else(|| Error::UnknownNode {
                edge: i,
                id: id.to_string(),
            })
        };
        let v = lookup(&e.source)?;
        let w = lookup(&e.target)?;
        let label = e.label.unwrap_or(InputLabel::default());
        g.add_edge(
            v,
            w,
            EdgeLabel {
                width: label.width.max(0.0),
                height: label.height.max(0.0),
                labelpos: label.pos,
                labeloffset: label.offset,
                minlen: e.minlen.max(1) as i32,
                weight: i64::from(e.weight),
                model_order: Some(i),
                ..Default::default()
            },
        );
    }

    Ok(g)
}

fn check_parent_cycles(g: &LayoutGraph) -> Result<()> {
    for v in g.nodes() {
        let mut cur = g.parent(v);
        let mut steps = 0usize;
        while let Some(p) = cur {
            if p == v || steps > g.node_count() {
                return Err(Error::ParentCycle {
                    node: g.node_id(v).to_string(),
                });
            }
            cur = g.parent(p);
            steps += 1;
        }
    }
    Ok(())
}
