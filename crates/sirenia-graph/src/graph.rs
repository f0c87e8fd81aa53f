//! The arena graph container.
//!
//! The container is always directed, allows parallel edges and self-loops, and supports an
//! optional parent for every node (compound graphs). Removed nodes and edges keep their slot: a
//! tombstoned edge still answers [`Graph::edge`] and [`Graph::endpoints`], which lets layout
//! phases keep a back-reference to an edge they temporarily took out of the graph.

pub mod alg;
mod entries;
mod ix;

pub use ix::{EdgeIx, NodeIx};

use entries::{EdgeEntry, NodeEntry};
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
pub struct Graph<N, E, G = ()> {
    graph_label: G,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, NodeIx>,
    node_count: usize,

    edges: Vec<EdgeEntry<E>>,
    edge_count: usize,

    root_children: Vec<NodeIx>,
}

impl<N, E, G: Default> Default for Graph<N, E, G> {
    fn default() -> Self {
        Self::with_graph(G::default())
    }
}

impl<N, E, G: Default> Graph<N, E, G> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N, E, G> Graph<N, E, G> {
    pub fn with_graph(graph_label: G) -> Self {
        Self {
            graph_label,
            nodes: Vec::new(),
            node_index: HashMap::default(),
            node_count: 0,
            edges: Vec::new(),
            edge_count: 0,
            root_children: Vec::new(),
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    // ---- nodes ----------------------------------------------------------------------------

    /// Inserts a node, or replaces the label of the live node that already carries `id`.
    pub fn add_node(&mut self, id: impl Into<String>, label: N) -> NodeIx {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(&id) {
            self.nodes[ix.index()].label = label;
            return ix;
        }
        let ix = NodeIx::new(self.nodes.len());
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
            live: true,
            parent: None,
            children: Vec::new(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        });
        self.node_index.insert(id, ix);
        self.root_children.push(ix);
        self.node_count += 1;
        ix
    }

    pub fn node_ix(&self, id: &str) -> Option<NodeIx> {
        self.node_index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn is_live(&self, v: NodeIx) -> bool {
        self.nodes.get(v.index()).is_some_and(|n| n.live)
    }

    pub fn node_id(&self, v: NodeIx) -> &str {
        &self.nodes[v.index()].id
    }

    pub fn node(&self, v: NodeIx) -> &N {
        &self.nodes[v.index()].label
    }

    pub fn node_mut(&mut self, v: NodeIx) -> &mut N {
        &mut self.nodes[v.index()].label
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of node slots ever allocated, live or not. Suitable for sizing dense side tables.
    pub fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIx> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.live)
            .map(|(i, _)| NodeIx::new(i))
    }

    pub fn remove_node(&mut self, v: NodeIx) -> bool {
        if !self.is_live(v) {
            return false;
        }
        let incident: Vec<EdgeIx> = {
            let n = &self.nodes[v.index()];
            n.in_edges.iter().chain(n.out_edges.iter()).copied().collect()
        };
        for e in incident {
            self.remove_edge(e);
        }

        self.detach(v);
        let children = std::mem::take(&mut self.nodes[v.index()].children);
        for child in children {
            self.nodes[child.index()].parent = None;
            self.root_children.push(child);
        }

        let n = &mut self.nodes[v.index()];
        n.live = false;
        let id = n.id.clone();
        self.node_index.remove(&id);
        self.node_count -= 1;
        true
    }

    /// Nodes without an incoming edge, in insertion order.
    pub fn sources(&self) -> Vec<NodeIx> {
        self.nodes()
            .filter(|&v| self.nodes[v.index()].in_edges.is_empty())
            .collect()
    }

    /// Nodes without an outgoing edge, in insertion order.
    pub fn sinks(&self) -> Vec<NodeIx> {
        self.nodes()
            .filter(|&v| self.nodes[v.index()].out_edges.is_empty())
            .collect()
    }

    // ---- hierarchy --------------------------------------------------------------------------

    pub fn set_parent(&mut self, v: NodeIx, parent: Option<NodeIx>) {
        if !self.is_live(v) {
            return;
        }
        self.detach(v);
        self.nodes[v.index()].parent = parent;
        match parent {
            Some(p) => self.nodes[p.index()].children.push(v),
            None => self.root_children.push(v),
        }
    }

    pub fn parent(&self, v: NodeIx) -> Option<NodeIx> {
        self.nodes[v.index()].parent
    }

    /// Children of `parent`, or the top-level nodes when `parent` is `None`.
    pub fn children(&self, parent: Option<NodeIx>) -> &[NodeIx] {
        match parent {
            Some(p) => &self.nodes[p.index()].children,
            None => &self.root_children,
        }
    }

    pub fn has_children(&self, v: NodeIx) -> bool {
        !self.nodes[v.index()].children.is_empty()
    }

    fn detach(&mut self, v: NodeIx) {
        match self.nodes[v.index()].parent {
            Some(p) => self.nodes[p.index()].children.retain(|&c| c != v),
            None => self.root_children.retain(|&c| c != v),
        }
    }

    // ---- edges ----------------------------------------------------------------------------

    pub fn add_edge(&mut self, v: NodeIx, w: NodeIx, label: E) -> EdgeIx {
        let e = EdgeIx::new(self.edges.len());
        self.edges.push(EdgeEntry {
            v,
            w,
            label,
            live: true,
        });
        self.nodes[v.index()].out_edges.push(e);
        self.nodes[w.index()].in_edges.push(e);
        self.edge_count += 1;
        e
    }

    pub fn remove_edge(&mut self, e: EdgeIx) -> bool {
        let Some(entry) = self.edges.get_mut(e.index()) else {
            return false;
        };
        if !entry.live {
            return false;
        }
        entry.live = false;
        let (v, w) = (entry.v, entry.w);
        self.nodes[v.index()].out_edges.retain(|&x| x != e);
        self.nodes[w.index()].in_edges.retain(|&x| x != e);
        self.edge_count -= 1;
        true
    }

    /// Replaces `e` by a new edge `w -> v` carrying the same label.
    ///
    /// The new edge is appended, exactly as if `e` had been removed and re-added, so iteration
    /// order afterwards matches a remove-then-add sequence. The old slot is tombstoned.
    pub fn reverse_edge(&mut self, e: EdgeIx) -> EdgeIx
    where
        E: Clone,
    {
        let entry = &self.edges[e.index()];
        let (v, w, label) = (entry.v, entry.w, entry.label.clone());
        self.remove_edge(e);
        self.add_edge(w, v, label)
    }

    pub fn is_edge_live(&self, e: EdgeIx) -> bool {
        self.edges.get(e.index()).is_some_and(|x| x.live)
    }

    /// Label of `e`; also valid for a tombstoned edge.
    pub fn edge(&self, e: EdgeIx) -> &E {
        &self.edges[e.index()].label
    }

    pub fn edge_mut(&mut self, e: EdgeIx) -> &mut E {
        &mut self.edges[e.index()].label
    }

    /// `(source, target)` of `e`; also valid for a tombstoned edge.
    pub fn endpoints(&self, e: EdgeIx) -> (NodeIx, NodeIx) {
        let entry = &self.edges[e.index()];
        (entry.v, entry.w)
    }

    pub fn source(&self, e: EdgeIx) -> NodeIx {
        self.edges[e.index()].v
    }

    pub fn target(&self, e: EdgeIx) -> NodeIx {
        self.edges[e.index()].w
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn edge_bound(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeIx> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.live)
            .map(|(i, _)| EdgeIx::new(i))
    }

    pub fn out_edges(&self, v: NodeIx) -> &[EdgeIx] {
        &self.nodes[v.index()].out_edges
    }

    pub fn in_edges(&self, v: NodeIx) -> &[EdgeIx] {
        &self.nodes[v.index()].in_edges
    }

    /// Incoming edges followed by outgoing edges.
    pub fn node_edges(&self, v: NodeIx) -> impl Iterator<Item = EdgeIx> + '_ {
        let n = &self.nodes[v.index()];
        n.in_edges.iter().chain(n.out_edges.iter()).copied()
    }

    /// First live edge `v -> w`.
    pub fn edge_between(&self, v: NodeIx, w: NodeIx) -> Option<EdgeIx> {
        self.nodes[v.index()]
            .out_edges
            .iter()
            .copied()
            .find(|&e| self.edges[e.index()].w == w)
    }

    pub fn has_edge(&self, v: NodeIx, w: NodeIx) -> bool {
        self.edge_between(v, w).is_some()
    }

    /// Distinct targets of `v`'s outgoing edges, in order of first appearance.
    pub fn successors(&self, v: NodeIx) -> Vec<NodeIx> {
        dedup_in_order(
            self.nodes[v.index()]
                .out_edges
                .iter()
                .map(|&e| self.edges[e.index()].w),
        )
    }

    /// Distinct sources of `v`'s incoming edges, in order of first appearance.
    pub fn predecessors(&self, v: NodeIx) -> Vec<NodeIx> {
        dedup_in_order(
            self.nodes[v.index()]
                .in_edges
                .iter()
                .map(|&e| self.edges[e.index()].v),
        )
    }

    /// Predecessors followed by successors not already listed.
    pub fn neighbors(&self, v: NodeIx) -> Vec<NodeIx> {
        let mut out = self.predecessors(v);
        for w in self.successors(v) {
            if !out.contains(&w) {
                out.push(w);
            }
        }
        out
    }
}

fn dedup_in_order(it: impl Iterator<Item = NodeIx>) -> Vec<NodeIx> {
    let mut out: Vec<NodeIx> = Vec::new();
    for v in it {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}
