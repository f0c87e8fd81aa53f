//! Greedy feedback arc set (Eades, Lin & Smyth).
//!
//! Nodes sit in buckets keyed by `out-weight - in-weight`. Sinks and sources are peeled off
//! first; otherwise the node with the largest delta is removed and its live incoming edges join
//! the FAS. Buckets are FIFO queues, and a node that moves between buckets is appended to the
//! tail of its new bucket, so results depend only on insertion order.

use rustc_hash::FxHashMap as HashMap;
use sirenia_graph::{EdgeIx, Graph, NodeIx};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    in_w: i64,
    out_w: i64,
    alive: bool,
    /// Stamp of the live queue slot; older slots for the node are stale.
    stamp: u64,
}

struct State {
    entries: Vec<Entry>,
    buckets: Vec<VecDeque<(NodeIx, u64)>>,
    zero_idx: i64,
    next_stamp: u64,
    /// Aggregated edges `(neighbor, weight)` in first-occurrence order.
    ins: Vec<Vec<(NodeIx, i64)>>,
    outs: Vec<Vec<(NodeIx, i64)>>,
}

impl State {
    fn assign_bucket(&mut self, v: NodeIx) {
        let entry = self.entries[v.index()];
        let last = self.buckets.len() - 1;
        let idx = if entry.out_w == 0 {
            0
        } else if entry.in_w == 0 {
            last
        } else {
            (entry.out_w - entry.in_w + self.zero_idx).clamp(0, last as i64) as usize
        };
        self.next_stamp += 1;
        self.entries[v.index()].stamp = self.next_stamp;
        self.buckets[idx].push_back((v, self.next_stamp));
    }

    fn dequeue(&mut self, idx: usize) -> Option<NodeIx> {
        while let Some((v, stamp)) = self.buckets[idx].pop_front() {
            let entry = self.entries[v.index()];
            if entry.alive && entry.stamp == stamp {
                return Some(v);
            }
        }
        None
    }

    fn remove_node(&mut self, v: NodeIx, collect: Option<&mut Vec<(NodeIx, NodeIx)>>) {
        self.entries[v.index()].alive = false;
        let ins = std::mem::take(&mut self.ins[v.index()]);
        let outs = std::mem::take(&mut self.outs[v.index()]);
        let mut collected: Vec<(NodeIx, NodeIx)> = Vec::new();
        for (u, weight) in ins {
            if !self.entries[u.index()].alive {
                continue;
            }
            collected.push((u, v));
            self.entries[u.index()].out_w -= weight;
            self.assign_bucket(u);
        }
        for (w, weight) in outs {
            if !self.entries[w.index()].alive {
                continue;
            }
            self.entries[w.index()].in_w -= weight;
            self.assign_bucket(w);
        }
        if let Some(out) = collect {
            out.extend(collected);
        }
    }
}

/// Returns every edge of `g` that belongs to the greedy feedback arc set, in the order the
/// heuristic selects `(u, v)` pairs; parallel edges are listed in insertion order.
pub fn greedy_fas<N, E, G>(g: &Graph<N, E, G>, weight_fn: impl Fn(&E) -> i64) -> Vec<EdgeIx> {
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let bound = g.node_bound();
    let mut entries = vec![Entry::default(); bound];
    let mut ins: Vec<Vec<(NodeIx, i64)>> = vec![Vec::new(); bound];
    let mut outs: Vec<Vec<(NodeIx, i64)>> = vec![Vec::new(); bound];
    let mut slot: HashMap<(NodeIx, NodeIx), usize> = HashMap::default();
    let mut max_in = 0i64;
    let mut max_out = 0i64;

    for v in g.nodes() {
        entries[v.index()].alive = true;
    }
    for e in g.edges() {
        let (v, w) = g.endpoints(e);
        if v == w {
            continue;
        }
        let weight = weight_fn(g.edge(e));
        match slot.get(&(v, w)) {
            Some(&i) => {
                outs[v.index()][i].1 += weight;
                if let Some(back) = ins[w.index()].iter_mut().find(|(u, _)| *u == v) {
                    back.1 += weight;
                }
            }
            None => {
                slot.insert((v, w), outs[v.index()].len());
                outs[v.index()].push((w, weight));
                ins[w.index()].push((v, weight));
            }
        }
        entries[v.index()].out_w += weight;
        max_out = max_out.max(entries[v.index()].out_w);
        entries[w.index()].in_w += weight;
        max_in = max_in.max(entries[w.index()].in_w);
    }

    let mut state = State {
        entries,
        buckets: vec![VecDeque::new(); (max_out + max_in + 3).max(3) as usize],
        zero_idx: max_in + 1,
        next_stamp: 0,
        ins,
        outs,
    };
    for v in g.nodes() {
        state.assign_bucket(v);
    }

    let sources = state.buckets.len() - 1;
    let mut remaining = g.node_count();
    let mut pairs: Vec<(NodeIx, NodeIx)> = Vec::new();
    while remaining > 0 {
        while let Some(v) = state.dequeue(0) {
            state.remove_node(v, None);
            remaining -= 1;
        }
        while let Some(v) = state.dequeue(sources) {
            state.remove_node(v, None);
            remaining -= 1;
        }
        if remaining == 0 {
            break;
        }
        let mut progressed = false;
        for i in (1..sources).rev() {
            if let Some(v) = state.dequeue(i) {
                state.remove_node(v, Some(&mut pairs));
                remaining -= 1;
                progressed = true;
                break;
            }
        }
        if !progressed {
            break;
        }
    }

    let mut fas: Vec<EdgeIx> = Vec::new();
    for (u, v) in pairs {
        fas.extend(g.out_edges(u).iter().copied().filter(|&e| g.target(e) == v));
    }
    fas
}
