//! Merges kernel entries that violate a subgraph constraint.
//!
//! Based on Forster, "A Fast and Simple Heuristic for Constrained Two-Level Crossing
//! Reduction". Entries are visited in topological order of the constraint graph; a constrained
//! pair whose values disagree with the constraint is fused into one entry with the combined
//! weighted value.

use super::constraints::ConstraintGraph;
use super::kernel::KernelEntry;
use rustc_hash::FxHashMap as HashMap;
use sirenia_graph::NodeIx;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub vs: Vec<NodeIx>,
    /// Position of the first original entry folded into this one.
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: f64,
}

#[derive(Debug, Clone)]
struct Slot {
    vs: Vec<NodeIx>,
    i: usize,
    barycenter: Option<f64>,
    weight: f64,
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    merged: bool,
}

pub fn resolve_conflicts(entries: &[KernelEntry], cg: &ConstraintGraph) -> Vec<ResolvedEntry> {
    let mut slots: Vec<Slot> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| Slot {
            vs: vec![e.v],
            i,
            barycenter: e.barycenter,
            weight: e.weight,
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            merged: false,
        })
        .collect();
    let index: HashMap<NodeIx, usize> = entries.iter().enumerate().map(|(i, e)| (e.v, i)).collect();

    for &(v, w) in cg.edges() {
        let (Some(&a), Some(&b)) = (index.get(&v), index.get(&w)) else {
            continue;
        };
        slots[b].indegree += 1;
        slots[a].outs.push(b);
    }

    let mut sources: Vec<usize> = (0..slots.len())
        .filter(|&i| slots[i].indegree == 0)
        .collect();
    let mut visited: Vec<usize> = Vec::new();

    while let Some(v) = sources.pop() {
        visited.push(v);
        let ins: Vec<usize> = slots[v].ins.iter().rev().copied().collect();
        for u in ins {
            if slots[u].merged {
                continue;
            }
            let conflict = match (slots[u].barycenter, slots[v].barycenter) {
                (Some(bu), Some(bv)) => bu >= bv,
                _ => true,
            };
            if conflict {
                merge(&mut slots, v, u);
            }
        }
        let outs = slots[v].outs.clone();
        for w in outs {
            slots[w].ins.push(v);
            slots[w].indegree -= 1;
            if slots[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    visited
        .into_iter()
        .filter(|&i| !slots[i].merged)
        .map(|i| {
            let s = &slots[i];
            ResolvedEntry {
                vs: s.vs.clone(),
                i: s.i,
                barycenter: s.barycenter,
                weight: s.weight,
            }
        })
        .collect()
}

fn merge(slots: &mut [Slot], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for k in [target, source] {
        let s = &slots[k];
        if let Some(bc) = s.barycenter.filter(|_| s.weight != 0.0) {
            sum += bc * s.weight;
            weight += s.weight;
        }
    }

    let mut vs = std::mem::take(&mut slots[source].vs);
    vs.append(&mut slots[target].vs);
    let source_i = slots[source].i;
    slots[source].merged = true;

    let t = &mut slots[target];
    t.vs = vs;
    t.barycenter = (weight != 0.0).then(|| sum / weight);
    t.weight = weight;
    t.i = t.i.min(source_i);
}
