//! Position estimates for movable nodes against the fixed neighbor layer.
//!
//! Every kernel yields an optional value in order units plus the total edge weight behind it.
//! Nodes without fixed-layer neighbors (or with zero total weight) get no value and keep their
//! relative position during the sort.

use super::layer_graph::LayerGraph;
use crate::model::LayoutGraph;
use crate::options::SweepKernel;
use rustc_hash::FxHashMap as HashMap;
use sirenia_graph::NodeIx;

#[derive(Debug, Clone, PartialEq)]
pub struct KernelEntry {
    pub v: NodeIx,
    pub barycenter: Option<f64>,
    pub weight: f64,
}

impl KernelEntry {
    fn empty(v: NodeIx) -> Self {
        Self {
            v,
            barycenter: None,
            weight: 0.0,
        }
    }
}

fn order_of(g: &LayoutGraph, v: NodeIx) -> f64 {
    g.node(v).order.unwrap_or(0) as f64
}

pub fn evaluate(
    kernel: SweepKernel,
    g: &LayoutGraph,
    lg: &LayerGraph,
    movable: &[NodeIx],
) -> Vec<KernelEntry> {
    match kernel {
        SweepKernel::Barycenter => barycenter(g, lg, movable),
        SweepKernel::NeighborMedian => neighbor_median(g, lg, movable),
        SweepKernel::EdgeSlot | SweepKernel::PortRank => {
            let slots = SlotTable::new(g, lg, kernel == SweepKernel::PortRank);
            movable
                .iter()
                .map(|&v| slots.mean(lg, v))
                .collect()
        }
    }
}

/// Weighted mean of neighbor orders.
pub fn barycenter(g: &LayoutGraph, lg: &LayerGraph, movable: &[NodeIx]) -> Vec<KernelEntry> {
    movable
        .iter()
        .map(|&v| {
            let nbrs = lg.neighbors(v);
            let (sum, weight) = nbrs.iter().fold((0.0, 0.0), |(sum, weight), &(u, w)| {
                let w = w as f64;
                (sum + w * order_of(g, u), weight + w)
            });
            if weight == 0.0 {
                return KernelEntry::empty(v);
            }
            KernelEntry {
                v,
                barycenter: Some(sum / weight),
                weight,
            }
        })
        .collect()
}

/// Weighted median of neighbor orders. With an even total weight the two middle values are
/// averaged.
pub fn neighbor_median(g: &LayoutGraph, lg: &LayerGraph, movable: &[NodeIx]) -> Vec<KernelEntry> {
    movable
        .iter()
        .map(|&v| {
            let mut pos: Vec<(f64, i64)> = lg
                .neighbors(v)
                .iter()
                .filter(|&&(_, w)| w > 0)
                .map(|&(u, w)| (order_of(g, u), w))
                .collect();
            let total: i64 = pos.iter().map(|&(_, w)| w).sum();
            if total == 0 {
                return KernelEntry::empty(v);
            }
            pos.sort_by(|a, b| a.0.total_cmp(&b.0));
            let at = |k: i64| {
                let mut acc = 0i64;
                for &(p, w) in &pos {
                    acc += w;
                    if k < acc {
                        return p;
                    }
                }
                pos.last().map(|&(p, _)| p).unwrap_or(0.0)
            };
            let median = if total % 2 == 1 {
                at(total / 2)
            } else {
                (at(total / 2 - 1) + at(total / 2)) / 2.0
            };
            KernelEntry {
                v,
                barycenter: Some(median),
                weight: total as f64,
            }
        })
        .collect()
}

/// Slot positions of the aggregated edges of one layer, keyed by `(fixed, movable)`.
struct SlotTable {
    slot: HashMap<(NodeIx, NodeIx), f64>,
}

impl SlotTable {
    fn new(g: &LayoutGraph, lg: &LayerGraph, global_ports: bool) -> Self {
        let mut by_fixed: Vec<(NodeIx, Vec<NodeIx>)> = Vec::new();
        for (u, v, _) in lg.edges() {
            match by_fixed.iter_mut().find(|(f, _)| *f == u) {
                Some((_, vs)) => vs.push(v),
                None => by_fixed.push((u, vec![v])),
            }
        }
        // Ports on each fixed node follow the current order of the movable endpoints.
        for (_, vs) in &mut by_fixed {
            vs.sort_by_key(|&v| g.node(v).order.unwrap_or(usize::MAX));
        }

        let mut slot = HashMap::default();
        if global_ports {
            by_fixed.sort_by_key(|&(u, _)| g.node(u).order.unwrap_or(usize::MAX));
            let total: usize = by_fixed.iter().map(|(_, vs)| vs.len()).sum();
            let span = by_fixed
                .iter()
                .filter_map(|&(u, _)| g.node(u).order)
                .max()
                .map_or(0.0, |m| (m + 1) as f64);
            let mut port = 0usize;
            for (u, vs) in &by_fixed {
                for &v in vs {
                    let rank = (port as f64 + 0.5) * span / total as f64 - 0.5;
                    slot.insert((*u, v), rank);
                    port += 1;
                }
            }
        } else {
            for (u, vs) in &by_fixed {
                let deg = vs.len() as f64;
                for (k, &v) in vs.iter().enumerate() {
                    slot.insert((*u, v), order_of(g, *u) + (k as f64 + 1.0) / (deg + 1.0));
                }
            }
        }
        Self { slot }
    }

    fn mean(&self, lg: &LayerGraph, v: NodeIx) -> KernelEntry {
        let (sum, weight) = lg
            .neighbors(v)
            .iter()
            .fold((0.0, 0.0), |(sum, weight), &(u, w)| {
                let w = w as f64;
                let s = self.slot.get(&(u, v)).copied().unwrap_or(0.0);
                (sum + w * s, weight + w)
            });
        if weight == 0.0 {
            return KernelEntry::empty(v);
        }
        KernelEntry {
            v,
            barycenter: Some(sum / weight),
            weight,
        }
    }
}
