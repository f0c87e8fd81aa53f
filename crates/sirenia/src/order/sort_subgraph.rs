use super::constraints::ConstraintGraph;
use super::kernel::{self, KernelEntry};
use super::layer_graph::LayerGraph;
use super::resolve_conflicts::resolve_conflicts;
use super::sort::{SortResult, sort};
use crate::model::LayoutGraph;
use crate::options::SweepKernel;
use rustc_hash::FxHashMap as HashMap;
use sirenia_graph::NodeIx;

/// Orders the children of `v` (the layer root when `None`) and, recursively, of every nested
/// subgraph. Border nodes of a subgraph are pinned to the ends of its run.
pub fn sort_subgraph(
    g: &LayoutGraph,
    lg: &LayerGraph,
    v: Option<NodeIx>,
    cg: &ConstraintGraph,
    kernel: SweepKernel,
    bias_right: bool,
) -> SortResult {
    let borders = lg.borders(v);
    let movable: Vec<NodeIx> = lg
        .children(v)
        .iter()
        .copied()
        .filter(|&w| borders.is_none_or(|(bl, br)| w != bl && w != br))
        .collect();

    let mut subgraphs: HashMap<NodeIx, SortResult> = HashMap::default();
    let mut entries = kernel::evaluate(kernel, g, lg, &movable);
    for entry in &mut entries {
        if lg.has_children(entry.v) {
            let result = sort_subgraph(g, lg, Some(entry.v), cg, kernel, bias_right);
            if result.barycenter.is_some() {
                merge_barycenters(entry, &result);
            }
            subgraphs.insert(entry.v, result);
        }
    }

    let mut resolved = resolve_conflicts(&entries, cg);
    for entry in &mut resolved {
        entry.vs = entry
            .vs
            .iter()
            .flat_map(|w| match subgraphs.get(w) {
                Some(sg) => sg.vs.clone(),
                None => vec![*w],
            })
            .collect();
    }

    let mut result = sort(resolved, bias_right);

    if let Some((bl, br)) = borders {
        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl);
        vs.append(&mut result.vs);
        vs.push(br);
        result.vs = vs;

        let bl_pred = lg.neighbors(bl).first().map(|&(u, _)| u);
        let br_pred = lg.neighbors(br).first().map(|&(u, _)| u);
        if let (Some(bl_pred), Some(br_pred)) = (bl_pred, br_pred) {
            let order = |u: NodeIx| g.node(u).order.unwrap_or(0) as f64;
            let bc = result.barycenter.unwrap_or(0.0);
            let w = result.weight;
            result.barycenter = Some((bc * w + order(bl_pred) + order(br_pred)) / (w + 2.0));
            result.weight = w + 2.0;
        }
    }

    result
}

fn merge_barycenters(target: &mut KernelEntry, other: &SortResult) {
    let Some(other_bc) = other.barycenter else {
        return;
    };
    match target.barycenter {
        Some(bc) => {
            let weight = target.weight + other.weight;
            target.barycenter = Some((bc * target.weight + other_bc * other.weight) / weight);
            target.weight = weight;
        }
        None => {
            target.barycenter = Some(other_bc);
            target.weight = other.weight;
        }
    }
}
