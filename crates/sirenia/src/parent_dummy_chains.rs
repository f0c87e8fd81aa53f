//! Assign dummy chain nodes to subgraphs.
//!
//! A chain climbs from its source's subgraph up to the lowest common ancestor of both endpoints
//! and then descends towards the target's subgraph. Each dummy joins the deepest subgraph on
//! that path whose rank span covers the dummy's rank, so the orderer keeps it inside the right
//! cluster.

use crate::model::LayoutGraph;
use sirenia_graph::NodeIx;

#[derive(Debug, Clone, Copy, Default)]
struct LowLim {
    low: usize,
    lim: usize,
}

fn postorder_nums(g: &LayoutGraph) -> Vec<LowLim> {
    fn dfs(g: &LayoutGraph, v: NodeIx, lim: &mut usize, out: &mut [LowLim]) {
        let low = *lim;
        for &c in g.children(Some(v)) {
            dfs(g, c, lim, out);
        }
        out[v.index()] = LowLim { low, lim: *lim };
        *lim += 1;
    }

    let mut out = vec![LowLim::default(); g.node_bound()];
    let mut lim = 0usize;
    for &v in g.children(None) {
        dfs(g, v, &mut lim, &mut out);
    }
    out
}

/// Subgraph path from `v` up to the LCA and down to `w`. `None` stands for the root.
fn find_path(
    g: &LayoutGraph,
    nums: &[LowLim],
    v: NodeIx,
    w: NodeIx,
) -> (Vec<Option<NodeIx>>, Option<NodeIx>) {
    let low = nums[v.index()].low.min(nums[w.index()].low);
    let lim = nums[v.index()].lim.max(nums[w.index()].lim);

    let mut v_path: Vec<Option<NodeIx>> = Vec::new();
    let mut parent = Some(v);
    loop {
        parent = parent.and_then(|p| g.parent(p));
        v_path.push(parent);
        match parent {
            Some(p) if nums[p.index()].low > low || lim > nums[p.index()].lim => continue,
            _ => break,
        }
    }
    let lca = parent;

    let mut w_path: Vec<Option<NodeIx>> = Vec::new();
    let mut parent = g.parent(w);
    while parent != lca {
        w_path.push(parent);
        parent = parent.and_then(|p| g.parent(p));
    }
    w_path.reverse();
    v_path.extend(w_path);
    (v_path, lca)
}

pub fn parent_dummy_chains(g: &mut LayoutGraph) {
    let nums = postorder_nums(g);
    let heads: Vec<NodeIx> = g.graph().dummy_chains.clone();

    for head in heads {
        let Some(e) = g.node(head).edge_obj else {
            continue;
        };
        let (src, dst) = g.endpoints(e);
        let (path, lca) = find_path(g, &nums, src, dst);
        let mut path_idx = 0usize;
        let mut ascending = true;

        let mut v = head;
        while v != dst {
            let Some(rank) = g.node(v).rank else {
                break;
            };
            let at = |idx: usize| path.get(idx).copied().flatten();
            if ascending {
                while at(path_idx) != lca
                    && at(path_idx)
                        .and_then(|p| g.node(p).max_rank)
                        .is_some_and(|max| max < rank)
                {
                    path_idx += 1;
                }
                if at(path_idx) == lca {
                    ascending = false;
                }
            }
            if !ascending {
                while path_idx + 1 < path.len()
                    && at(path_idx + 1)
                        .and_then(|p| g.node(p).min_rank)
                        .is_some_and(|min| min <= rank)
                {
                    path_idx += 1;
                }
            }
            let path_v = at(path_idx);

            g.set_parent(v, path_v);
            let Some(next) = g.successors(v).first().copied() else {
                break;
            };
            v = next;
        }
    }
}
