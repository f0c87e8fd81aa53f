//! Exact weighted crossing count.
//!
//! Barth, Jünger and Mutzel, "Simple and Efficient Bilayer Cross Counting": edges between two
//! adjacent layers are sorted by their north endpoint, and inversions of their south endpoints
//! are accumulated in a binary tree.

use crate::model::LayoutGraph;
use sirenia_graph::NodeIx;

pub fn cross_count(g: &LayoutGraph, layering: &[Vec<NodeIx>]) -> u64 {
    let mut pos = vec![usize::MAX; g.node_bound()];
    for layer in layering {
        for (i, &v) in layer.iter().enumerate() {
            pos[v.index()] = i;
        }
    }
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pos, &pair[0], &pair[1]))
        .sum()
}

fn two_layer_cross_count(g: &LayoutGraph, pos: &[usize], north: &[NodeIx], south: &[NodeIx]) -> u64 {
    if south.is_empty() {
        return 0;
    }
    let in_south = |v: NodeIx| {
        let p = pos[v.index()];
        (p < south.len() && south[p] == v).then_some(p)
    };

    let mut entries: Vec<(usize, u64)> = Vec::new();
    for &v in north {
        let start = entries.len();
        for &e in g.out_edges(v) {
            let Some(p) = in_south(g.target(e)) else {
                continue;
            };
            entries.push((p, g.edge(e).weight.max(0) as u64));
        }
        entries[start..].sort_by_key(|&(p, _)| p);
    }

    let mut first_index = 1usize;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree = vec![0u64; tree_size];

    let mut cc = 0u64;
    for (p, weight) in entries {
        let mut index = p + first_index;
        tree[index] += weight;
        let mut weight_sum = 0u64;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += weight;
        }
        cc += weight * weight_sum;
    }
    cc
}

/// Pairs of real nodes on the same layer that appear against their declaration order.
pub fn model_order_inversions(g: &LayoutGraph, layering: &[Vec<NodeIx>]) -> u64 {
    let mut total = 0u64;
    for layer in layering {
        let seq: Vec<usize> = layer.iter().filter_map(|&v| g.node(v).model_order).collect();
        for (i, a) in seq.iter().enumerate() {
            total += seq[i + 1..].iter().filter(|b| *b < a).count() as u64;
        }
    }
    total
}
