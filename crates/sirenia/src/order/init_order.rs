use crate::model::LayoutGraph;
use sirenia_graph::NodeIx;

/// Initial layering: a depth-first walk over successors, started from leaf nodes sorted by rank
/// and then declaration order. Each node lands in its rank's layer the first time it is visited.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<NodeIx>> {
    let mut simple: Vec<(i32, NodeIx)> = g
        .nodes()
        .filter(|&v| !g.has_children(v))
        .filter_map(|v| g.node(v).rank.map(|r| (r, v)))
        .collect();
    let Some(max_rank) = simple.iter().map(|&(r, _)| r).max() else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<NodeIx>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];
    let mut visited = vec![false; g.node_bound()];

    // Stable: equal ranks keep graph insertion order.
    simple.sort_by_key(|&(r, _)| r);

    let mut stack: Vec<NodeIx> = Vec::new();
    for (_, start) in simple {
        stack.push(start);
        while let Some(v) = stack.pop() {
            if visited[v.index()] {
                continue;
            }
            visited[v.index()] = true;
            if let Some(layer) = g.node(v).rank.and_then(|r| layers.get_mut(r.max(0) as usize)) {
                layer.push(v);
            }
            stack.extend(g.successors(v).into_iter().rev());
        }
    }
    layers
}
