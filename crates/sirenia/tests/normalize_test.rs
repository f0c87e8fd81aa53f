use sirenia::graph::NodeIx;
use sirenia::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, Point, normalize};

fn ranked(g: &mut LayoutGraph, id: &str, rank: i32) -> NodeIx {
    g.add_node(
        id,
        NodeLabel {
            rank: Some(rank),
            ..Default::default()
        },
    )
}

fn dummies(g: &LayoutGraph) -> Vec<NodeIx> {
    g.nodes().filter(|&v| g.node(v).is_dummy()).collect()
}

#[test]
fn normalize_leaves_short_edges_alone() {
    let mut g = LayoutGraph::new();
    let a = ranked(&mut g, "a", 0);
    let b = ranked(&mut g, "b", 1);
    let e = g.add_edge(a, b, EdgeLabel::default());
    normalize::run(&mut g);
    assert!(dummies(&g).is_empty());
    assert!(g.is_edge_live(e));
    assert!(g.graph().dummy_chains.is_empty());
}

#[test]
fn normalize_inserts_one_dummy_per_inner_rank() {
    let mut g = LayoutGraph::new();
    let a = ranked(&mut g, "a", 0);
    let b = ranked(&mut g, "b", 3);
    g.add_edge(
        a,
        b,
        EdgeLabel {
            weight: 4,
            ..Default::default()
        },
    );
    normalize::run(&mut g);

    let ds = dummies(&g);
    assert_eq!(ds.len(), 2);
    assert_eq!(g.graph().dummy_chains.len(), 1);
    let ranks: Vec<Option<i32>> = ds.iter().map(|&v| g.node(v).rank).collect();
    assert_eq!(ranks, vec![Some(1), Some(2)]);
    assert!(ds.iter().all(|&v| g.node(v).dummy == Some(Dummy::Edge)));

    // a -> d1 -> d2 -> b, each segment keeps the weight.
    assert_eq!(g.edge_count(), 3);
    assert!(g.edges().all(|e| g.edge(e).weight == 4));
    assert_eq!(g.successors(a), vec![ds[0]]);
    assert_eq!(g.successors(ds[0]), vec![ds[1]]);
    assert_eq!(g.successors(ds[1]), vec![b]);
}

#[test]
fn normalize_turns_the_label_rank_dummy_into_a_label_node() {
    let mut g = LayoutGraph::new();
    let a = ranked(&mut g, "a", 0);
    let b = ranked(&mut g, "b", 4);
    g.add_edge(
        a,
        b,
        EdgeLabel {
            width: 30.0,
            height: 10.0,
            label_rank: Some(2),
            ..Default::default()
        },
    );
    normalize::run(&mut g);
    let labels: Vec<NodeIx> = g
        .nodes()
        .filter(|&v| g.node(v).dummy == Some(Dummy::EdgeLabel))
        .collect();
    assert_eq!(labels.len(), 1);
    let node = g.node(labels[0]);
    assert_eq!((node.rank, node.width, node.height), (Some(2), 30.0, 10.0));
}

#[test]
fn normalize_undo_folds_chains_into_polylines() {
    let mut g = LayoutGraph::new();
    let a = ranked(&mut g, "a", 0);
    let b = ranked(&mut g, "b", 3);
    g.add_edge(
        a,
        b,
        EdgeLabel {
            width: 20.0,
            height: 8.0,
            label_rank: Some(2),
            model_order: Some(7),
            ..Default::default()
        },
    );
    normalize::run(&mut g);
    for v in dummies(&g) {
        let rank = g.node(v).rank.unwrap_or(0);
        let n = g.node_mut(v);
        n.x = 5.0 * rank as f64;
        n.y = 10.0 * rank as f64;
    }
    normalize::undo(&mut g);

    assert!(dummies(&g).is_empty());
    assert_eq!(g.node_count(), 2);
    let edges: Vec<_> = g.edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(g.endpoints(edges[0]), (a, b));
    let label = g.edge(edges[0]);
    assert_eq!(
        label.points,
        vec![Point { x: 5.0, y: 10.0 }, Point { x: 10.0, y: 20.0 }]
    );
    assert_eq!((label.x, label.y), (Some(10.0), Some(20.0)));
    assert_eq!(label.model_order, Some(7));
    assert!(g.graph().dummy_chains.is_empty());
}
