use sirenia::rank::{self, RankProblem, longest_path, network_simplex};
use sirenia::{EdgeLabel, Engine, LayoutGraph, NodeLabel, Ranker};

fn problem(n: usize, edges: &[(usize, usize, i32, i64)]) -> RankProblem {
    let mut p = RankProblem::new(n);
    for &(v, w, minlen, weight) in edges {
        p.add_edge(v, w, minlen, weight);
    }
    p
}

fn assert_feasible(p: &RankProblem) {
    for e in &p.edges {
        assert!(
            p.rank[e.w] - p.rank[e.v] >= e.minlen,
            "edge {e:?} infeasible with ranks {:?}",
            p.rank
        );
    }
}

fn objective(p: &RankProblem) -> i64 {
    p.edges
        .iter()
        .map(|e| e.weight * i64::from(p.rank[e.w] - p.rank[e.v]))
        .sum()
}

/// a b c d h / a e g h / a f g
fn gansner() -> RankProblem {
    let (a, b, c, d, h, e, f, g) = (0, 1, 2, 3, 4, 5, 6, 7);
    problem(
        8,
        &[
            (a, b, 1, 1),
            (b, c, 1, 1),
            (c, d, 1, 1),
            (d, h, 1, 1),
            (a, e, 1, 1),
            (e, g, 1, 1),
            (g, h, 1, 1),
            (a, f, 1, 1),
            (f, g, 1, 1),
        ],
    )
}

#[test]
fn longest_path_pulls_nodes_towards_their_successors() {
    let mut p = problem(3, &[(0, 1, 1, 1), (1, 2, 2, 1)]);
    longest_path(&mut p);
    assert_eq!(p.rank, vec![-3, -2, 0]);
    p.normalize();
    assert_eq!(p.rank, vec![0, 1, 3]);
}

#[test]
fn network_simplex_ranks_the_gansner_graph_optimally() {
    let mut p = gansner();
    network_simplex(&mut p);
    p.normalize();
    assert_feasible(&p);
    assert_eq!(p.rank, vec![0, 1, 2, 3, 4, 1, 1, 2]);
    assert_eq!(objective(&p), 10);
}

#[test]
fn every_ranker_is_feasible() {
    for ranker in [Ranker::NetworkSimplex, Ranker::TightTree, Ranker::LongestPath] {
        for engine in [Engine::Dagre, Engine::Elk] {
            let mut p = gansner();
            rank::solve(&mut p, ranker, engine);
            assert_feasible(&p);
            assert_eq!(p.rank.iter().copied().min(), Some(0));
        }
    }
}

#[test]
fn network_simplex_respects_minlen() {
    let mut p = problem(3, &[(0, 1, 3, 1), (1, 2, 1, 1), (0, 2, 1, 5)]);
    network_simplex(&mut p);
    p.normalize();
    assert_eq!(p.rank, vec![0, 3, 4]);
}

#[test]
fn network_simplex_on_a_single_node() {
    let mut p = RankProblem::new(1);
    network_simplex(&mut p);
    assert_eq!(p.rank, vec![0]);
}

#[test]
fn elk_balancing_moves_free_nodes_to_thin_ranks() {
    // a -> c spans three ranks; m can sit on rank 1 or 2, n is pinned to rank 1.
    let (a, m, c, n) = (0, 1, 2, 3);
    let mut p = problem(
        4,
        &[(a, c, 3, 1), (a, m, 1, 1), (m, c, 1, 1), (a, n, 1, 1)],
    );
    rank::solve(&mut p, Ranker::NetworkSimplex, Engine::Elk);
    assert_eq!(p.rank, vec![0, 2, 3, 1]);
}

#[test]
fn parallel_edges_merge_into_one_constraint() {
    let mut p = RankProblem::new(2);
    p.add_edge(0, 1, 1, 2);
    p.add_edge(0, 1, 3, 1);
    assert_eq!(p.edges.len(), 1);
    assert_eq!((p.edges[0].minlen, p.edges[0].weight), (3, 3));
}

#[test]
fn rank_starts_every_component_at_zero() {
    let mut g = LayoutGraph::new();
    let ids = ["a", "b", "c", "x", "y"];
    for id in ids {
        g.add_node(id, NodeLabel::default());
    }
    let ix = |g: &LayoutGraph, id: &str| g.node_ix(id).unwrap_or_else(|| panic!("missing {id}"));
    let (a, b, c, x, y) = (ix(&g, "a"), ix(&g, "b"), ix(&g, "c"), ix(&g, "x"), ix(&g, "y"));
    g.add_edge(a, b, EdgeLabel::default());
    g.add_edge(
        b,
        c,
        EdgeLabel {
            minlen: 2,
            ..Default::default()
        },
    );
    g.add_edge(y, x, EdgeLabel::default());

    rank::rank(&mut g, Ranker::NetworkSimplex, Engine::Dagre);
    let ranks: Vec<Option<i32>> = [a, b, c, x, y].iter().map(|&v| g.node(v).rank).collect();
    assert_eq!(ranks, vec![Some(0), Some(1), Some(3), Some(1), Some(0)]);
}

#[test]
fn rank_skips_subgraph_nodes() {
    let mut g = LayoutGraph::new();
    let sg = g.add_node("sg", NodeLabel::default());
    let a = g.add_node("a", NodeLabel::default());
    g.set_parent(a, Some(sg));
    rank::rank(&mut g, Ranker::NetworkSimplex, Engine::Dagre);
    assert_eq!(g.node(a).rank, Some(0));
    assert_eq!(g.node(sg).rank, None);
}
