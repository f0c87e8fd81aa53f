use sirenia::{DiagramInput, Engine, LayoutOptions, LayoutResult, Point, RankDir};

fn node<'a>(r: &'a LayoutResult, id: &str) -> &'a sirenia::NodeLayout {
    r.node(id).unwrap_or_else(|| panic!("missing node {id}"))
}

fn dagre() -> LayoutOptions {
    LayoutOptions::default()
}

fn elk() -> LayoutOptions {
    LayoutOptions::elk()
}

#[test]
fn layout_of_empty_input_is_empty() {
    let r = sirenia::layout(&DiagramInput::new(), &dagre()).unwrap();
    assert_eq!(r, LayoutResult::default());
}

#[test]
fn layout_two_nodes_one_edge_is_a_straight_vertical_line() {
    let input = DiagramInput::new()
        .node("a", 40.0, 20.0)
        .node("b", 40.0, 20.0)
        .edge("a", "b");
    let r = sirenia::layout(&input, &dagre()).unwrap();

    let (a, b) = (node(&r, "a"), node(&r, "b"));
    assert_eq!((a.x, a.y), (20.0, 10.0));
    assert_eq!((b.x, b.y), (20.0, 80.0));
    assert_eq!((r.width, r.height), (40.0, 90.0));

    assert_eq!(r.edges.len(), 1);
    let e = &r.edges[0];
    assert!(!e.reversed);
    assert_eq!(
        e.points,
        vec![
            Point { x: 20.0, y: 20.0 },
            Point { x: 20.0, y: 45.0 },
            Point { x: 20.0, y: 70.0 },
        ]
    );
}

#[test]
fn layout_two_nodes_left_to_right_is_horizontal() {
    let input = DiagramInput::new()
        .node("a", 40.0, 20.0)
        .node("b", 40.0, 20.0)
        .edge("a", "b");
    let r = sirenia::layout(&input, &dagre().with_direction(RankDir::LR)).unwrap();
    let (a, b) = (node(&r, "a"), node(&r, "b"));
    assert_eq!(a.y, b.y);
    assert!(b.x > a.x);
    assert_eq!((a.width, a.height), (40.0, 20.0));
    for p in &r.edges[0].points {
        assert_eq!(p.y, a.y);
    }
}

#[test]
fn layout_bottom_to_top_puts_target_above() {
    let input = DiagramInput::new()
        .node("a", 40.0, 20.0)
        .node("b", 40.0, 20.0)
        .edge("a", "b");
    let r = sirenia::layout(&input, &dagre().with_direction(RankDir::BT)).unwrap();
    assert!(node(&r, "b").y < node(&r, "a").y);
}

#[test]
fn layout_diamond_ranks_and_no_crossings() {
    for edges in [
        [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        [("c", "d"), ("b", "d"), ("a", "c"), ("a", "b")],
    ] {
        let mut input = DiagramInput::new()
            .node("a", 20.0, 20.0)
            .node("b", 20.0, 20.0)
            .node("c", 20.0, 20.0)
            .node("d", 20.0, 20.0);
        for (s, t) in edges {
            input = input.edge(s, t);
        }
        let r = sirenia::layout(&input, &elk()).unwrap();
        let ranks: Vec<i32> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| node(&r, id).rank)
            .collect();
        assert_eq!(ranks, vec![0, 1, 1, 2]);
        assert!(r.edges.iter().all(|e| !e.reversed));

        let r = sirenia::layout(&input, &dagre()).unwrap();
        let (a, b, c, d) = (node(&r, "a"), node(&r, "b"), node(&r, "c"), node(&r, "d"));
        assert_eq!(b.rank, c.rank);
        assert!(a.rank < b.rank && b.rank < d.rank);
        assert_ne!(b.x, c.x);
        assert_eq!(b.y, c.y);
    }
}

#[test]
fn layout_three_cycle_reverses_exactly_one_edge() {
    let input = DiagramInput::new()
        .node("a", 20.0, 20.0)
        .node("b", 20.0, 20.0)
        .node("c", 20.0, 20.0)
        .edge("a", "b")
        .edge("b", "c")
        .edge("c", "a");
    let r = sirenia::layout(&input, &elk()).unwrap();

    let reversed: Vec<usize> = r.edges.iter().filter(|e| e.reversed).map(|e| e.index).collect();
    assert_eq!(reversed, vec![2]);
    let mut ranks: Vec<i32> = r.nodes.iter().map(|n| n.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![0, 1, 2]);

    // Reversed edges still run from their declared source to their declared target.
    let back = &r.edges[2];
    assert_eq!((back.source.as_str(), back.target.as_str()), ("c", "a"));
    let (first, last) = (back.points[0], back.points[back.points.len() - 1]);
    assert!(first.y > last.y);
}

#[test]
fn layout_bipartite_pair_uncrosses_edges() {
    let input = DiagramInput::new()
        .node("a", 20.0, 20.0)
        .node("b", 20.0, 20.0)
        .node("c", 20.0, 20.0)
        .node("d", 20.0, 20.0)
        .edge("a", "d")
        .edge("b", "c");
    for opts in [dagre(), elk()] {
        let r = sirenia::layout(&input, &opts).unwrap();
        let (a, b, c, d) = (node(&r, "a"), node(&r, "b"), node(&r, "c"), node(&r, "d"));
        assert_eq!((a.x < b.x), (d.x < c.x));
    }
}

#[test]
fn layout_long_edge_gets_one_waypoint_per_inner_rank() {
    let mut input = DiagramInput::new()
        .node("a", 20.0, 20.0)
        .node("b", 20.0, 20.0)
        .edge("a", "b");
    input.edges[0].minlen = 3;
    let r = sirenia::layout(&input, &elk()).unwrap();
    assert_eq!(node(&r, "b").rank - node(&r, "a").rank, 3);
    // Two clipped endpoints around two chain waypoints.
    assert_eq!(r.edges[0].points.len(), 4);
}

#[test]
fn layout_self_loop_is_routed_beside_its_node() {
    let input = DiagramInput::new()
        .node("a", 40.0, 20.0)
        .node("b", 40.0, 20.0)
        .edge("a", "b")
        .edge("a", "a");
    let r = sirenia::layout(&input, &dagre()).unwrap();
    let a = node(&r, "a");
    let lp = &r.edges[1];
    assert_eq!((lp.source.as_str(), lp.target.as_str()), ("a", "a"));
    assert_eq!(lp.points.len(), 7);
    assert!(lp.points.iter().all(|p| p.x >= a.x));
}

#[test]
fn layout_places_edge_label_on_its_rank() {
    let input = DiagramInput::new()
        .node("a", 40.0, 20.0)
        .node("b", 40.0, 20.0)
        .labeled_edge("a", "b", 30.0, 12.0);
    for opts in [dagre(), elk()] {
        let r = sirenia::layout(&input, &opts).unwrap();
        let e = &r.edges[0];
        let label = e.label.unwrap_or_else(|| panic!("label not placed"));
        assert_eq!((label.width, label.height), (30.0, 12.0));
        let (a, b) = (node(&r, "a"), node(&r, "b"));
        assert!(a.y < label.y && label.y < b.y);
        let rank = e.label_rank.unwrap_or(-1);
        assert!(a.rank < rank && rank < b.rank);
    }
}

#[test]
fn layout_respects_margins() {
    let mut opts = dagre();
    opts.spacing.margin_x = 15.0;
    opts.spacing.margin_y = 7.0;
    let input = DiagramInput::new().node("a", 40.0, 20.0);
    let r = sirenia::layout(&input, &opts).unwrap();
    let a = node(&r, "a");
    assert_eq!((a.x, a.y), (35.0, 17.0));
    assert_eq!((r.width, r.height), (70.0, 34.0));
}

#[test]
fn layout_size_stops_at_the_self_loop_anchor() {
    let input = DiagramInput::new().node("a", 40.0, 20.0).edge("a", "a");
    let r = sirenia::layout(&input, &dagre()).unwrap();
    let a = node(&r, "a");
    assert_eq!((a.x, a.y), (20.0, 10.0));
    // The placeholder sits half a node gap plus half an edge gap right of the box.
    assert_eq!((r.width, r.height), (75.0, 20.0));
    let points = &r.edges[0].points;
    assert!(points.iter().all(|p| p.x >= 0.0 && p.x <= r.width));
    assert!(points.iter().all(|p| p.y >= 0.0 && p.y <= r.height));
}

#[test]
fn layout_disconnected_components_each_start_at_rank_zero() {
    let input = DiagramInput::new()
        .node("a", 20.0, 20.0)
        .node("b", 20.0, 20.0)
        .node("c", 20.0, 20.0)
        .node("d", 20.0, 20.0)
        .edge("a", "b")
        .edge("c", "d");
    let r = sirenia::layout(&input, &elk()).unwrap();
    assert_eq!(node(&r, "a").rank, 0);
    assert_eq!(node(&r, "c").rank, 0);
    assert_eq!(node(&r, "a").y, node(&r, "c").y);
}

#[test]
fn layout_zero_size_nodes_are_accepted() {
    let input = DiagramInput::new()
        .node("a", 0.0, 0.0)
        .node("b", 0.0, 0.0)
        .edge("a", "b");
    for engine in [Engine::Dagre, Engine::Elk] {
        let opts = LayoutOptions {
            engine,
            ..LayoutOptions::default()
        };
        let r = sirenia::layout(&input, &opts).unwrap();
        assert!(node(&r, "b").y > node(&r, "a").y);
        assert!(r.edges[0].points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
