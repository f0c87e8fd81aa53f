use sirenia_graph::Graph;

#[test]
fn add_node_is_idempotent_per_id_and_replaces_label() {
    let mut g: Graph<i32, ()> = Graph::new();
    let a = g.add_node("a", 1);
    let a2 = g.add_node("a", 2);
    assert_eq!(a, a2);
    assert_eq!(*g.node(a), 2);
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.node_ix("a"), Some(a));
    assert_eq!(g.node_ix("missing"), None);
}

#[test]
fn nodes_iterate_in_insertion_order_and_skip_tombstones() {
    let mut g: Graph<(), ()> = Graph::new();
    let a = g.add_node("a", ());
    let b = g.add_node("b", ());
    let c = g.add_node("c", ());
    assert!(g.remove_node(b));
    assert!(!g.remove_node(b));
    assert_eq!(g.nodes().collect::<Vec<_>>(), vec![a, c]);
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.node_bound(), 3);
    assert!(!g.contains("b"));
}

#[test]
fn parallel_edges_are_kept_and_successors_are_distinct() {
    let mut g: Graph<(), u32> = Graph::new();
    let a = g.add_node("a", ());
    let b = g.add_node("b", ());
    let e1 = g.add_edge(a, b, 1);
    let e2 = g.add_edge(a, b, 2);
    assert_ne!(e1, e2);
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.out_edges(a), &[e1, e2]);
    assert_eq!(g.successors(a), vec![b]);
    assert_eq!(g.predecessors(b), vec![a]);
    assert_eq!(g.edge_between(a, b), Some(e1));
}

#[test]
fn removed_edge_keeps_label_and_endpoints() {
    let mut g: Graph<(), &'static str> = Graph::new();
    let a = g.add_node("a", ());
    let b = g.add_node("b", ());
    let e = g.add_edge(a, b, "ab");
    assert!(g.remove_edge(e));
    assert!(!g.is_edge_live(e));
    assert_eq!(*g.edge(e), "ab");
    assert_eq!(g.endpoints(e), (a, b));
    assert!(g.out_edges(a).is_empty());
    assert_eq!(g.edges().count(), 0);
}

#[test]
fn reverse_edge_appends_a_new_edge() {
    let mut g: Graph<(), u32> = Graph::new();
    let a = g.add_node("a", ());
    let b = g.add_node("b", ());
    let c = g.add_node("c", ());
    let ab = g.add_edge(a, b, 1);
    let bc = g.add_edge(b, c, 2);
    let ba = g.reverse_edge(ab);
    assert_eq!(g.endpoints(ba), (b, a));
    assert_eq!(*g.edge(ba), 1);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![bc, ba]);
    assert_eq!(g.out_edges(b), &[bc, ba]);
}

#[test]
fn remove_node_drops_incident_edges_and_orphans_children() {
    let mut g: Graph<(), ()> = Graph::new();
    let sg = g.add_node("sg", ());
    let a = g.add_node("a", ());
    let b = g.add_node("b", ());
    g.set_parent(a, Some(sg));
    g.set_parent(b, Some(sg));
    g.add_edge(a, sg, ());
    assert_eq!(g.children(Some(sg)), &[a, b]);
    assert_eq!(g.children(None), &[sg]);

    g.remove_node(sg);
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.parent(a), None);
    assert_eq!(g.children(None), &[a, b]);
}

#[test]
fn set_parent_moves_child_to_end_of_new_parent() {
    let mut g: Graph<(), ()> = Graph::new();
    let p = g.add_node("p", ());
    let q = g.add_node("q", ());
    let x = g.add_node("x", ());
    g.set_parent(x, Some(p));
    g.set_parent(x, Some(q));
    assert!(g.children(Some(p)).is_empty());
    assert_eq!(g.children(Some(q)), &[x]);
    assert!(g.has_children(q));
    g.set_parent(x, None);
    assert_eq!(g.children(None), &[p, q, x]);
}

#[test]
fn node_edges_list_in_edges_first() {
    let mut g: Graph<(), ()> = Graph::new();
    let a = g.add_node("a", ());
    let b = g.add_node("b", ());
    let c = g.add_node("c", ());
    let bc = g.add_edge(b, c, ());
    let ab = g.add_edge(a, b, ());
    assert_eq!(g.node_edges(b).collect::<Vec<_>>(), vec![ab, bc]);
    assert_eq!(g.neighbors(b), vec![a, c]);
    assert_eq!(g.sources(), vec![a]);
    assert_eq!(g.sinks(), vec![c]);
}
