use sirenia_graph::{Graph, NodeIx, alg};

fn graph(ids: &[&str], edges: &[(&str, &str)]) -> Graph<(), ()> {
    let mut g = Graph::new();
    for id in ids {
        g.add_node(*id, ());
    }
    for (v, w) in edges {
        let (Some(v), Some(w)) = (g.node_ix(v), g.node_ix(w)) else {
            panic!("unknown endpoint");
        };
        g.add_edge(v, w, ());
    }
    g
}

fn ids(g: &Graph<(), ()>, vs: &[NodeIx]) -> Vec<String> {
    vs.iter().map(|&v| g.node_id(v).to_string()).collect()
}

#[test]
fn components_are_weakly_connected() {
    let g = graph(&["a", "b", "c", "d", "e"], &[("b", "a"), ("c", "d")]);
    let comps: Vec<Vec<String>> = alg::components(&g).iter().map(|c| ids(&g, c)).collect();
    assert_eq!(comps, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
}

#[test]
fn topsort_orders_dag_and_rejects_cycles() {
    let g = graph(&["c", "b", "a"], &[("a", "b"), ("b", "c")]);
    let order = alg::topsort(&g).unwrap();
    assert_eq!(ids(&g, &order), ["a", "b", "c"]);
    assert!(alg::is_acyclic(&g));

    let g = graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
    assert_eq!(alg::topsort(&g), Err(alg::CycleFound));
}

#[test]
fn find_cycles_reports_sccs_and_self_loops() {
    let g = graph(
        &["a", "b", "c", "d", "e"],
        &[("a", "b"), ("b", "c"), ("c", "a"), ("d", "d"), ("c", "e")],
    );
    let cycles: Vec<Vec<String>> = alg::find_cycles(&g).iter().map(|c| ids(&g, c)).collect();
    assert_eq!(cycles, vec![vec!["a", "b", "c"], vec!["d"]]);
}
