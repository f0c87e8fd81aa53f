use sirenia::order::rng::XorShift64Star;
use sirenia::{
    Acyclicer, Continuation, DiagramInput, Engine, LayoutOptions, LayoutResult, Ranker,
    Refinement, SweepKernel,
};

/// A mixed graph: a cycle, a long edge, a fan-out, a self-loop and a detached pair.
fn sample() -> DiagramInput {
    let widths = [30.0, 50.0, 20.0, 40.0, 60.0, 25.0, 35.0, 45.0, 20.0, 30.0];
    let mut input = DiagramInput::new();
    for (i, w) in widths.iter().enumerate() {
        input = input.node(format!("n{i}"), *w, 20.0);
    }
    for (s, t) in [
        (0, 1),
        (0, 2),
        (0, 3),
        (1, 4),
        (2, 4),
        (3, 5),
        (4, 6),
        (5, 6),
        (6, 1),
        (0, 6),
        (3, 3),
        (2, 5),
        (8, 9),
    ] {
        input = input.edge(format!("n{s}"), format!("n{t}"));
    }
    input.edges[9].minlen = 2;
    input
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Dag,
    Cyclic,
    Compound,
}

/// A seeded random graph of the given shape. Edges only join leaf nodes; labels, longer
/// minimum lengths and self-loops are sprinkled in depending on the seed.
fn generated(shape: Shape, seed: u64) -> DiagramInput {
    let mut rng = XorShift64Star::new(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ shape as u64);
    let with_labels = seed % 2 == 0;
    let with_loops = seed % 3 == 0;
    let n = 4 + rng.below(9);
    let mut input = DiagramInput::new();

    let mut clusters: Vec<String> = Vec::new();
    if shape == Shape::Compound {
        input = input.node("s0", 0.0, 0.0);
        clusters.push("s0".into());
        if rng.below(2) == 0 {
            input = input.child("s1", "s0", 0.0, 0.0);
            clusters.push("s1".into());
        }
        if rng.below(2) == 0 {
            input = input.node("s2", 0.0, 0.0);
            clusters.push("s2".into());
        }
    }
    for i in 0..n {
        let (w, h) = (10.0 + 10.0 * rng.below(6) as f64, 10.0 + 5.0 * rng.below(4) as f64);
        let id = format!("n{i}");
        // The first leaves seed every cluster so none is empty.
        let parent = if i < clusters.len() {
            Some(i)
        } else if !clusters.is_empty() {
            Some(rng.below(clusters.len() + 1)).filter(|&k| k < clusters.len())
        } else {
            None
        };
        input = match parent {
            Some(k) => input.child(id, clusters[k].clone(), w, h),
            None => input.node(id, w, h),
        };
    }

    let cyclic = match shape {
        Shape::Dag => false,
        Shape::Cyclic => true,
        Shape::Compound => rng.below(2) == 0,
    };
    let m = n + rng.below(n);
    for _ in 0..m {
        let (mut s, mut t) = (rng.below(n), rng.below(n));
        if s == t {
            continue;
        }
        if !cyclic && s > t {
            std::mem::swap(&mut s, &mut t);
        }
        let (s, t) = (format!("n{s}"), format!("n{t}"));
        input = if with_labels && rng.below(3) == 0 {
            input.labeled_edge(s, t, 10.0 + 5.0 * rng.below(4) as f64, 8.0)
        } else {
            input.edge(s, t)
        };
        if rng.below(5) == 0 {
            if let Some(e) = input.edges.last_mut() {
                e.minlen = 2;
            }
        }
    }
    if with_loops {
        for _ in 0..1 + rng.below(2) {
            let v = format!("n{}", rng.below(n));
            input = input.edge(v.clone(), v);
        }
    }
    input
}

/// The hand-built sample plus a few dozen generated graphs of every shape.
fn corpus() -> Vec<(String, DiagramInput)> {
    let mut out = vec![("sample".to_string(), sample())];
    for shape in [Shape::Dag, Shape::Cyclic, Shape::Compound] {
        for seed in 1..=12 {
            out.push((format!("{shape:?}/{seed}"), generated(shape, seed)));
        }
    }
    out
}

fn variants() -> Vec<LayoutOptions> {
    let mut out = vec![LayoutOptions::default(), LayoutOptions::elk()];
    let mut o = LayoutOptions::default();
    o.acyclicer = Acyclicer::Greedy;
    o.ranker = Ranker::LongestPath;
    o.order.kernel = SweepKernel::NeighborMedian;
    o.order.refinement = Refinement::Transpose;
    out.push(o);
    let mut o = LayoutOptions::elk();
    o.ranker = Ranker::TightTree;
    o.order.kernel = SweepKernel::EdgeSlot;
    o.order.continuation = Continuation::FirstStall;
    out.push(o);
    let mut o = LayoutOptions::elk();
    o.order.kernel = SweepKernel::PortRank;
    o.order.continuation = Continuation::Exhaustive;
    o.order.max_passes = Some(6);
    o.order.model_order_influence = 0.5;
    out.push(o);
    out
}

fn rank_of(r: &LayoutResult, id: &str) -> i32 {
    r.node(id).map(|n| n.rank).unwrap_or(i32::MIN)
}

/// Lays out every corpus graph under every option variant.
fn for_each_layout(mut check: impl FnMut(&str, &DiagramInput, &LayoutOptions, &LayoutResult)) {
    for (name, input) in corpus() {
        for opts in variants() {
            let r = sirenia::layout(&input, &opts)
                .unwrap_or_else(|err| panic!("{name} failed with {opts:?}: {err}"));
            check(&name, &input, &opts, &r);
        }
    }
}

#[test]
fn corpus_covers_every_feature() {
    let graphs = corpus();
    let any = |pred: &dyn Fn(&DiagramInput) -> bool| graphs.iter().any(|(_, g)| pred(g));
    assert!(graphs.len() >= 36);
    assert!(any(&|g: &DiagramInput| g.edges.iter().any(|e| e.source == e.target)));
    assert!(any(&|g: &DiagramInput| g.edges.iter().any(|e| e.label.is_some())));
    assert!(any(&|g: &DiagramInput| g.edges.iter().any(|e| e.minlen > 1)));
    assert!(any(&|g: &DiagramInput| g.nodes.iter().any(|n| n.parent.is_some())));
    assert!(any(&|g: &DiagramInput| {
        g.nodes.iter().any(|n| n.parent.as_deref() == Some("s1"))
    }));
}

#[test]
fn every_edge_respects_its_minimum_length() {
    for_each_layout(|name, input, opts, r| {
        let factor = match opts.engine {
            Engine::Dagre => 2,
            Engine::Elk => 1,
        };
        for e in &r.edges {
            if e.source == e.target {
                continue;
            }
            let (lo, hi) = if e.reversed {
                (&e.target, &e.source)
            } else {
                (&e.source, &e.target)
            };
            let minlen = input.edges[e.index].minlen as i32 * factor;
            assert!(
                rank_of(r, hi) - rank_of(r, lo) >= minlen,
                "{name}: edge {} violates minlen with {opts:?}",
                e.index
            );
        }
    });
}

#[test]
fn nodes_on_one_rank_share_y_and_keep_separation() {
    for_each_layout(|name, _, opts, r| {
        for (i, a) in r.nodes.iter().enumerate() {
            for b in &r.nodes[i + 1..] {
                if a.rank != b.rank {
                    continue;
                }
                assert_eq!(a.y, b.y, "{name}: {} and {}", a.id, b.id);
                let gap = (a.x - b.x).abs();
                let needed = (a.width + b.width) / 2.0 + opts.spacing.node_sep;
                assert!(
                    gap + 1e-6 >= needed,
                    "{name}: {} and {} overlap ({gap} < {needed}) with {opts:?}",
                    a.id,
                    b.id
                );
            }
        }
    });
}

#[test]
fn ranks_map_to_increasing_y() {
    for_each_layout(|name, _, opts, r| {
        for a in &r.nodes {
            for b in &r.nodes {
                if a.rank < b.rank {
                    assert!(a.y < b.y, "{name}: {} above {} with {opts:?}", b.id, a.id);
                }
            }
        }
    });
}

#[test]
fn layout_is_deterministic() {
    for (name, input) in corpus() {
        for opts in variants() {
            let first = sirenia::layout(&input, &opts.clone().with_trace(true)).unwrap();
            let second = sirenia::layout(&input, &opts.with_trace(true)).unwrap();
            assert_eq!(first, second, "{name}");
            assert_eq!(first.trace_text(), second.trace_text(), "{name}");
        }
    }
}

#[test]
fn every_input_edge_comes_back_once_in_order() {
    for_each_layout(|name, input, _, r| {
        let indices: Vec<usize> = r.edges.iter().map(|e| e.index).collect();
        assert_eq!(indices, (0..input.edges.len()).collect::<Vec<_>>(), "{name}");
        for (e, declared) in r.edges.iter().zip(&input.edges) {
            assert_eq!(e.source, declared.source, "{name}");
            assert_eq!(e.target, declared.target, "{name}");
            assert!(e.points.len() >= 2, "{name}: edge {}", e.index);
            assert!(e.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()), "{name}");
        }
    });
}

#[test]
fn drawing_fits_the_reported_size() {
    for_each_layout(|name, _, _, r| {
        for n in &r.nodes {
            assert!(n.x - n.width / 2.0 >= -1e-6, "{name}: {}", n.id);
            assert!(n.y - n.height / 2.0 >= -1e-6, "{name}: {}", n.id);
            assert!(n.x + n.width / 2.0 <= r.width + 1e-6, "{name}: {}", n.id);
            assert!(n.y + n.height / 2.0 <= r.height + 1e-6, "{name}: {}", n.id);
        }
    });
}
