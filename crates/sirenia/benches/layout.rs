use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sirenia::{DiagramInput, LayoutOptions};
use std::hint::black_box;
use std::time::Duration;

/// Layered DAG with a spine, short forward edges, a few long edges and one back edge per block
/// of ten nodes.
fn dag(node_count: usize, fanout: usize) -> DiagramInput {
    let mut input = DiagramInput::new();
    for i in 0..node_count {
        input = input.node(format!("n{i}"), 60.0 + (i % 3) as f64 * 20.0, 30.0);
    }
    for i in 0..node_count {
        for k in 1..=fanout {
            if i + k < node_count {
                input = input.edge(format!("n{i}"), format!("n{}", i + k));
            }
        }
        if i + 7 < node_count {
            input = input.labeled_edge(format!("n{i}"), format!("n{}", i + 7), 24.0, 12.0);
        }
        if i % 10 == 9 {
            input = input.edge(format!("n{i}"), format!("n{}", i - 9));
        }
    }
    input
}

/// Same shape, with every block of ten nodes wrapped in a subgraph.
fn clustered(node_count: usize) -> DiagramInput {
    let mut input = DiagramInput::new();
    for c in 0..node_count.div_ceil(10) {
        input = input.node(format!("c{c}"), 0.0, 0.0);
    }
    for i in 0..node_count {
        input = input.child(format!("n{i}"), format!("c{}", i / 10), 60.0, 30.0);
    }
    for i in 0..node_count.saturating_sub(1) {
        input = input.edge(format!("n{i}"), format!("n{}", i + 1));
        if i + 3 < node_count {
            input = input.edge(format!("n{i}"), format!("n{}", i + 3));
        }
    }
    input
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("dag_30_f2", dag(30, 2)),
        ("dag_120_f3", dag(120, 3)),
        ("clustered_60", clustered(60)),
    ];
    let engines = [
        ("dagre", LayoutOptions::default()),
        ("elk", LayoutOptions::elk()),
    ];

    for (name, input) in &cases {
        for (engine, opts) in &engines {
            group.bench_with_input(BenchmarkId::new(*engine, name), input, |b, input| {
                b.iter(|| {
                    let r = sirenia::layout(black_box(input), opts).unwrap();
                    black_box(r.width);
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
