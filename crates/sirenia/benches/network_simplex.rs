use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use sirenia::rank::{self, RankProblem};
use sirenia::{Engine, Ranker};
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct ProblemSpec {
    node_count: usize,
    edges: Vec<(usize, usize, i32, i64)>,
}

impl ProblemSpec {
    fn build(&self) -> RankProblem {
        let mut p = RankProblem::new(self.node_count);
        for &(v, w, minlen, weight) in &self.edges {
            p.add_edge(v, w, minlen, weight);
        }
        p
    }
}

fn build_dag_spec(node_count: usize, fanout: usize) -> ProblemSpec {
    let mut edges = Vec::new();

    // A spine to guarantee connectivity.
    for i in 0..node_count.saturating_sub(1) {
        edges.push((i, i + 1, 1, 2));
    }

    // Extra forward edges to create slack.
    for i in 0..node_count {
        for k in 2..=(fanout + 1) {
            let to = i + k;
            if to >= node_count {
                break;
            }
            edges.push((i, to, 1, 1));
        }
        let to = i + 10;
        if to < node_count {
            edges.push((i, to, 2, 1));
        }
    }

    ProblemSpec { node_count, edges }
}

fn bench_network_simplex(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_simplex");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("dag_50_f3", 50usize, 3usize),
        ("dag_200_f4", 200, 4),
        ("dag_400_f4", 400, 4),
    ];

    for (name, nodes, fanout) in cases {
        let spec = build_dag_spec(nodes, fanout);
        group.bench_with_input(BenchmarkId::new("dagre", name), &spec, |b, spec| {
            b.iter_batched(
                || spec.build(),
                |mut p| {
                    rank::solve(black_box(&mut p), Ranker::NetworkSimplex, Engine::Dagre);
                    black_box(p.rank.len());
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("elk", name), &spec, |b, spec| {
            b.iter_batched(
                || spec.build(),
                |mut p| {
                    rank::solve(black_box(&mut p), Ranker::NetworkSimplex, Engine::Elk);
                    black_box(p.rank.len());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_network_simplex);
criterion_main!(benches);
