//! Rank balancing for the ELK-style engine.
//!
//! After network simplex, a node whose incoming weight equals its outgoing weight can sit on any
//! rank between its tightest predecessor and successor constraints without changing the
//! objective. Such nodes move to the least populated rank in that range, which evens out layer
//! widths. Only strictly less crowded ranks are taken; ties keep the current rank.

use super::problem::RankProblem;

pub fn balance(p: &mut RankProblem) {
    let n = p.len();
    if n == 0 {
        return;
    }
    let min = p.rank.iter().copied().min().unwrap_or(0);
    let max = p.rank.iter().copied().max().unwrap_or(0);
    let mut filling = vec![0usize; (max - min + 1) as usize];
    for &r in &p.rank {
        filling[(r - min) as usize] += 1;
    }

    for v in 0..n {
        let in_weight: i64 = p.inc[v].iter().map(|&e| p.edges[e].weight).sum();
        let out_weight: i64 = p.out[v].iter().map(|&e| p.edges[e].weight).sum();
        if in_weight != out_weight || (p.inc[v].is_empty() && p.out[v].is_empty()) {
            continue;
        }

        let mut low = min;
        let mut high = max;
        for &e in &p.inc[v] {
            let edge = p.edges[e];
            low = low.max(p.rank[edge.v] + edge.minlen);
        }
        for &e in &p.out[v] {
            let edge = p.edges[e];
            high = high.min(p.rank[edge.w] - edge.minlen);
        }

        let current = p.rank[v];
        let mut best = current;
        for r in low..=high {
            if filling[(r - min) as usize] < filling[(best - min) as usize] {
                best = r;
            }
        }
        if best != current {
            filling[(current - min) as usize] -= 1;
            filling[(best - min) as usize] += 1;
            p.rank[v] = best;
        }
    }
}
