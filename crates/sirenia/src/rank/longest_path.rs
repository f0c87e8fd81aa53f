//! Longest-path initial ranking.
//!
//! Sinks get rank 0 and every other node sits `minlen` above its closest successor, so ranks are
//! non-positive and every edge is feasible but not necessarily tight.

use super::problem::RankProblem;

pub fn longest_path(p: &mut RankProblem) {
    let n = p.len();
    let mut visited = vec![false; n];
    let roots: Vec<usize> = p.sources().collect();

    for root in roots {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some((v, i)) = frames.last_mut() {
            let v = *v;
            if let Some(&e) = p.out[v].get(*i) {
                *i += 1;
                let w = p.edges[e].w;
                if !visited[w] {
                    visited[w] = true;
                    frames.push((w, 0));
                }
                continue;
            }
            let rank = p.out[v]
                .iter()
                .map(|&e| p.rank[p.edges[e].w] - p.edges[e].minlen)
                .min()
                .unwrap_or(0);
            p.rank[v] = rank;
            frames.pop();
        }
    }
}
