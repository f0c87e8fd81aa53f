//! Rank assignment.
//!
//! Ranks are computed per weakly connected component of the leaf graph and every component is
//! shifted to start at rank 0. Components are never aligned against each other.

pub mod balance;
pub mod feasible_tree;
pub mod longest_path;
pub mod network_simplex;
pub mod problem;

use crate::model::LayoutGraph;
use crate::options::{Engine, Ranker};

pub use feasible_tree::feasible_tree;
pub use longest_path::longest_path;
pub use network_simplex::network_simplex;
pub use problem::{RankEdge, RankProblem};

/// Assigns `rank` to every leaf node of `g`.
pub fn rank(g: &mut LayoutGraph, ranker: Ranker, engine: Engine) {
    let problems = problem::build_components(g);
    tracing::debug!(components = problems.len(), ?ranker, "ranking");
    for mut p in problems {
        solve(&mut p, ranker, engine);
        problem::apply(g, &p);
    }
}

pub fn solve(p: &mut RankProblem, ranker: Ranker, engine: Engine) {
    match ranker {
        Ranker::NetworkSimplex => network_simplex(p),
        Ranker::TightTree => {
            longest_path(p);
            feasible_tree(p);
        }
        Ranker::LongestPath => longest_path(p),
    }
    if engine == Engine::Elk && ranker == Ranker::NetworkSimplex {
        balance::balance(p);
    }
    p.normalize();
}
