//! Layout configuration.
//!
//! All strategy choices are plain enums resolved once per layout call. Options deserialize from
//! camelCase JSON so tooling can pass tuning overrides without recompiling.

use crate::error::{Error, Result};
use crate::model::RankDir;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub direction: RankDir,
    pub spacing: Spacing,
    pub engine: Engine,
    pub ranker: Ranker,
    pub acyclicer: Acyclicer,
    pub order: OrderOptions,
    pub placement: PlacementOptions,
    /// Collect the line-oriented diagnostic trace into the result.
    pub trace: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: RankDir::TB,
            spacing: Spacing::default(),
            engine: Engine::Dagre,
            ranker: Ranker::NetworkSimplex,
            acyclicer: Acyclicer::Dfs,
            order: OrderOptions::default(),
            placement: PlacementOptions::default(),
            trace: false,
        }
    }
}

impl LayoutOptions {
    /// Defaults tuned for the ELK-style engine: two-sided greedy switching after every layer
    /// sort and several randomized restarts.
    pub fn elk() -> Self {
        Self {
            engine: Engine::Elk,
            order: OrderOptions {
                refinement: Refinement::GreedySwitchTwoSided,
                trials: 7,
                ..OrderOptions::default()
            },
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_direction(mut self, direction: RankDir) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Spacing {
    pub node_sep: f64,
    pub rank_sep: f64,
    pub edge_sep: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            node_sep: 50.0,
            rank_sep: 50.0,
            edge_sep: 20.0,
            margin_x: 0.0,
            margin_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    #[default]
    Dagre,
    Elk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Acyclicer {
    #[default]
    Dfs,
    Greedy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepKernel {
    #[default]
    Barycenter,
    NeighborMedian,
    EdgeSlot,
    PortRank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Continuation {
    /// Stop once `window` consecutive passes brought no strict improvement.
    Lookback { window: usize },
    /// Run exactly `max_passes` passes.
    Exhaustive,
    /// Stop at the first pass that does not strictly improve.
    FirstStall,
}

impl Default for Continuation {
    fn default() -> Self {
        Continuation::Lookback { window: 4 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Refinement {
    #[default]
    None,
    GreedySwitch,
    GreedySwitchTwoSided,
    Transpose,
}

/// Brandes–Köpf alignment selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BkAlign {
    Ul,
    Ur,
    Dl,
    Dr,
    Balanced,
}

impl BkAlign {
    pub fn key(self) -> &'static str {
        match self {
            BkAlign::Ul => "ul",
            BkAlign::Ur => "ur",
            BkAlign::Dl => "dl",
            BkAlign::Dr => "dr",
            BkAlign::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderOptions {
    pub kernel: SweepKernel,
    pub continuation: Continuation,
    pub refinement: Refinement,
    /// Number of independent ordering trials; trial 0 always starts from the DFS order.
    pub trials: usize,
    /// Hard cap on sweep passes per trial. `None` leaves termination to `continuation`,
    /// except for `Exhaustive`, which then runs [`OrderOptions::DEFAULT_EXHAUSTIVE_PASSES`].
    pub max_passes: Option<usize>,
    /// Weight of model-order inversions in the candidate score. Zero disables the term.
    pub model_order_influence: f64,
}

impl OrderOptions {
    pub const DEFAULT_EXHAUSTIVE_PASSES: usize = 24;
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            kernel: SweepKernel::Barycenter,
            continuation: Continuation::default(),
            refinement: Refinement::None,
            trials: 1,
            max_passes: None,
            model_order_influence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementOptions {
    /// Fixed alignment. `None` balances (dagre) or picks the narrowest layout (ELK).
    pub align: Option<BkAlign>,
}

macro_rules! impl_from_str {
    ($ty:ident, $kind:literal, { $($name:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    _ => Err(Error::UnknownStrategy {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_str!(Engine, "engine", {
    "dagre" => Engine::Dagre,
    "elk" => Engine::Elk,
});

impl_from_str!(Ranker, "ranker", {
    "network-simplex" => Ranker::NetworkSimplex,
    "tight-tree" => Ranker::TightTree,
    "longest-path" => Ranker::LongestPath,
});

impl_from_str!(Acyclicer, "acyclicer", {
    "dfs" => Acyclicer::Dfs,
    "greedy" => Acyclicer::Greedy,
});

impl_from_str!(SweepKernel, "kernel", {
    "barycenter" => SweepKernel::Barycenter,
    "neighbor-median" => SweepKernel::NeighborMedian,
    "edge-slot" => SweepKernel::EdgeSlot,
    "port-rank" => SweepKernel::PortRank,
});

impl_from_str!(Refinement, "refinement", {
    "none" => Refinement::None,
    "greedy-switch" => Refinement::GreedySwitch,
    "greedy-switch-two-sided" => Refinement::GreedySwitchTwoSided,
    "transpose" => Refinement::Transpose,
});

impl_from_str!(BkAlign, "alignment", {
    "ul" => BkAlign::Ul,
    "ur" => BkAlign::Ur,
    "dl" => BkAlign::Dl,
    "dr" => BkAlign::Dr,
    "balanced" => BkAlign::Balanced,
});

impl FromStr for Continuation {
    type Err = Error;

    /// Accepts `lookback`, `lookback:<window>`, `exhaustive` and `first-stall`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        let unknown = || Error::UnknownStrategy {
            kind: "continuation",
            value: s.to_string(),
        };
        match normalized.split_once(':') {
            Some(("lookback", window)) => window
                .parse::<usize>()
                .map(|window| Continuation::Lookback { window })
                .map_err(|_| unknown()),
            Some(_) => Err(unknown()),
            None => match normalized.as_str() {
                "lookback" => Ok(Continuation::default()),
                "exhaustive" => Ok(Continuation::Exhaustive),
                "first-stall" => Ok(Continuation::FirstStall),
                _ => Err(unknown()),
            },
        }
    }
}
