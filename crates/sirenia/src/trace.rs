//! Line-oriented diagnostic trace.
//!
//! Records are data handed back to the caller in [`crate::LayoutResult::trace`], one
//! tab-separated line per record. Kind names and field order are stable so external tooling can
//! diff two runs line by line.

use serde::Serialize;
use std::fmt;

/// Layout phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Built,
    CycleBroken,
    Ranked,
    Normalized,
    Ordered,
    Placed,
    Finalized,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Built => "built",
            Phase::CycleBroken => "cycle-broken",
            Phase::Ranked => "ranked",
            Phase::Normalized => "normalized",
            Phase::Ordered => "ordered",
            Phase::Placed => "placed",
            Phase::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TraceRecord {
    Phase {
        phase: Phase,
    },
    Edge {
        index: usize,
        source: String,
        target: String,
        reversed: bool,
    },
    SelfLoop {
        index: usize,
        node: String,
    },
    Rank {
        node: String,
        rank: i32,
    },
    Layer {
        stage: &'static str,
        rank: usize,
        nodes: Vec<String>,
    },
    Sweep {
        trial: usize,
        pass: usize,
        down: bool,
        bias_right: bool,
        crossings: u64,
        best: u64,
    },
    Order {
        node: String,
        rank: i32,
        order: usize,
    },
    BkBlocks {
        align: &'static str,
        sizes: Vec<usize>,
    },
    BkWidth {
        align: &'static str,
        width: f64,
    },
    Pos {
        node: String,
        x: f64,
        y: f64,
    },
}

fn flag(b: bool) -> u8 {
    u8::from(b)
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceRecord::Phase { phase } => write!(f, "PHASE\t{phase}"),
            TraceRecord::Edge {
                index,
                source,
                target,
                reversed,
            } => write!(f, "EDGE\t{index}\t{source}\t{target}\t{}", flag(*reversed)),
            TraceRecord::SelfLoop { index, node } => write!(f, "SELFLOOP\t{index}\t{node}"),
            TraceRecord::Rank { node, rank } => write!(f, "RANK\t{node}\t{rank}"),
            TraceRecord::Layer { stage, rank, nodes } => {
                write!(f, "LAYER\t{stage}\t{rank}\t{}", nodes.join(","))
            }
            TraceRecord::Sweep {
                trial,
                pass,
                down,
                bias_right,
                crossings,
                best,
            } => write!(
                f,
                "SWEEP\t{trial}\t{pass}\t{}\t{}\t{crossings}\t{best}",
                if *down { "down" } else { "up" },
                flag(*bias_right)
            ),
            TraceRecord::Order { node, rank, order } => {
                write!(f, "ORDER\t{node}\t{rank}\t{order}")
            }
            TraceRecord::BkBlocks { align, sizes } => {
                let sizes: Vec<String> = sizes.iter().map(|s| s.to_string()).collect();
                write!(f, "BKBLOCKS\t{align}\t{}\t{}", sizes.len(), sizes.join(","))
            }
            TraceRecord::BkWidth { align, width } => write!(f, "BKWIDTH\t{align}\t{width}"),
            TraceRecord::Pos { node, x, y } => write!(f, "POS\t{node}\t{x}\t{y}"),
        }
    }
}

/// Collector threaded through the phases. Disabled collectors never build records.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    enabled: bool,
    phase: Option<Phase>,
    records: Vec<TraceRecord>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            phase: None,
            records: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Moves to `phase`. Phases only ever advance.
    pub fn enter(&mut self, phase: Phase) {
        debug_assert!(
            self.phase.is_none_or(|p| p < phase),
            "phase {phase} entered after {:?}",
            self.phase
        );
        self.phase = Some(phase);
        tracing::trace!(phase = phase.name(), "phase");
        self.push(|| TraceRecord::Phase { phase });
    }

    pub fn push(&mut self, record: impl FnOnce() -> TraceRecord) {
        if self.enabled {
            self.records.push(record());
        }
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TraceRecord> {
        self.records
    }

    /// All records, one line each.
    pub fn render(&self) -> String {
        render(&self.records)
    }
}

pub fn render(records: &[TraceRecord]) -> String {
    let mut out = String::new();
    for r in records {
        out.push_str(&r.to_string());
        out.push('\n');
    }
    out
}
