//! Brandes & Köpf horizontal coordinate assignment.
//!
//! Brandes and Köpf, "Fast and Simple Horizontal Coordinate Assignment". Four alignments are
//! computed (up/down neighbors crossed with left/right sweeps), aligned to the narrowest one and
//! balanced. Coordinates are kept in dense vectors indexed by node slot.

use crate::model::{BorderType, LabelPos, LayoutGraph};
use crate::options::BkAlign;
use crate::trace::{Trace, TraceRecord};
use crate::util;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use sirenia_graph::NodeIx;

/// Alignments in the order ties are broken.
pub const DIRECTIONS: [BkAlign; 4] = [BkAlign::Ul, BkAlign::Ur, BkAlign::Dl, BkAlign::Dr];

pub(crate) fn is_up(dir: BkAlign) -> bool {
    matches!(dir, BkAlign::Ul | BkAlign::Ur)
}

pub(crate) fn is_right(dir: BkAlign) -> bool {
    matches!(dir, BkAlign::Ur | BkAlign::Dr)
}

/// Unordered node pairs whose edge must not be used for alignment.
#[derive(Debug, Clone, Default)]
pub struct Conflicts(HashSet<(NodeIx, NodeIx)>);

impl Conflicts {
    fn key(v: NodeIx, w: NodeIx) -> (NodeIx, NodeIx) {
        if v <= w { (v, w) } else { (w, v) }
    }

    pub fn add(&mut self, v: NodeIx, w: NodeIx) {
        self.0.insert(Self::key(v, w));
    }

    pub fn has(&self, v: NodeIx, w: NodeIx) -> bool {
        self.0.contains(&Self::key(v, w))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: Conflicts) {
        self.0.extend(other.0);
    }
}

fn order(g: &LayoutGraph, v: NodeIx) -> usize {
    g.node(v).order.unwrap_or(0)
}

fn is_dummy(g: &LayoutGraph, v: NodeIx) -> bool {
    g.node(v).is_dummy()
}

fn other_inner_segment_node(g: &LayoutGraph, v: NodeIx) -> Option<NodeIx> {
    if !is_dummy(g, v) {
        return None;
    }
    g.predecessors(v).into_iter().find(|&u| is_dummy(g, u))
}

/// Type-1 conflicts: a non-inner segment crossing an inner segment (dummy to dummy).
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<NodeIx>]) -> Conflicts {
    let mut conflicts = Conflicts::default();
    for pair in layering.windows(2) {
        let (prev_layer, layer) = (&pair[0], &pair[1]);
        let mut k0 = 0usize;
        let mut scan_pos = 0usize;
        let last = layer.last().copied();

        for (idx, &v) in layer.iter().enumerate() {
            let w = other_inner_segment_node(g, v);
            let k1 = w.map_or(prev_layer.len(), |w| order(g, w));
            if w.is_none() && Some(v) != last {
                continue;
            }
            for &scan_node in &layer[scan_pos..=idx] {
                for u in g.predecessors(scan_node) {
                    let u_pos = order(g, u);
                    if (u_pos < k0 || k1 < u_pos) && !(is_dummy(g, u) && is_dummy(g, scan_node)) {
                        conflicts.add(u, scan_node);
                    }
                }
            }
            scan_pos = idx + 1;
            k0 = k1;
        }
    }
    conflicts
}

/// Type-2 conflicts: inner segments crossing subgraph border segments.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<NodeIx>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    let scan = |conflicts: &mut Conflicts,
                south: &[NodeIx],
                range: std::ops::Range<usize>,
                prev_north_border: Option<isize>,
                next_north_border: Option<isize>| {
        for &v in &south[range] {
            if !is_dummy(g, v) {
                continue;
            }
            for u in g.predecessors(v) {
                if !is_dummy(g, u) {
                    continue;
                }
                let u_order = order(g, u) as isize;
                let before = prev_north_border.is_some_and(|b| u_order < b);
                let after = next_north_border.is_some_and(|b| u_order > b);
                if before || after {
                    conflicts.add(u, v);
                }
            }
        }
    };

    for pair in layering.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);
        let mut prev_north_pos: Option<isize> = Some(-1);
        let mut next_north_pos: Option<isize> = None;
        let mut south_pos = 0usize;

        for (lookahead, &v) in south.iter().enumerate() {
            if g.node(v).dummy == Some(crate::model::Dummy::Border) {
                if let Some(&u) = g.predecessors(v).first() {
                    next_north_pos = Some(order(g, u) as isize);
                    scan(
                        &mut conflicts,
                        south,
                        south_pos..lookahead,
                        prev_north_pos,
                        next_north_pos,
                    );
                    south_pos = lookahead;
                    prev_north_pos = next_north_pos;
                }
            }
            scan(
                &mut conflicts,
                south,
                south_pos..south.len(),
                next_north_pos,
                Some(north.len() as isize),
            );
        }
    }
    conflicts
}

/// Block membership: `root[v]` is the top of v's block, `align[v]` the next node down the block
/// (the last node points back at the root). `upper[v]` is the node v was aligned under.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub root: Vec<NodeIx>,
    pub align: Vec<NodeIx>,
    pub upper: Vec<Option<NodeIx>>,
}

pub fn vertical_alignment<F>(
    g: &LayoutGraph,
    layering: &[Vec<NodeIx>],
    conflicts: &Conflicts,
    neighbors: F,
) -> Alignment
where
    F: Fn(NodeIx) -> Vec<NodeIx>,
{
    let n = g.node_bound();
    let mut root: Vec<NodeIx> = (0..n).map(NodeIx::new).collect();
    let mut align = root.clone();
    let mut upper: Vec<Option<NodeIx>> = vec![None; n];
    let mut pos = vec![usize::MAX; n];
    for layer in layering {
        for (i, &v) in layer.iter().enumerate() {
            pos[v.index()] = i;
        }
    }

    for layer in layering {
        let mut prev_idx: Option<usize> = None;
        for &v in layer {
            let mut ws = neighbors(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos[w.index()]);
            let mp = (ws.len() - 1) as f64 / 2.0;
            let (lo, hi) = (mp.floor() as usize, mp.ceil() as usize);
            for &w in &ws[lo..=hi] {
                let w_pos = pos[w.index()];
                if align[v.index()] == v
                    && prev_idx.is_none_or(|p| p < w_pos)
                    && !conflicts.has(v, w)
                {
                    align[w.index()] = v;
                    let r = root[w.index()];
                    align[v.index()] = r;
                    root[v.index()] = r;
                    upper[v.index()] = Some(w);
                    prev_idx = Some(w_pos);
                }
            }
        }
    }
    Alignment { root, align, upper }
}

/// Separation between the centers of `v` and its left neighbor `w`.
pub fn sep(g: &LayoutGraph, v: NodeIx, w: NodeIx, reverse_sep: bool) -> f64 {
    let (vl, wl) = (g.node(v), g.node(w));
    let graph = g.graph();
    let flip = |delta: f64| if reverse_sep { delta } else { -delta };

    let mut sum = vl.width / 2.0;
    sum += flip(match vl.labelpos {
        LabelPos::L => -vl.width / 2.0,
        LabelPos::R => vl.width / 2.0,
        LabelPos::C => 0.0,
    });
    sum += (if vl.is_dummy() { graph.edgesep } else { graph.nodesep }) / 2.0;
    sum += (if wl.is_dummy() { graph.edgesep } else { graph.nodesep }) / 2.0;
    sum += wl.width / 2.0;
    sum += flip(match wl.labelpos {
        LabelPos::L => wl.width / 2.0,
        LabelPos::R => -wl.width / 2.0,
        LabelPos::C => 0.0,
    });
    sum
}

/// Graph over block roots; an edge `a -> b` means block `b` sits right of block `a` by at least
/// the edge weight.
#[derive(Debug, Default)]
struct BlockGraph {
    nodes: Vec<NodeIx>,
    slot: HashMap<NodeIx, usize>,
    edges: Vec<(usize, usize, f64)>,
    edge_ix: HashMap<(usize, usize), usize>,
    ins: Vec<Vec<usize>>,
    outs: Vec<Vec<usize>>,
    preds: Vec<Vec<usize>>,
    succs: Vec<Vec<usize>>,
}

impl BlockGraph {
    fn ensure(&mut self, v: NodeIx) -> usize {
        if let Some(&s) = self.slot.get(&v) {
            return s;
        }
        let s = self.nodes.len();
        self.nodes.push(v);
        self.slot.insert(v, s);
        self.ins.push(Vec::new());
        self.outs.push(Vec::new());
        self.preds.push(Vec::new());
        self.succs.push(Vec::new());
        s
    }

    fn set_max_edge(&mut self, a: usize, b: usize, weight: f64) {
        match self.edge_ix.get(&(a, b)) {
            Some(&e) => {
                let w = &mut self.edges[e].2;
                *w = w.max(weight);
            }
            None => {
                let e = self.edges.len();
                self.edges.push((a, b, weight));
                self.edge_ix.insert((a, b), e);
                self.outs[a].push(e);
                self.ins[b].push(e);
                self.succs[a].push(b);
                self.preds[b].push(a);
            }
        }
    }
}

fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<NodeIx>],
    root: &[NodeIx],
    reverse_sep: bool,
    shift: Option<&[f64]>,
) -> BlockGraph {
    let shift_of = |v: NodeIx| shift.map_or(0.0, |s| s[v.index()]);
    let mut bg = BlockGraph::default();
    for layer in layering {
        let mut prev: Option<NodeIx> = None;
        for &v in layer {
            let v_root = bg.ensure(root[v.index()]);
            if let Some(u) = prev {
                let u_root = bg.ensure(root[u.index()]);
                let weight = sep(g, v, u, reverse_sep) + shift_of(u) - shift_of(v);
                bg.set_max_edge(u_root, v_root, weight);
            }
            prev = Some(v);
        }
    }
    bg
}

fn iterate<N, S>(n: usize, next: N, mut set: S)
where
    N: Fn(usize) -> Vec<usize>,
    S: FnMut(usize),
{
    let mut stack: Vec<usize> = (0..n).collect();
    let mut visited = vec![false; n];
    while let Some(elem) = stack.pop() {
        if visited[elem] {
            set(elem);
            continue;
        }
        visited[elem] = true;
        stack.push(elem);
        stack.extend(next(elem));
    }
}

/// Block coordinates by longest path over the block graph: first the smallest coordinates, then
/// every block is pulled right as far as its successors allow. Node `v` ends at its block's
/// coordinate plus `shift[v]`.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<NodeIx>],
    alignment: &Alignment,
    reverse_sep: bool,
    shift: Option<&[f64]>,
) -> Vec<f64> {
    let bg = build_block_graph(g, layering, &alignment.root, reverse_sep, shift);
    let n = bg.nodes.len();
    let mut xs = vec![0.0_f64; n];
    let border_type = if reverse_sep {
        BorderType::Left
    } else {
        BorderType::Right
    };

    iterate(
        n,
        |elem| bg.preds[elem].clone(),
        |elem| {
            let best = bg.ins[elem]
                .iter()
                .map(|&e| {
                    let (a, _, w) = bg.edges[e];
                    xs[a] + w
                })
                .fold(0.0_f64, f64::max);
            xs[elem] = best;
        },
    );

    iterate(
        n,
        |elem| bg.succs[elem].clone(),
        |elem| {
            let min = bg.outs[elem]
                .iter()
                .map(|&e| {
                    let (_, b, w) = bg.edges[e];
                    xs[b] - w
                })
                .fold(f64::INFINITY, f64::min);
            if min.is_finite() && g.node(bg.nodes[elem]).border_type != Some(border_type) {
                xs[elem] = xs[elem].max(min);
            }
        },
    );

    let mut out = vec![0.0_f64; g.node_bound()];
    for layer in layering {
        for &v in layer {
            let block = bg.slot.get(&alignment.root[v.index()]).copied();
            let base = block.map_or(0.0, |s| xs[s]);
            out[v.index()] = base + shift.map_or(0.0, |s| s[v.index()]);
        }
    }
    out
}

/// Layering as seen by one alignment direction.
pub(crate) fn adjust_layering(layering: &[Vec<NodeIx>], dir: BkAlign) -> Vec<Vec<NodeIx>> {
    let mut adjusted: Vec<Vec<NodeIx>> = if is_up(dir) {
        layering.to_vec()
    } else {
        layering.iter().rev().cloned().collect()
    };
    if is_right(dir) {
        for layer in &mut adjusted {
            layer.reverse();
        }
    }
    adjusted
}

pub(crate) fn block_sizes(layering: &[Vec<NodeIx>], alignment: &Alignment) -> Vec<usize> {
    let mut sizes: Vec<(NodeIx, usize)> = Vec::new();
    let mut slot: HashMap<NodeIx, usize> = HashMap::default();
    for &v in layering.iter().flatten() {
        let r = alignment.root[v.index()];
        match slot.get(&r) {
            Some(&s) => sizes[s].1 += 1,
            None => {
                slot.insert(r, sizes.len());
                sizes.push((r, 1));
            }
        }
    }
    sizes.into_iter().map(|(_, n)| n).collect()
}

pub fn layout_width(g: &LayoutGraph, nodes: &[NodeIx], xs: &[f64]) -> f64 {
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    for &v in nodes {
        let half = g.node(v).width / 2.0;
        max = max.max(xs[v.index()] + half);
        min = min.min(xs[v.index()] - half);
    }
    max - min
}

/// Index into `xss` of the narrowest layout; the first one wins ties.
pub fn find_smallest_width_alignment(
    g: &LayoutGraph,
    nodes: &[NodeIx],
    xss: &[(BkAlign, Vec<f64>)],
) -> usize {
    let mut best = 0usize;
    let mut best_width = f64::INFINITY;
    for (i, (_, xs)) in xss.iter().enumerate() {
        let w = layout_width(g, nodes, xs);
        if w < best_width {
            best_width = w;
            best = i;
        }
    }
    best
}

fn min_max(nodes: &[NodeIx], xs: &[f64]) -> (f64, f64) {
    nodes.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        let x = xs[v.index()];
        (lo.min(x), hi.max(x))
    })
}

/// Shifts left-biased layouts to share the minimum of `xss[align_to]` and right-biased ones to
/// share its maximum.
pub fn align_coordinates(nodes: &[NodeIx], xss: &mut [(BkAlign, Vec<f64>)], align_to: usize) {
    let (to_min, to_max) = min_max(nodes, &xss[align_to].1);
    for (i, (dir, xs)) in xss.iter_mut().enumerate() {
        if i == align_to {
            continue;
        }
        let (lo, hi) = min_max(nodes, xs);
        let delta = if is_right(*dir) { to_max - hi } else { to_min - lo };
        if delta != 0.0 {
            for &v in nodes {
                xs[v.index()] += delta;
            }
        }
    }
}

/// Average of the two median candidates, or the coordinates of a fixed alignment.
pub fn balance(
    nodes: &[NodeIx],
    xss: &[(BkAlign, Vec<f64>)],
    align: Option<BkAlign>,
) -> Vec<(NodeIx, f64)> {
    let fixed = align.and_then(|a| xss.iter().find(|(d, _)| *d == a));
    nodes
        .iter()
        .map(|&v| {
            if let Some((_, xs)) = fixed {
                return (v, xs[v.index()]);
            }
            let mut vals: Vec<f64> = xss.iter().map(|(_, xs)| xs[v.index()]).collect();
            vals.sort_by(f64::total_cmp);
            let x = match vals.len() {
                0 => 0.0,
                n if n >= 4 => (vals[1] + vals[2]) / 2.0,
                n => vals[n / 2],
            };
            (v, x)
        })
        .collect()
}

pub fn position_x(g: &LayoutGraph, align: Option<BkAlign>, trace: &mut Trace) -> Vec<(NodeIx, f64)> {
    let layering = util::build_layer_matrix(g);
    let nodes: Vec<NodeIx> = layering.iter().flatten().copied().collect();
    if nodes.is_empty() {
        return Vec::new();
    }
    let mut conflicts = find_type1_conflicts(g, &layering);
    conflicts.extend(find_type2_conflicts(g, &layering));

    let mut xss: Vec<(BkAlign, Vec<f64>)> = Vec::with_capacity(DIRECTIONS.len());
    for dir in DIRECTIONS {
        let adjusted = adjust_layering(&layering, dir);
        let alignment = vertical_alignment(g, &adjusted, &conflicts, |v| {
            if is_up(dir) {
                g.predecessors(v)
            } else {
                g.successors(v)
            }
        });
        trace.push(|| TraceRecord::BkBlocks {
            align: dir.key(),
            sizes: block_sizes(&adjusted, &alignment),
        });
        let mut xs = horizontal_compaction(g, &adjusted, &alignment, is_right(dir), None);
        if is_right(dir) {
            for &v in &nodes {
                xs[v.index()] = -xs[v.index()];
            }
        }
        trace.push(|| TraceRecord::BkWidth {
            align: dir.key(),
            width: layout_width(g, &nodes, &xs),
        });
        xss.push((dir, xs));
    }

    let smallest = find_smallest_width_alignment(g, &nodes, &xss);
    tracing::debug!(
        conflicts = conflicts.len(),
        smallest = xss[smallest].0.key(),
        "bk alignments"
    );
    align_coordinates(&nodes, &mut xss, smallest);
    let fixed = align.filter(|a| *a != BkAlign::Balanced);
    balance(&nodes, &xss, fixed)
}
