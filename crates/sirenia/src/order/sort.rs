use super::resolve_conflicts::ResolvedEntry;
use sirenia_graph::NodeIx;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct SortResult {
    pub vs: Vec<NodeIx>,
    pub barycenter: Option<f64>,
    pub weight: f64,
}

/// Stable sort by value. Entries without a value are re-inserted at their original index.
pub fn sort(entries: Vec<ResolvedEntry>, bias_right: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<ResolvedEntry>, Vec<ResolvedEntry>) =
        entries.into_iter().partition(|e| e.barycenter.is_some());

    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| compare_with_bias(a, b, bias_right));

    let mut vs: Vec<NodeIx> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut vs_index = consume_unsortable(&mut vs, &mut unsortable, 0);

    for entry in sortable {
        vs_index += entry.vs.len();
        vs.extend(entry.vs);
        if let Some(bc) = entry.barycenter {
            sum += bc * entry.weight;
            weight += entry.weight;
        }
        vs_index = consume_unsortable(&mut vs, &mut unsortable, vs_index);
    }

    SortResult {
        vs,
        barycenter: (weight != 0.0).then(|| sum / weight),
        weight,
    }
}

fn consume_unsortable(
    vs: &mut Vec<NodeIx>,
    unsortable: &mut Vec<ResolvedEntry>,
    mut index: usize,
) -> usize {
    while unsortable.last().is_some_and(|last| last.i <= index) {
        let Some(last) = unsortable.pop() else {
            break;
        };
        vs.extend(last.vs);
        index += 1;
    }
    index
}

fn compare_with_bias(a: &ResolvedEntry, b: &ResolvedEntry, bias_right: bool) -> Ordering {
    let (x, y) = (a.barycenter.unwrap_or(0.0), b.barycenter.unwrap_or(0.0));
    if x < y {
        Ordering::Less
    } else if x > y {
        Ordering::Greater
    } else if bias_right {
        b.i.cmp(&a.i)
    } else {
        a.i.cmp(&b.i)
    }
}
