use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// (score, index) candidate ordered so that "greater" means "ranks earlier"
///
/// Higher score ranks earlier; on equal scores the lower index ranks earlier.
/// Scores are compared with `total_cmp`, callers filter NaN beforehand.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ranked {
    score: f64,
    index: usize,
}

impl Eq for Ranked {}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pick the `k` best `(index, score)` pairs with a bounded min-heap
///
/// The heap never holds more than `k` entries, so the cost is
/// O(n log k). The result is sorted best first: score descending, ties by
/// index ascending. Fewer than `k` candidates simply yields fewer entries.
pub fn top_k_by_score<I>(candidates: I, k: usize) -> Vec<(usize, f64)>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    if k == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Reverse<Ranked>> = BinaryHeap::with_capacity(k + 1);
    for (index, score) in candidates {
        let cand = Ranked { score, index };
        if heap.len() < k {
            heap.push(Reverse(cand));
        } else if let Some(Reverse(worst)) = heap.peek() {
            if cand > *worst {
                heap.pop();
                heap.push(Reverse(cand));
            }
        }
    }
    // ascending order of Reverse<_> is descending rank
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(r)| (r.index, r.score))
        .collect()
}
