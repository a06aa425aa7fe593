use std::fmt::Debug;

use ndarray::{parallel::prelude::*, Axis};

use crate::utils::math::Matrix;
use crate::utils::sort::top_k_by_score;
use crate::vectorizer::corpus::DocId;

/// Ranked peers of one document
#[derive(Clone, Default, PartialEq)]
pub struct Hits {
    /// (peer document, score), best first
    pub list: Vec<(DocId, f64)>,
}

impl Hits {
    pub fn new(list: Vec<(DocId, f64)>) -> Self {
        Hits { list }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (DocId, f64)> {
        self.list.iter()
    }

    pub fn peers(&self) -> Vec<DocId> {
        self.list.iter().map(|(peer, _)| *peer).collect()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for (peer, score) in &self.list {
                writeln!(f, "    {}: {:.6}", peer, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// Filtering and truncation applied to every correlation row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingOptions {
    pub max_count: usize,
    pub min_score: f64,
    pub include_self: bool,
}

/// Top peers for every document
///
/// Per row: keep scores `>= min_score` (NaN never passes), then take the
/// best `min(max_count, documents)` with ties going to the lower document
/// index. The document itself is skipped unless `include_self` is set.
pub fn select_top_k(correlation: &Matrix, opts: &RankingOptions) -> Vec<Hits> {
    let k = opts.max_count.min(correlation.nrows());
    correlation
        .axis_iter(Axis(0))
        .into_par_iter()
        .enumerate()
        .map(|(doc, row)| {
            let candidates = row
                .iter()
                .copied()
                .enumerate()
                .filter(|(peer, score)| (opts.include_self || *peer != doc) && *score >= opts.min_score);
            Hits::new(top_k_by_score(candidates, k))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn opts(max_count: usize, min_score: f64) -> RankingOptions {
        RankingOptions {
            max_count,
            min_score,
            include_self: false,
        }
    }

    fn corr() -> Matrix {
        array![
            [0.0, 0.8, 0.1, 0.8],
            [0.8, 0.0, 0.3, 0.2],
            [0.1, 0.3, 0.0, 0.6],
            [0.8, 0.2, 0.6, 0.0]
        ]
    }

    #[test]
    fn best_peers_first() {
        let hits = select_top_k(&corr(), &opts(2, -10.0));
        assert_eq!(hits[1].list, vec![(0, 0.8), (2, 0.3)]);
        assert_eq!(hits[2].list, vec![(3, 0.6), (1, 0.3)]);
    }

    #[test]
    fn ties_go_to_lower_index() {
        let hits = select_top_k(&corr(), &opts(1, -10.0));
        assert_eq!(hits[0].list, vec![(1, 0.8)]);
    }

    #[test]
    fn respects_floor_and_count() {
        let hits = select_top_k(&corr(), &opts(3, 0.5));
        for (doc, h) in hits.iter().enumerate() {
            assert!(h.len() <= 3);
            assert!(h.iter().all(|(peer, s)| *s >= 0.5 && *peer != doc));
            assert!(h.list.windows(2).all(|w| w[0].1 >= w[1].1));
        }
        assert_eq!(hits[0].peers(), vec![1, 3]);
        assert_eq!(hits[1].peers(), vec![0]);
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(select_top_k(&corr(), &opts(0, -10.0)).iter().all(Hits::is_empty));
    }

    #[test]
    fn self_included_only_on_request() {
        let with_self = RankingOptions {
            include_self: true,
            ..opts(4, 0.0)
        };
        let hits = select_top_k(&corr(), &with_self);
        assert_eq!(hits[1].list, vec![(0, 0.8), (2, 0.3), (3, 0.2), (1, 0.0)]);

        let hits = select_top_k(&corr(), &opts(4, 0.0));
        assert!(!hits[1].peers().contains(&1));
        assert_eq!(hits[1].len(), 3);
    }

    #[test]
    fn nan_scores_are_dropped() {
        let m = array![[0.0, f64::NAN], [f64::NAN, 0.0]];
        let hits = select_top_k(&m, &opts(5, -10.0));
        assert!(hits.iter().all(Hits::is_empty));
    }

    #[test]
    fn pretty_debug() {
        let h = Hits::new(vec![(2, 0.5)]);
        assert_eq!(format!("{:?}", h), "[(2, 0.5)]");
        assert_eq!(format!("{:#?}", h), "Hits [\n    2: 0.500000\n]");
    }
}
