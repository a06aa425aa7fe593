use indexmap::IndexMap;
use ndarray::Zip;
use tracing::trace;

use crate::utils::math::{Matrix, MatrixOps, Vector};
use crate::vectorizer::corpus::Corpus;
use crate::vectorizer::token::{Linguistics, Normalizer};

/// Term counts per document plus each row's largest count
#[derive(Debug, Clone)]
pub struct BagOfWords {
    /// documents x vocabulary occurrence counts
    pub counts: Matrix,
    /// max of each `counts` row, tracked while counting
    pub row_max: Vector,
}

impl BagOfWords {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let docs = corpus.documents();
        let mut counts = Matrix::zeros((corpus.len(), corpus.vocab_size()));
        let mut row_max = Vector::zeros(corpus.len());
        Zip::indexed(counts.rows_mut())
            .and(&mut row_max)
            .par_for_each(|i, mut row, max| {
                for term in &docs[i].terms {
                    if let Some(j) = corpus.term_index(term) {
                        row[j] += 1.0;
                        if row[j] > *max {
                            *max = row[j];
                        }
                    }
                }
            });
        Self { counts, row_max }
    }

    #[inline]
    pub fn doc_num(&self) -> usize {
        self.counts.nrows()
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.counts.ncols()
    }
}

/// Per-term weights: 1.0 unless the config names the word
///
/// Words are keyed through the normalizer so "Running" overrides the stem
/// "run"; words that never occur in the corpus are ignored.
pub fn keyword_weights<L>(
    corpus: &Corpus,
    normalizer: &Normalizer<L>,
    overrides: &IndexMap<String, f64>,
) -> Vector
where
    L: Linguistics,
{
    let mut weights = Vector::ones(corpus.vocab_size());
    for (word, weight) in overrides {
        match normalizer
            .normalize_word(word)
            .and_then(|stem| corpus.term_index(&stem))
        {
            Some(idx) => weights[idx] = *weight,
            None => trace!(word = %word, "weight override matches no vocabulary term"),
        }
    }
    weights
}

/// TF and IDF formulas
///
/// The build pipeline only talks to this trait, so an alternative weighting
/// scheme can be plugged into `RelatedEngine<L, E>`.
pub trait TFIDFEngine {
    /// weighted term frequency, documents x vocabulary
    fn tf_matrix(bow: &BagOfWords, weights: &Vector) -> Matrix;
    /// inverse document frequency, one value per vocabulary term
    fn idf_vec(bow: &BagOfWords) -> Vector;

    fn tfidf_matrix(bow: &BagOfWords, weights: &Vector) -> Matrix {
        let mut tfidf = Self::tf_matrix(bow, weights);
        tfidf.scale_columns(&Self::idf_vec(bow));
        tfidf
    }
}

/// Max-normalized weighted TF and `ln(N / df)` IDF
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    pub fn new() -> Self {
        DefaultTFIDFEngine
    }
}

impl TFIDFEngine for DefaultTFIDFEngine {
    /// `count * weight / row_max`; a document without terms stays all-zero
    fn tf_matrix(bow: &BagOfWords, weights: &Vector) -> Matrix {
        let mut tf = bow.counts.clone();
        tf.scale_columns(weights);
        tf.div_rows_or_zero(&bow.row_max);
        tf
    }

    fn idf_vec(bow: &BagOfWords) -> Vector {
        let doc_num = bow.doc_num() as f64;
        bow.counts
            .column_occurrences()
            .into_iter()
            .map(|df| if df > 0 { (doc_num / df as f64).ln() } else { 0.0 })
            .collect()
    }
}
