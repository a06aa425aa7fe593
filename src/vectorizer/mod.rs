pub mod corpus;
pub mod evaluate;
pub mod lsi;
pub mod related;
pub mod tfidf;
pub mod token;

use std::marker::PhantomData;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use crate::config::RelatedConfig;
use crate::error::Result;
use crate::render::{Renderer, SiteWriter};
use crate::utils::math::{Matrix, Vector};
use crate::vectorizer::corpus::{Corpus, DocId};
use crate::vectorizer::evaluate::correlation::correlate;
use crate::vectorizer::evaluate::ranking::{select_top_k, Hits, RankingOptions};
use crate::vectorizer::related::RelatedPosts;
use crate::vectorizer::tfidf::{keyword_weights, BagOfWords, DefaultTFIDFEngine, TFIDFEngine};
use crate::vectorizer::token::{EnglishLinguistics, Linguistics, Normalizer, Term};

/// Related-documents engine
///
/// Two phases: call `add_document` for every document, then `build` once.
/// `build` only reads the engine, so calling it again on the same corpus
/// with the same config gives the same lists.
///
/// `RelatedEngine<L, E>` has the following generic parameters:
/// - `L`: linguistic collaborator (tokenizer, stopwords, stemmer)
/// - `E`: TF-IDF calculation engine
pub struct RelatedEngine<L = EnglishLinguistics, E = DefaultTFIDFEngine>
where
    L: Linguistics,
    E: TFIDFEngine,
{
    corpus: Corpus,
    normalizer: Normalizer<L>,
    _marker: PhantomData<E>,
}

impl RelatedEngine {
    /// English engine with the default TF-IDF formulas
    pub fn new() -> Self {
        Self::with_linguistics(EnglishLinguistics::new())
    }
}

impl Default for RelatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, E> std::fmt::Debug for RelatedEngine<L, E>
where
    L: Linguistics,
    E: TFIDFEngine,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelatedEngine")
            .field("documents", &self.corpus.len())
            .field("vocabulary", &self.corpus.vocab_size())
            .finish()
    }
}

impl<L, E> RelatedEngine<L, E>
where
    L: Linguistics,
    E: TFIDFEngine,
{
    pub fn with_linguistics(linguistics: L) -> Self {
        Self {
            corpus: Corpus::new(),
            normalizer: Normalizer::new(linguistics),
            _marker: PhantomData,
        }
    }

    /// Ingest one document
    /// Its terms are the normalized content followed by the normalized title.
    pub fn add_document(&mut self, url: &str, title: &str, content: &str) -> DocId {
        let terms = document_terms(&self.normalizer, title, content);
        let term_num = terms.len();
        let id = self.corpus.push(url, title, terms);
        debug!(id, url, terms = term_num, vocabulary = self.corpus.vocab_size(), "document added");
        id
    }

    /// Ingest a batch of `(url, title, content)` documents
    /// Normalization runs in parallel; ids follow the batch order.
    pub fn add_documents<S>(&mut self, docs: &[(S, S, S)]) -> Vec<DocId>
    where
        S: AsRef<str> + Sync,
        L: Sync,
    {
        let normalizer = &self.normalizer;
        let normalized: Vec<Vec<Term>> = docs
            .par_iter()
            .map(|(_, title, content)| document_terms(normalizer, title.as_ref(), content.as_ref()))
            .collect();
        let ids: Vec<DocId> = docs
            .iter()
            .zip(normalized)
            .map(|((url, title, _), terms)| self.corpus.push(url.as_ref(), title.as_ref(), terms))
            .collect();
        debug!(added = ids.len(), vocabulary = self.corpus.vocab_size(), "documents added");
        ids
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn doc_num(&self) -> usize {
        self.corpus.len()
    }

    /// forget every document so the engine can serve another build cycle
    pub fn clear(&mut self) {
        self.corpus.clear();
    }

    pub fn bag_of_words(&self) -> BagOfWords {
        BagOfWords::from_corpus(&self.corpus)
    }

    pub fn weight_vector(&self, overrides: &IndexMap<String, f64>) -> Vector {
        keyword_weights(&self.corpus, &self.normalizer, overrides)
    }

    pub fn term_frequency(&self, overrides: &IndexMap<String, f64>) -> Matrix {
        E::tf_matrix(&self.bag_of_words(), &self.weight_vector(overrides))
    }

    pub fn inverse_document_frequency(&self) -> Vector {
        E::idf_vec(&self.bag_of_words())
    }

    pub fn tfidf(&self, overrides: &IndexMap<String, f64>) -> Matrix {
        E::tfidf_matrix(&self.bag_of_words(), &self.weight_vector(overrides))
    }

    /// TF-IDF matrix, or its latent reconstruction when `accuracy < 1.0`
    pub fn score_matrix(&self, config: &RelatedConfig) -> Result<Matrix> {
        config.validate()?;
        let tfidf = self.tfidf(&config.weights);
        if config.uses_reduction() {
            lsi::reduce(&tfidf, config.accuracy)
        } else {
            Ok(tfidf)
        }
    }

    pub fn correlation(&self, config: &RelatedConfig) -> Result<Matrix> {
        Ok(correlate(&self.score_matrix(config)?))
    }

    /// ranked peers of every document, by index
    pub fn rank(&self, config: &RelatedConfig) -> Result<Vec<Hits>> {
        let correlation = self.correlation(config)?;
        Ok(select_top_k(
            &correlation,
            &RankingOptions {
                max_count: config.max_count,
                min_score: config.min_score,
                include_self: config.include_self,
            },
        ))
    }

    /// Run the whole pipeline and assemble every document's related-list
    ///
    /// An empty corpus gives an empty result. Configuration and numeric
    /// errors abort the build.
    pub fn build(&self, config: &RelatedConfig) -> Result<RelatedPosts> {
        let _span = info_span!("build", documents = self.corpus.len()).entered();
        config.validate()?;
        if self.corpus.is_empty() {
            info!("empty corpus, nothing to relate");
            return Ok(RelatedPosts::default());
        }
        let rankings = self.rank(config)?;
        let posts = RelatedPosts::assemble(&self.corpus, rankings);
        info!(
            vocabulary = self.corpus.vocab_size(),
            accuracy = config.accuracy,
            entries = posts.iter().map(|l| l.related.len()).sum::<usize>(),
            "related lists built"
        );
        Ok(posts)
    }

    /// `build`, then render and splice every list into the written site
    ///
    /// Nothing on disk is touched when the build itself fails.
    pub fn publish<R>(&self, config: &RelatedConfig, renderer: &R, writer: &SiteWriter) -> Result<RelatedPosts>
    where
        R: Renderer + ?Sized,
    {
        let posts = self.build(config)?;
        writer.write_all(&posts, renderer)?;
        Ok(posts)
    }
}

/// normalized content followed by the normalized title
fn document_terms<L: Linguistics>(normalizer: &Normalizer<L>, title: &str, content: &str) -> Vec<Term> {
    let mut terms = normalizer.normalize(content);
    terms.extend(normalizer.normalize(title));
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelatedError;
    use crate::utils::math::MatrixOps;

    fn animals() -> RelatedEngine {
        let mut engine = RelatedEngine::new();
        engine.add_document("/a", "A", "cats and dogs");
        engine.add_document("/b", "B", "dogs and cats");
        engine.add_document("/c", "C", "quantum physics");
        engine
    }

    #[test]
    fn title_contributes_terms() {
        let mut engine = RelatedEngine::new();
        engine.add_document("/x", "Compilers", "parsing");
        let doc = engine.corpus().get(0).unwrap();
        let terms: Vec<&str> = doc.terms.iter().map(|t| t.as_ref()).collect();
        assert_eq!(terms, vec!["pars", "compil"]);
        assert_eq!(doc.title, "Compilers");
    }

    #[test]
    fn batch_ingest_matches_sequential() {
        let docs = [
            ("/a", "A", "cats and dogs"),
            ("/b", "B", "dogs and cats"),
            ("/c", "C", "quantum physics"),
        ];
        let mut batch = RelatedEngine::new();
        assert_eq!(batch.add_documents(&docs), vec![0, 1, 2]);
        let sequential = animals();
        assert_eq!(batch.corpus().vocabulary(), sequential.corpus().vocabulary());
        assert_eq!(batch.tfidf(&IndexMap::new()), sequential.tfidf(&IndexMap::new()));
    }

    #[test]
    fn score_matrix_skips_reduction_at_full_accuracy() {
        let engine = animals();
        let config = RelatedConfig::default();
        assert_eq!(engine.score_matrix(&config).unwrap(), engine.tfidf(&config.weights));
    }

    #[test]
    fn full_rank_reduction_matches_exact_correlation() {
        let engine = animals();
        let exact = correlate(&engine.tfidf(&IndexMap::new()));
        let reduced = correlate(&lsi::reduce(&engine.tfidf(&IndexMap::new()), 1.0).unwrap());
        for (a, b) in exact.iter().zip(reduced.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_weights_make_every_score_zero() {
        let engine = animals();
        let mut config = RelatedConfig::default();
        for word in ["cat", "dog", "quantum", "physics", "A", "B", "C"] {
            config.weights.insert(word.to_string(), 0.0);
        }
        let tf = engine.term_frequency(&config.weights);
        assert!(tf.iter().all(|v| *v == 0.0));
        let corr = engine.correlation(&config).unwrap();
        assert!(corr.all_finite());
        assert!(corr.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn invalid_accuracy_aborts() {
        let engine = animals();
        let err = engine.build(&RelatedConfig::default().with_accuracy(0.0)).unwrap_err();
        assert!(matches!(err, RelatedError::InvalidAccuracy(_)));
    }

    #[test]
    fn clear_allows_a_fresh_cycle() {
        let mut engine = animals();
        engine.clear();
        assert_eq!(engine.doc_num(), 0);
        assert!(engine.build(&RelatedConfig::default()).unwrap().is_empty());
    }
}
