use indexmap::IndexSet;
use serde::Serialize;

use crate::vectorizer::token::Term;

/// position of a document in ingestion order, also its matrix row
pub type DocId = usize;

/// one ingested document
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: DocId,
    pub url: String,
    pub title: String,
    /// stems of the body followed by stems of the title
    #[serde(skip)]
    pub terms: Vec<Term>,
}

/// Documents plus the vocabulary of every stem seen so far
///
/// The vocabulary is append-only: a stem keeps the index it was first given
/// for as long as the corpus lives.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    vocabulary: IndexSet<Term>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document and extend the vocabulary with its unseen stems
    pub fn push(&mut self, url: impl Into<String>, title: impl Into<String>, terms: Vec<Term>) -> DocId {
        let id = self.documents.len();
        for term in &terms {
            if !self.vocabulary.contains(term) {
                self.vocabulary.insert(term.clone());
            }
        }
        self.documents.push(Document {
            id,
            url: url.into(),
            title: title.into(),
            terms,
        });
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn vocabulary(&self) -> &IndexSet<Term> {
        &self.vocabulary
    }

    /// vocabulary index of a stem
    #[inline]
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get_index_of(term)
    }

    /// drop all documents and the vocabulary
    pub fn clear(&mut self) {
        self.documents.clear();
        self.vocabulary.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<Term> {
        words.iter().map(|w| Term::from(*w)).collect()
    }

    #[test]
    fn vocabulary_is_insertion_ordered_and_unique() {
        let mut corpus = Corpus::new();
        corpus.push("/a", "A", terms(&["cat", "dog", "cat"]));
        corpus.push("/b", "B", terms(&["bird", "dog"]));

        let vocab: Vec<&str> = corpus.vocabulary().iter().map(|t| t.as_ref()).collect();
        assert_eq!(vocab, vec!["cat", "dog", "bird"]);
        assert_eq!(corpus.term_index("dog"), Some(1));
        assert_eq!(corpus.term_index("fish"), None);
    }

    #[test]
    fn documents_keep_arrival_order() {
        let mut corpus = Corpus::new();
        let a = corpus.push("/a", "A", terms(&["x"]));
        let b = corpus.push("/b", "B", terms(&[]));
        assert_eq!((a, b), (0, 1));
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(1).map(|d| d.url.as_str()), Some("/b"));
        assert!(corpus.get(2).is_none());
    }

    #[test]
    fn indices_are_stable_after_more_documents() {
        let mut corpus = Corpus::new();
        corpus.push("/a", "A", terms(&["alpha", "beta"]));
        let before = corpus.term_index("beta");
        corpus.push("/b", "B", terms(&["gamma", "alpha", "delta"]));
        assert_eq!(corpus.term_index("beta"), before);
        assert_eq!(corpus.vocab_size(), 4);
    }

    #[test]
    fn clear_resets_everything() {
        let mut corpus = Corpus::new();
        corpus.push("/a", "A", terms(&["alpha"]));
        corpus.clear();
        assert!(corpus.is_empty());
        assert_eq!(corpus.vocab_size(), 0);
    }
}
