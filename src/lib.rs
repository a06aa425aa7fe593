/// This crate is a related-documents engine built on a TF-IDF vectorizer.
pub mod config;
pub mod error;
pub mod render;
pub mod source;
pub mod utils;
pub mod vectorizer;

/// Related-documents Engine
/// The top-level struct of this crate.
/// Documents are ingested one by one, then a single `build` computes every
/// document's related-list from the whole collection.
///
/// The pipeline:
/// - bag of words over the corpus vocabulary
/// - weighted term frequency and inverse document frequency
/// - optional latent semantic reduction (`accuracy < 1.0`)
/// - Tanimoto correlation between every document pair
/// - top-K selection per document
///
/// `RelatedEngine<L, E>` has the following generic parameters:
/// - `L`: linguistic collaborator (e.g., EnglishLinguistics)
/// - `E`: TF-IDF calculation engine (e.g., DefaultTFIDFEngine)
pub use vectorizer::RelatedEngine;

/// Engine configuration
/// Read from the `related` section of a site YAML file, or built in code.
/// Missing keys take their defaults.
pub use config::RelatedConfig;

/// Error type of every fallible operation
pub use error::{RelatedError, Result};

/// Corpus of ingested documents
/// Holds the documents in ingestion order together with the vocabulary,
/// the set of distinct terms in first-seen order.
pub use vectorizer::corpus::{Corpus, DocId, Document};

/// Text normalization
/// `Linguistics` supplies tokenizer, stopword list and stemmer;
/// `Normalizer` turns raw text into the terms the corpus stores.
pub use vectorizer::token::{EnglishLinguistics, Linguistics, Normalizer};

/// TF IDF Calculation Engine Trait
/// A trait that defines the behavior of a TF-IDF calculation engine.
///
/// By implementing this trait, you can plug different TF-IDF calculation strategies
/// into `RelatedEngine<L, E>`.
/// A default implementation, `DefaultTFIDFEngine`, is provided: max-normalized
/// weighted term frequency and `ln(N / df)` inverse document frequency.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Ranked peers of one document, best first
pub use vectorizer::evaluate::ranking::Hits;

/// Build results
/// - `RelatedPosts`: every document's related-list, in ingestion order
/// - `RelatedList`: one document with its related entries
/// - `RelatedEntry`: score, url and title of one related document
pub use vectorizer::related::{RelatedEntry, RelatedList, RelatedPosts};

/// Output side
/// `Renderer` turns a related-list into a fragment. `TemplateRenderer` does it
/// with a Handlebars template, the built-in one or a site's `related.html`.
/// `SiteWriter` splices the fragments into the already generated output files.
pub use render::{Renderer, SiteWriter, TemplateRenderer};

/// Documents discovered on disk, with title and url derived from each file
pub use source::{discover, SourceDocument};
