use std::fmt::Debug;

use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

/// normalized stem used as vocabulary key
pub type Term = Box<str>;

/// Linguistic capabilities the normalizer is built on
///
/// Swap the implementation to change tokenization rules, stopword list or
/// stemming language without touching the rest of the pipeline.
pub trait Linguistics {
    /// split cleaned text into raw tokens
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str>;
    /// `token` is already lowercased
    fn is_stopword(&self, token: &str) -> bool;
    fn stem(&self, token: &str) -> String;
}

/// Snowball English stopword list
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "would",
    "should", "could", "ought", "i'm", "you're", "he's", "she's", "it's", "we're", "they're",
    "i've", "you've", "we've", "they've", "i'd", "you'd", "he'd", "she'd", "we'd", "they'd",
    "i'll", "you'll", "he'll", "she'll", "we'll", "they'll", "isn't", "aren't", "wasn't",
    "weren't", "hasn't", "haven't", "hadn't", "doesn't", "don't", "didn't", "won't",
    "wouldn't", "shan't", "shouldn't", "can't", "cannot", "couldn't", "mustn't", "let's",
    "that's", "who's", "what's", "here's", "there's", "when's", "where's", "why's", "how's",
    "a", "an", "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at",
    "by", "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very",
];

/// English defaults: unicode word boundaries, Snowball stopwords, Porter2 stemmer
pub struct EnglishLinguistics {
    stemmer: Stemmer,
}

impl EnglishLinguistics {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for EnglishLinguistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for EnglishLinguistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnglishLinguistics").finish_non_exhaustive()
    }
}

impl Linguistics for EnglishLinguistics {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.unicode_words().collect()
    }

    fn is_stopword(&self, token: &str) -> bool {
        ENGLISH_STOPWORDS.contains(&token)
    }

    fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }
}

/// characters that survive cleaning, checked case-insensitively
#[inline]
fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, ' ' | '\t' | '\'' | '_' | '-' | '\n' | '.' | ',' | '+')
}

/// Text -> ordered stem sequence
#[derive(Debug, Default)]
pub struct Normalizer<L = EnglishLinguistics>
where
    L: Linguistics,
{
    linguistics: L,
}

impl Normalizer<EnglishLinguistics> {
    pub fn english() -> Self {
        Self::new(EnglishLinguistics::new())
    }
}

impl<L> Normalizer<L>
where
    L: Linguistics,
{
    pub fn new(linguistics: L) -> Self {
        Self { linguistics }
    }

    pub fn linguistics(&self) -> &L {
        &self.linguistics
    }

    /// clean -> tokenize -> lowercase -> drop stopwords -> stem -> drop empties
    pub fn normalize(&self, text: &str) -> Vec<Term> {
        let cleaned: String = text.chars().filter(|c| is_allowed_char(*c)).collect();
        self.linguistics
            .tokenize(&cleaned)
            .into_iter()
            .map(str::to_lowercase)
            .filter(|token| !self.linguistics.is_stopword(token))
            .map(|token| self.linguistics.stem(&token))
            .filter(|stem| !stem.is_empty())
            .map(String::into_boxed_str)
            .collect()
    }

    /// Key a configured weight override the same way document words are keyed
    ///
    /// Only lowercasing and stemming apply here: a stopword used as an
    /// override still resolves, it simply never matches the vocabulary.
    pub fn normalize_word(&self, word: &str) -> Option<Term> {
        let lowered = word.trim().to_lowercase();
        let stem = self.linguistics.stem(&lowered);
        if stem.is_empty() {
            None
        } else {
            Some(stem.into_boxed_str())
        }
    }
}
