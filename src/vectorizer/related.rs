use std::fmt::Display;

use indexmap::IndexMap;
use serde::Serialize;

use crate::vectorizer::corpus::{Corpus, DocId};
use crate::vectorizer::evaluate::ranking::Hits;

/// one line of a related-list, what the renderer sees
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedEntry {
    pub score: f64,
    pub url: String,
    pub title: String,
}

/// related-list of a single document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedList {
    pub id: DocId,
    pub url: String,
    pub title: String,
    pub related: Vec<RelatedEntry>,
}

/// Related-lists for the whole corpus, in ingestion order
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelatedPosts {
    documents: Vec<RelatedList>,
    #[serde(skip)]
    by_url: IndexMap<String, DocId>,
}

impl RelatedPosts {
    /// Attach url and title to every ranked peer
    pub fn assemble(corpus: &Corpus, rankings: Vec<Hits>) -> Self {
        debug_assert_eq!(corpus.len(), rankings.len(), "one ranking per document");
        let mut documents = Vec::with_capacity(rankings.len());
        let mut by_url = IndexMap::with_capacity(rankings.len());
        for (doc, hits) in corpus.iter().zip(rankings) {
            let related = hits
                .list
                .into_iter()
                .filter_map(|(peer, score)| {
                    corpus.get(peer).map(|p| RelatedEntry {
                        score,
                        url: p.url.clone(),
                        title: p.title.clone(),
                    })
                })
                .collect();
            // first document wins when urls repeat
            by_url.entry(doc.url.clone()).or_insert(doc.id);
            documents.push(RelatedList {
                id: doc.id,
                url: doc.url.clone(),
                title: doc.title.clone(),
                related,
            });
        }
        Self { documents, by_url }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: DocId) -> Option<&RelatedList> {
        self.documents.get(id)
    }

    pub fn for_url(&self, url: &str) -> Option<&RelatedList> {
        self.by_url.get(url).and_then(|id| self.documents.get(*id))
    }

    /// related entries of a document, empty when the id is unknown
    pub fn related(&self, id: DocId) -> &[RelatedEntry] {
        self.documents
            .get(id)
            .map(|l| l.related.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RelatedList> {
        self.documents.iter()
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a RelatedPosts {
    type Item = &'a RelatedList;
    type IntoIter = std::slice::Iter<'a, RelatedList>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for RelatedPosts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for list in &self.documents {
            writeln!(f, "{} ({})", list.title, list.url)?;
            if list.related.is_empty() {
                writeln!(f, "    (none)")?;
            }
            for entry in &list.related {
                writeln!(f, "    {:.6}  {} ({})", entry.score, entry.title, entry.url)?;
            }
        }
        Ok(())
    }
}
