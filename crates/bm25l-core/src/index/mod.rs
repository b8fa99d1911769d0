//! In-memory inverted index and the pipeline that fills it.
//!
//! ```text
//! DocumentCollection ──content──► words ──► Segmenter ──► normalize ──► Index
//!                                                                     │
//!                                            postings, lengths, norms ▼
//!                                        CollectionStatistics / TermStatistics
//!                                        NormsProvider (for DocScorer)
//! ```
//!
//! ## Key Components
//!
//! - [`Indexer`]: drives a collection through analysis and segmentation
//! - [`Index`]: postings per term, per-document lengths and norm bytes
//! - [`Segmenter`]: injected term splitting strategy
//! - [`Weighting`]: injected posting weight strategy

pub mod collection;
pub mod indexer;
pub mod segment;
pub mod weighting;

pub use collection::{DirectoryCollection, DocumentCollection, MemoryCollection};
pub use indexer::{IndexSummary, Indexer};
pub use segment::{CompoundSegmenter, IdentitySegmenter, Segment, Segmenter};
pub use weighting::{TfIdfWeighting, Weighting};

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};

use crate::similarity::{NormValues, NormsProvider};
use crate::stats::{CollectionStatistics, DocId, TermStatistics};

/// One document's entry in a term's posting list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    /// Document containing the term.
    pub doc_id: DocId,
    /// Occurrences of the term in the document.
    pub freq: u32,
    /// Weight assigned by the index's [`Weighting`]; `0` until weighting runs.
    pub weight: f32,
}

/// Summary of an index's contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Indexed field.
    pub field: String,
    /// Number of documents.
    pub documents: u64,
    /// Number of distinct terms.
    pub vocabulary: usize,
    /// Number of (term, document) pairs.
    pub postings: usize,
    /// Sum of all document lengths.
    pub total_terms: u64,
    /// Average document length, as used for length normalization.
    pub avg_length: f32,
}

/// Inverted index for a single field.
///
/// Posting lists are kept sorted by document id.
#[derive(Debug, Clone, Default)]
pub struct Index {
    field: String,
    postings: BTreeMap<String, Vec<Posting>>,
    doc_count: u64,
    lengths: Vec<u32>,
    norms: Vec<u8>,
}

impl Index {
    /// Create an empty index for `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    /// Record one occurrence of `term` in `doc_id`.
    pub fn add(&mut self, term: &str, doc_id: DocId) {
        let list = self.postings.entry(term.to_string()).or_default();
        match list.binary_search_by_key(&doc_id, |p| p.doc_id) {
            Ok(i) => list[i].freq += 1,
            Err(i) => list.insert(
                i,
                Posting {
                    doc_id,
                    freq: 1,
                    weight: 0.0,
                },
            ),
        }
    }

    /// Store a document's length and encoded norm byte.
    ///
    /// Documents without a stored norm read back as byte `0`.
    pub fn set_norm(&mut self, doc_id: DocId, length: u32, norm: u8) {
        let slot = doc_id as usize;
        if self.norms.len() <= slot {
            self.norms.resize(slot + 1, 0);
            self.lengths.resize(slot + 1, 0);
        }
        self.norms[slot] = norm;
        self.lengths[slot] = length;
    }

    /// Set the number of documents in the collection.
    pub fn set_document_count(&mut self, count: u64) {
        self.doc_count = count;
    }

    /// Assign every posting its weight.
    pub fn calculate_weighting(&mut self, weighting: &dyn Weighting) {
        let doc_count = self.doc_count;
        for list in self.postings.values_mut() {
            let doc_freq = list.len() as u64;
            for posting in list.iter_mut() {
                posting.weight = weighting.weight(posting.freq, doc_freq, doc_count);
            }
        }
    }

    /// The indexed field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Number of documents.
    pub fn document_count(&self) -> u64 {
        self.doc_count
    }

    /// Number of distinct terms.
    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// Terms in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Posting list of `term`, empty if the term is unknown.
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occurrences of `term` in `doc_id`.
    pub fn term_freq(&self, term: &str, doc_id: DocId) -> u32 {
        let list = self.postings(term);
        list.binary_search_by_key(&doc_id, |p| p.doc_id)
            .map(|i| list[i].freq)
            .unwrap_or(0)
    }

    /// Stored length of `doc_id`.
    pub fn document_length(&self, doc_id: DocId) -> Option<u32> {
        self.lengths.get(doc_id as usize).copied()
    }

    /// Stored norm byte of `doc_id`.
    pub fn norm(&self, doc_id: DocId) -> Option<u8> {
        self.norms.get(doc_id as usize).copied()
    }

    /// Statistics of the indexed field.
    pub fn collection_statistics(&self) -> CollectionStatistics {
        let total: u64 = self.lengths.iter().map(|&len| u64::from(len)).sum();
        CollectionStatistics::new(self.field.clone(), self.doc_count, total as i64)
    }

    /// Statistics of `term`, or `None` if it is not indexed.
    pub fn term_statistics(&self, term: &str) -> Option<TermStatistics> {
        self.postings
            .get(term)
            .map(|list| TermStatistics::new(term, list.len() as u64))
    }

    /// Summary numbers.
    pub fn stats(&self) -> IndexStats {
        let collection = self.collection_statistics();
        IndexStats {
            field: self.field.clone(),
            documents: self.doc_count,
            vocabulary: self.postings.len(),
            postings: self.postings.values().map(Vec::len).sum(),
            total_terms: collection.sum_total_term_freq.max(0) as u64,
            avg_length: crate::similarity::avg_field_length(&collection),
        }
    }
}

impl NormsProvider for Index {
    fn norm_values(&self, field: &str) -> io::Result<Box<dyn NormValues + '_>> {
        if field != self.field {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("field `{}` is not indexed (index holds `{}`)", field, self.field),
            ));
        }
        Ok(Box::new(self.norms.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Index {
        let mut index = Index::new("body");
        for (doc, text) in ["rust fast rust", "fast index"].iter().enumerate() {
            let terms: Vec<&str> = text.split(' ').collect();
            for term in &terms {
                index.add(term, doc as DocId);
            }
            index.set_norm(doc as DocId, terms.len() as u32, 0);
        }
        index.set_document_count(2);
        index
    }

    #[test]
    fn test_postings_and_freqs() {
        let index = sample();
        assert_eq!(index.vocabulary_size(), 3);
        assert_eq!(index.term_freq("rust", 0), 2);
        assert_eq!(index.term_freq("rust", 1), 0);
        assert_eq!(index.term_freq("missing", 0), 0);

        let doc_ids: Vec<DocId> = index.postings("fast").iter().map(|p| p.doc_id).collect();
        assert_eq!(doc_ids, vec![0, 1]);
        assert!(index.postings("missing").is_empty());
    }

    #[test]
    fn test_out_of_order_add_keeps_postings_sorted() {
        let mut index = Index::new("body");
        index.add("term", 5);
        index.add("term", 1);
        index.add("term", 3);
        index.add("term", 1);

        let postings = index.postings("term");
        let doc_ids: Vec<DocId> = postings.iter().map(|p| p.doc_id).collect();
        assert_eq!(doc_ids, vec![1, 3, 5]);
        assert_eq!(postings[0].freq, 2);
    }

    #[test]
    fn test_statistics() {
        let index = sample();
        let collection = index.collection_statistics();
        assert_eq!(collection.field, "body");
        assert_eq!(collection.max_doc, 2);
        assert_eq!(collection.sum_total_term_freq, 5);

        assert_eq!(index.term_statistics("fast").unwrap().doc_freq, 2);
        assert_eq!(index.term_statistics("rust").unwrap().doc_freq, 1);
        assert!(index.term_statistics("missing").is_none());

        let stats = index.stats();
        assert_eq!(stats.postings, 4);
        assert_eq!(stats.total_terms, 5);
        assert!((stats.avg_length - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_weighting_fills_postings() {
        let mut index = sample();
        index.calculate_weighting(&TfIdfWeighting);

        // "fast" is in every document
        assert!(index.postings("fast").iter().all(|p| p.weight == 0.0));
        let rust = index.postings("rust")[0];
        let expected = (1.0 + 2f64.log10()) * 2f64.log10();
        assert!((rust.weight as f64 - expected).abs() < 1e-6);
    }

    #[test]
    fn test_norms_provider() {
        let mut index = Index::new("body");
        index.set_norm(2, 10, 99);

        let norms = index.norm_values("body").unwrap();
        assert_eq!(norms.get(0).unwrap(), 0);
        assert_eq!(norms.get(2).unwrap(), 99);
        assert!(norms.get(3).is_err());

        let err = index.norm_values("title").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
