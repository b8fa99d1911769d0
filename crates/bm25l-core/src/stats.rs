//! Statistics exchanged with the host query engine.
//!
//! These are plain read-only records. The host computes them once per query
//! and hands them to [`Bm25lSimilarity::compute_weight`]; the indexing side
//! produces a [`FieldInvertState`] per document and field when writing norms.
//!
//! [`Bm25lSimilarity::compute_weight`]: crate::similarity::Bm25lSimilarity::compute_weight

use serde::{Deserialize, Serialize};

/// Document id within a single index segment.
pub type DocId = u32;

/// Collection-level statistics for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStatistics {
    /// Field the statistics were gathered for.
    pub field: String,
    /// Number of documents in the collection, deleted or not.
    pub max_doc: u64,
    /// Sum of all term frequencies in the field across all documents.
    /// Zero or negative means the field does not record frequencies.
    pub sum_total_term_freq: i64,
}

impl CollectionStatistics {
    /// Create collection statistics for a field.
    pub fn new(field: impl Into<String>, max_doc: u64, sum_total_term_freq: i64) -> Self {
        Self {
            field: field.into(),
            max_doc,
            sum_total_term_freq,
        }
    }

    /// Whether the total term frequency statistic is available.
    pub fn has_term_frequencies(&self) -> bool {
        self.sum_total_term_freq > 0
    }
}

/// Term-level statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermStatistics {
    /// The term text.
    pub term: String,
    /// Number of documents containing the term.
    pub doc_freq: u64,
}

impl TermStatistics {
    /// Create term statistics.
    pub fn new(term: impl Into<String>, doc_freq: u64) -> Self {
        Self {
            term: term.into(),
            doc_freq,
        }
    }
}

/// Per-document, per-field state captured while inverting a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInvertState {
    /// Field being inverted.
    pub field: String,
    /// Number of tokens seen.
    pub length: u32,
    /// Tokens with a position increment of zero (stacked synonyms, splits).
    pub num_overlap: u32,
    /// Index-time boost.
    pub boost: f32,
}

impl FieldInvertState {
    /// Create a state with a boost of `1.0` and no overlaps.
    pub fn new(field: impl Into<String>, length: u32) -> Self {
        Self {
            field: field.into(),
            length,
            num_overlap: 0,
            boost: 1.0,
        }
    }

    /// Set the overlap count.
    pub fn with_overlaps(mut self, num_overlap: u32) -> Self {
        self.num_overlap = num_overlap;
        self
    }

    /// Set the index-time boost.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }
}
