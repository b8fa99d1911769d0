//! Per-query term weights.
//!
//! A weight is built in two phases. [`Bm25lSimilarity::compute_weight`]
//! gathers the collection-wide pieces (idf, average length, query boost) into
//! a [`WeightContext`]. The host then calls [`WeightContext::normalize`],
//! which consumes the context and yields an immutable [`NormalizedWeight`].
//! Only a `NormalizedWeight` can produce scorers, so nothing is ever scored
//! against a half-built weight.

use super::explanation::Explanation;
use super::idf::{idf_explain, idf_explain_phrase};
use super::Bm25lSimilarity;
use crate::errors::{Bm25lError, Result};
use crate::stats::{CollectionStatistics, TermStatistics};

/// Average field length, or `1.0` when the field lacks frequency statistics.
pub fn avg_field_length(collection: &CollectionStatistics) -> f32 {
    if collection.sum_total_term_freq <= 0 || collection.max_doc == 0 {
        return 1.0;
    }
    (collection.sum_total_term_freq as f64 / collection.max_doc as f64) as f32
}

impl Bm25lSimilarity {
    /// Build the first phase of a weight for one term or a phrase.
    ///
    /// A single term gets a plain idf explanation; several terms get the
    /// summed phrase idf.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::NoTerms`] if `terms` is empty.
    pub fn compute_weight(
        &self,
        query_boost: f32,
        collection: &CollectionStatistics,
        terms: &[TermStatistics],
    ) -> Result<WeightContext> {
        let idf = match terms {
            [] => return Err(Bm25lError::NoTerms),
            [term] => idf_explain(collection, term),
            _ => idf_explain_phrase(collection, terms),
        };
        let avgdl = avg_field_length(collection);

        tracing::debug!(
            field = %collection.field,
            terms = terms.len(),
            idf = idf.value(),
            avgdl,
            "Computed BM25L weight"
        );

        Ok(WeightContext {
            field: collection.field.clone(),
            idf,
            query_boost,
            avgdl,
        })
    }
}

/// First-phase weight: collection statistics folded together, not yet
/// normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightContext {
    field: String,
    idf: Explanation,
    query_boost: f32,
    avgdl: f32,
}

impl WeightContext {
    /// Assemble a context from precomputed parts.
    ///
    /// For hosts that derive idf or the average length themselves;
    /// [`Bm25lSimilarity::compute_weight`] is the usual entry point.
    pub fn new(field: impl Into<String>, idf: Explanation, query_boost: f32, avgdl: f32) -> Self {
        Self {
            field: field.into(),
            idf,
            query_boost,
            avgdl,
        }
    }

    /// Field whose norms the weight scores against.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The idf explanation (single term or phrase sum).
    pub fn idf(&self) -> &Explanation {
        &self.idf
    }

    /// The query's inner boost.
    pub fn query_boost(&self) -> f32 {
        self.query_boost
    }

    /// Average field length used for length normalization.
    pub fn avg_document_length(&self) -> f32 {
        self.avgdl
    }

    /// This term's contribution to the host's query normalization:
    /// `(idf * query_boost)^2`.
    ///
    /// Offered so the host can combine clauses TF-IDF style; the weight itself
    /// never applies the resulting norm.
    pub fn value_for_normalization(&self) -> f32 {
        let query_weight = self.idf.value() * self.query_boost;
        query_weight * query_weight
    }

    /// Finish the weight with the host's normalization pass.
    ///
    /// `query_norm` is ignored. Only `top_level_boost` is captured.
    pub fn normalize(self, query_norm: f32, top_level_boost: f32) -> NormalizedWeight {
        tracing::trace!(
            field = %self.field,
            query_norm,
            top_level_boost,
            "Ignoring query norm for BM25L weight"
        );
        let combined_weight = self.idf.value() * self.query_boost * top_level_boost;
        NormalizedWeight {
            context: self,
            top_level_boost,
            combined_weight,
        }
    }
}

/// Second-phase weight, immutable and shareable across scoring threads.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedWeight {
    context: WeightContext,
    top_level_boost: f32,
    combined_weight: f32,
}

impl NormalizedWeight {
    /// The first-phase values this weight was built from.
    pub fn context(&self) -> &WeightContext {
        &self.context
    }

    /// Field whose norms the weight scores against.
    pub fn field(&self) -> &str {
        &self.context.field
    }

    /// The idf explanation.
    pub fn idf(&self) -> &Explanation {
        &self.context.idf
    }

    /// Average field length used for length normalization.
    pub fn avg_document_length(&self) -> f32 {
        self.context.avgdl
    }

    /// The query's inner boost.
    pub fn query_boost(&self) -> f32 {
        self.context.query_boost
    }

    /// The boost of enclosing queries, captured by `normalize`.
    pub fn top_level_boost(&self) -> f32 {
        self.top_level_boost
    }

    /// `idf * query_boost * top_level_boost`.
    pub fn combined_weight(&self) -> f32 {
        self.combined_weight
    }

    /// Same value as [`WeightContext::value_for_normalization`].
    pub fn value_for_normalization(&self) -> f32 {
        self.context.value_for_normalization()
    }
}
