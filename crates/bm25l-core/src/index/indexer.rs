//! Indexing driver.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::collection::DocumentCollection;
use super::segment::{IdentitySegmenter, Segment, Segmenter};
use super::weighting::{TfIdfWeighting, Weighting};
use super::Index;
use crate::analysis::Parser;
use crate::config::Bm25lConfig;
use crate::errors::{Bm25lError, Result};
use crate::similarity::Bm25lSimilarity;
use crate::stats::{DocId, FieldInvertState};

/// Outcome of one [`Indexer::index`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSummary {
    /// Documents indexed.
    pub documents: u64,
    /// Index terms inserted, overlaps included.
    pub terms: u64,
    /// Index terms stacked on a previous position by the segmenter.
    pub overlaps: u64,
    /// Distinct terms in the finished index.
    pub vocabulary: usize,
}

/// Builds an [`Index`] from a [`DocumentCollection`].
///
/// Segmentation and posting weighting are injected strategies; norms are
/// encoded with the similarity that will later score the index.
pub struct Indexer {
    similarity: Bm25lSimilarity,
    parser: Parser,
    segmenter: Box<dyn Segmenter>,
    weighting: Box<dyn Weighting>,
    index: Index,
}

impl Indexer {
    /// Create an indexer for `field`.
    pub fn new(
        field: impl Into<String>,
        similarity: Bm25lSimilarity,
        parser: Parser,
        segmenter: Box<dyn Segmenter>,
        weighting: Box<dyn Weighting>,
    ) -> Self {
        Self {
            similarity,
            parser,
            segmenter,
            weighting,
            index: Index::new(field),
        }
    }

    /// Indexer with identity segmentation and tf-idf posting weights.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::InvalidConfiguration`] if the config is invalid.
    pub fn from_config(config: &Bm25lConfig) -> Result<Self> {
        Ok(Self::new(
            config.field.clone(),
            Bm25lSimilarity::from_config(config)?,
            Parser::new(config.analysis.clone()),
            Box::new(IdentitySegmenter),
            Box::new(TfIdfWeighting),
        ))
    }

    /// Replace the segmentation strategy.
    pub fn with_segmenter(mut self, segmenter: Box<dyn Segmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Index the first `min(collection.count(), max)` documents.
    ///
    /// Each call rebuilds the index from scratch. Document ids are the
    /// collection's ids.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::DocumentFetch`] if a document cannot be read; the
    /// run stops at that document.
    pub fn index(
        &mut self,
        collection: &dyn DocumentCollection,
        max: usize,
    ) -> Result<IndexSummary> {
        let count = collection.count().min(max);
        let field = self.index.field().to_string();
        let mut index = Index::new(field.clone());
        let mut terms = 0u64;
        let mut overlaps = 0u64;

        tracing::debug!(
            documents = count,
            segmenter = self.segmenter.name(),
            "Indexing field `{}`",
            field
        );

        for doc_id in 0..count as DocId {
            let text = collection
                .content(doc_id)
                .map_err(|source| Bm25lError::DocumentFetch { doc_id, source })?;

            let segments = self.analyze(&text);
            let num_overlap = segments.iter().filter(|s| s.is_overlap()).count() as u32;
            for segment in &segments {
                index.add(&segment.term, doc_id);
            }

            let state = FieldInvertState::new(field.as_str(), segments.len() as u32)
                .with_overlaps(num_overlap);
            let norm = self.similarity.compute_norm(&state);
            index.set_norm(doc_id, state.length, norm);

            tracing::trace!(doc_id, length = state.length, num_overlap, norm, "Indexed document");

            terms += u64::from(state.length);
            overlaps += u64::from(num_overlap);
        }

        index.set_document_count(count as u64);
        index.calculate_weighting(self.weighting.as_ref());

        let summary = IndexSummary {
            documents: count as u64,
            terms,
            overlaps,
            vocabulary: index.vocabulary_size(),
        };
        tracing::debug!(
            documents = summary.documents,
            vocabulary = summary.vocabulary,
            weighting = self.weighting.name(),
            "Indexing complete"
        );

        self.index = index;
        Ok(summary)
    }

    /// Segment the words of `text`, then normalize every segment.
    ///
    /// Compound parts go through the same normalizer as query terms. A
    /// rejected segment hands its position increment to the next kept one, so
    /// a part whose whole term was dropped is not counted as an overlap.
    fn analyze(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut pending = 0;
        for segment in self.segmenter.segment(self.parser.words(text)) {
            pending += segment.position_increment;
            if let Some(term) = self.parser.normalize_term(&segment.term) {
                segments.push(Segment {
                    term,
                    position_increment: pending,
                });
                pending = 0;
            }
        }
        segments
    }

    /// The index built by the last run.
    pub fn as_index(&self) -> &Index {
        &self.index
    }

    /// Take the built index.
    pub fn into_index(self) -> Index {
        self.index
    }

    /// The similarity norms are encoded with.
    pub fn similarity(&self) -> &Bm25lSimilarity {
        &self.similarity
    }

    /// The analysis chain, for normalizing query terms.
    pub fn parser(&self) -> &Parser {
        &self.parser
    }
}

impl fmt::Debug for Indexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indexer")
            .field("similarity", &self.similarity)
            .field("segmenter", &self.segmenter.name())
            .field("weighting", &self.weighting.name())
            .field("field", &self.index.field())
            .finish()
    }
}
