//! BM25L ranking for an inverted index.
//!
//! `bm25l-core` provides the BM25L similarity (length norms, idf, two-phase
//! weights, per-document scoring and explanations) together with a small
//! indexing pipeline that produces the statistics and norms it scores against.
//!
//! ## Example
//!
//! ```
//! use bm25l_core::{Bm25lConfig, Explanation, Indexer, MemoryCollection};
//!
//! let collection = MemoryCollection::new([
//!     "rust makes systems programming safe",
//!     "ranking functions score documents",
//! ]);
//! let mut indexer = Indexer::from_config(&Bm25lConfig::default()).unwrap();
//! indexer.index(&collection, usize::MAX).unwrap();
//!
//! let index = indexer.as_index();
//! let sim = indexer.similarity();
//! let term = indexer.parser().normalize_term("ranking").unwrap();
//! let stats = index.term_statistics(&term).unwrap();
//!
//! let weight = sim
//!     .compute_weight(1.0, &index.collection_statistics(), &[stats])
//!     .unwrap()
//!     .normalize(1.0, 1.0);
//! let scorer = sim.scorer(&weight, index).unwrap();
//!
//! let freq = index.term_freq(&term, 1) as f32;
//! let score = scorer.score(1, freq).unwrap();
//! let explanation = scorer.explain(1, Explanation::new(freq, "termFreq")).unwrap();
//! assert!(score > 0.0);
//! assert_eq!(explanation.value(), score);
//! ```
//!
//! ## Modules
//!
//! - [`similarity`]: the BM25L model
//! - [`stats`]: statistics exchanged with the host engine
//! - [`analysis`]: tokenizing and normalizing text
//! - [`index`]: the inverted index and its builder
//! - [`config`]: YAML configuration
//! - [`errors`]: error types

pub mod analysis;
pub mod config;
pub mod errors;
pub mod index;
pub mod similarity;
pub mod stats;

pub use analysis::{Normalizer, Parser, Tokenizer};
pub use config::{AnalysisConfig, Bm25lConfig};
pub use errors::{Bm25lError, Result};
pub use index::{
    CompoundSegmenter, DirectoryCollection, DocumentCollection, IdentitySegmenter, Index,
    IndexStats, IndexSummary, Indexer, MemoryCollection, Posting, Segmenter, TfIdfWeighting,
    Weighting,
};
pub use similarity::{
    Bm25lParams, Bm25lSimilarity, DocScorer, Explanation, MemoryNorms, NormValues,
    NormalizedWeight, NormsProvider, PayloadScorer, WeightContext,
};
pub use stats::{CollectionStatistics, DocId, FieldInvertState, TermStatistics};
