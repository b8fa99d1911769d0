//! Inverse document frequency.
//!
//! ```text
//! idf(df, N) = ln(1 + (N - df + 0.5) / (df + 0.5))
//! ```
//!
//! Non-negative for `0 < df <= N` and non-increasing in `df`.

use super::explanation::Explanation;
use crate::stats::{CollectionStatistics, TermStatistics};

/// IDF of a term occurring in `doc_freq` of `max_doc` documents.
pub fn idf(doc_freq: u64, max_doc: u64) -> f32 {
    let n = max_doc as f64;
    let df = doc_freq as f64;
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln() as f32
}

/// IDF of a single term, with its explanation.
pub fn idf_explain(collection: &CollectionStatistics, term: &TermStatistics) -> Explanation {
    let df = term.doc_freq;
    let max = collection.max_doc;
    Explanation::new(idf(df, max), format!("idf(docFreq={}, maxDocs={})", df, max))
}

/// IDF of a phrase: the sum of each term's IDF, one detail per term.
pub fn idf_explain_phrase(
    collection: &CollectionStatistics,
    terms: &[TermStatistics],
) -> Explanation {
    let details: Vec<Explanation> = terms
        .iter()
        .map(|term| idf_explain(collection, term))
        .collect();
    let total: f32 = details.iter().map(Explanation::value).sum();
    Explanation::with_details(total, "idf(), sum of:", details)
}
