//! Posting weight strategies.

/// Computes the stored weight of a posting once the index is complete.
pub trait Weighting: Send + Sync {
    /// Weight of a term occurring `term_freq` times in a document, where the
    /// term appears in `doc_freq` of `doc_count` documents.
    fn weight(&self, term_freq: u32, doc_freq: u64, doc_count: u64) -> f32;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Log-scaled tf-idf: `(1 + log10 tf) * log10(N / df)`.
///
/// Zero when the term is absent or occurs in every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfWeighting;

impl Weighting for TfIdfWeighting {
    fn weight(&self, term_freq: u32, doc_freq: u64, doc_count: u64) -> f32 {
        if term_freq == 0 || doc_freq == 0 || doc_count == 0 {
            return 0.0;
        }
        let tf = 1.0 + (term_freq as f64).log10();
        let idf = (doc_count as f64 / doc_freq as f64).log10();
        (tf * idf) as f32
    }

    fn name(&self) -> &'static str {
        "tf-idf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tf_idf_values() {
        let w = TfIdfWeighting;
        assert!((w.weight(1, 1, 10) - 1.0).abs() < 1e-6);
        assert!((w.weight(10, 1, 100) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_tf_idf_degenerate_inputs() {
        let w = TfIdfWeighting;
        assert_eq!(w.weight(0, 1, 10), 0.0);
        assert_eq!(w.weight(3, 0, 10), 0.0);
        assert_eq!(w.weight(3, 10, 10), 0.0);
    }
}
