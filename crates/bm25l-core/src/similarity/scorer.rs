//! Per-segment document scoring.
//!
//! A [`DocScorer`] is bound to one normalized weight and one segment's norm
//! values for the weight's field. `score` and `explain` share the same
//! arithmetic, so a document's explanation always reproduces its score.
//!
//! The score multiplies by the raw idf. The query boost and top-level boost
//! folded into [`NormalizedWeight::combined_weight`] (and thus
//! [`DocScorer::weight_value`]) do not reach `score`.

use std::fmt;

use super::explanation::Explanation;
use super::norm::{decode_norm_value, NormValues, NormsProvider};
use super::weight::NormalizedWeight;
use super::{Bm25lParams, Bm25lSimilarity};
use crate::errors::{Bm25lError, Result};
use crate::stats::DocId;

/// Scores a payload attached to a matching position.
///
/// The BM25L model itself ignores payloads; implement this to weight them.
pub trait PayloadScorer: fmt::Debug + Send + Sync {
    /// Factor for the payload of `doc` at positions `start..end`.
    fn compute_payload_factor(&self, _doc: DocId, _start: u32, _end: u32, _payload: &[u8]) -> f32 {
        1.0
    }
}

/// Payload hook that always returns `1.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitPayloadScorer;

impl PayloadScorer for UnitPayloadScorer {}

impl Bm25lSimilarity {
    /// Create a scorer for one segment.
    ///
    /// The field's norm values are opened once here and reused for every
    /// document.
    ///
    /// # Errors
    ///
    /// - [`Bm25lError::Io`] if the norm source cannot be opened.
    /// - [`Bm25lError::InvalidAverageLength`] if the weight's average length is
    ///   not a positive finite number, since length normalization divides by it.
    pub fn scorer<'a, P>(
        &'a self,
        weight: &'a NormalizedWeight,
        provider: &'a P,
    ) -> Result<DocScorer<'a>>
    where
        P: NormsProvider + ?Sized,
    {
        let avgdl = weight.avg_document_length();
        if !avgdl.is_finite() || avgdl <= 0.0 {
            return Err(Bm25lError::InvalidAverageLength {
                field: weight.field().to_string(),
                avgdl,
                b: self.params.b,
            });
        }

        let norms = provider.norm_values(weight.field())?;
        Ok(DocScorer {
            weight,
            params: self.params,
            weight_value: weight.combined_weight() * (self.params.k1 + 1.0),
            norms,
            similarity: self,
        })
    }
}

/// Scores documents of one segment against one weight.
///
/// Reads norms through a single handle, so use one scorer per scoring thread.
pub struct DocScorer<'a> {
    weight: &'a NormalizedWeight,
    params: Bm25lParams,
    weight_value: f32,
    norms: Box<dyn NormValues + 'a>,
    similarity: &'a Bm25lSimilarity,
}

impl<'a> DocScorer<'a> {
    /// BM25L score of `doc` for a raw term frequency.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::Io`] if the document's norm cannot be read.
    pub fn score(&self, doc: DocId, freq: f32) -> Result<f32> {
        let doc_len = self.document_length(doc)?;
        Ok(self.weight.idf().value() * self.tf_norm(freq, doc_len))
    }

    /// Explain the score of `doc`, given an explanation of its frequency.
    ///
    /// The root value equals [`DocScorer::score`] for `freq.value()`.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::Io`] if the document's norm cannot be read.
    pub fn explain(&self, doc: DocId, freq: Explanation) -> Result<Explanation> {
        let doc_len = self.document_length(doc)?;
        let freq_value = freq.value();
        let Bm25lParams { k1, b, delta } = self.params;
        let avgdl = self.weight.avg_document_length();

        let tf_norm = Explanation::with_details(
            self.tf_norm(freq_value, doc_len),
            "tfNorm, computed from:",
            vec![
                freq,
                Explanation::new(k1, "parameter k1"),
                Explanation::new(delta, "parameter delta"),
                Explanation::new(b, "parameter b"),
                Explanation::new(avgdl, "avgDocumentLength"),
                Explanation::new(doc_len, "documentLength"),
            ],
        );

        let idf = self.weight.idf().clone();
        let value = idf.value() * tf_norm.value();
        Ok(Explanation::with_details(
            value,
            format!("score(doc={},freq={}), product of:", doc, freq_value),
            vec![idf, tf_norm],
        ))
    }

    /// Proximity decay for sloppy phrase matches: `1 / (distance + 1)`.
    pub fn compute_slop_factor(&self, distance: u32) -> f32 {
        self.similarity.sloppy_freq(distance)
    }

    /// Payload factor from the similarity's payload hook; `1.0` by default.
    pub fn compute_payload_factor(&self, doc: DocId, start: u32, end: u32, payload: &[u8]) -> f32 {
        self.similarity
            .payload_scorer
            .compute_payload_factor(doc, start, end, payload)
    }

    /// `combined_weight * (k1 + 1)`, computed at construction.
    ///
    /// Not used by [`DocScorer::score`], which multiplies by the raw idf.
    pub fn weight_value(&self) -> f32 {
        self.weight_value
    }

    /// The weight this scorer was built from.
    pub fn weight(&self) -> &NormalizedWeight {
        self.weight
    }

    /// Approximate length of `doc`, decoded from its norm byte.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::Io`] if the norm cannot be read.
    pub fn document_length(&self, doc: DocId) -> Result<f32> {
        Ok(decode_norm_value(self.norms.get(doc)?))
    }

    /// `(k1 + 1) * (c' + delta) / (k1 + c' + delta)`, or `0` when `c'` is not
    /// positive.
    fn tf_norm(&self, freq: f32, doc_len: f32) -> f32 {
        let Bm25lParams { k1, b, delta } = self.params;
        let avgdl = self.weight.avg_document_length();
        let normalized_freq = freq / (1.0 - b + b * doc_len / avgdl);
        if normalized_freq > 0.0 {
            (k1 + 1.0) * (normalized_freq + delta) / (k1 + (normalized_freq + delta))
        } else {
            0.0
        }
    }
}

impl fmt::Debug for DocScorer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocScorer")
            .field("field", &self.weight.field())
            .field("params", &self.params)
            .field("weight_value", &self.weight_value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::similarity::norm::{encode_norm_value, MemoryNorms};
    use crate::similarity::weight::WeightContext;
    use crate::stats::{CollectionStatistics, TermStatistics};

    const DOC: DocId = 0;

    /// Weight for df=10, N=1000 whose average length equals the decoded length
    /// of a 100-token document, so the normalized frequency equals the raw one.
    fn scenario(query_boost: f32) -> (NormalizedWeight, MemoryNorms) {
        let norms = MemoryNorms::from_lengths("body", &[100, 10, 1000]);
        let decoded = decode_norm_value(encode_norm_value(1.0, 100));
        let idf = crate::similarity::idf::idf_explain(
            &CollectionStatistics::new("body", 1000, 0),
            &TermStatistics::new("rust", 10),
        );
        let weight = WeightContext::new("body", idf, query_boost, decoded).normalize(1.0, 1.0);
        (weight, norms)
    }

    #[test]
    fn test_reference_scenario() {
        let sim = Bm25lSimilarity::default();
        let (weight, norms) = scenario(1.0);
        let scorer = sim.scorer(&weight, &norms).unwrap();

        // idf = ln(1 + 990.5 / 10.5), normalized freq = 2
        let score = scorer.score(DOC, 2.0).unwrap();
        let expected = 4.557_4f32 * 2.2 * 2.5 / 3.7;
        assert!((score - expected).abs() < 1e-3, "{score} vs {expected}");
        assert!((score - 6.77).abs() < 0.02);
    }

    #[test]
    fn test_zero_freq_scores_zero() {
        let sim = Bm25lSimilarity::default();
        let (weight, norms) = scenario(1.0);
        let scorer = sim.scorer(&weight, &norms).unwrap();
        for doc in 0..3 {
            assert_eq!(scorer.score(doc, 0.0).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_score_increases_with_freq() {
        let sim = Bm25lSimilarity::default();
        let (weight, norms) = scenario(1.0);
        let scorer = sim.scorer(&weight, &norms).unwrap();

        let mut previous = scorer.score(DOC, 0.5).unwrap();
        for freq in 1..200 {
            let score = scorer.score(DOC, freq as f32).unwrap();
            assert!(score > previous, "freq {freq}: {score} <= {previous}");
            previous = score;
        }
    }

    #[test]
    fn test_delta_keeps_long_documents_positive() {
        let bm25l = Bm25lSimilarity::default();
        let plain = Bm25lSimilarity::new(1.2, 0.75, 0.0).unwrap();
        let (weight, norms) = scenario(1.0);

        // doc 2 is ten times longer than average
        let with_delta = bm25l.scorer(&weight, &norms).unwrap().score(2, 1.0).unwrap();
        let without_delta = plain.scorer(&weight, &norms).unwrap().score(2, 1.0).unwrap();

        assert!(with_delta > 0.0);
        assert!(with_delta > without_delta);
    }

    #[test]
    fn test_boosts_do_not_affect_score() {
        let sim = Bm25lSimilarity::default();
        let (plain, norms) = scenario(1.0);
        let (boosted_ctx, _) = scenario(5.0);
        let boosted = boosted_ctx.context().clone().normalize(0.3, 7.0);

        let plain_scorer = sim.scorer(&plain, &norms).unwrap();
        let boosted_scorer = sim.scorer(&boosted, &norms).unwrap();

        assert_eq!(
            plain_scorer.score(DOC, 3.0).unwrap(),
            boosted_scorer.score(DOC, 3.0).unwrap()
        );
        // The boosts are still carried by the precomputed weight value.
        let expected = boosted.idf().value() * 5.0 * 7.0 * 2.2;
        assert!((boosted_scorer.weight_value() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_explain_matches_score() {
        let sim = Bm25lSimilarity::new(1.5, 0.6, 0.8).unwrap();
        let (weight, norms) = scenario(2.0);
        let scorer = sim.scorer(&weight, &norms).unwrap();

        for doc in 0..3 {
            for freq in [0.0f32, 1.0, 2.0, 7.0, 31.0] {
                let score = scorer.score(doc, freq).unwrap();
                let explanation = scorer
                    .explain(doc, Explanation::new(freq, "termFreq"))
                    .unwrap();
                assert_eq!(explanation.value(), score, "doc {doc} freq {freq}");
            }
        }
    }

    #[test]
    fn test_explain_structure() {
        let sim = Bm25lSimilarity::default();
        let (weight, norms) = scenario(1.0);
        let scorer = sim.scorer(&weight, &norms).unwrap();
        let explanation = scorer.explain(DOC, Explanation::new(2.0, "termFreq=2")).unwrap();

        assert_eq!(explanation.description(), "score(doc=0,freq=2), product of:");
        let [idf, tf_norm] = explanation.details() else {
            panic!("expected idf and tfNorm details");
        };
        assert_eq!(idf.description(), "idf(docFreq=10, maxDocs=1000)");
        assert_eq!(tf_norm.description(), "tfNorm, computed from:");

        let labels: Vec<&str> = tf_norm.details().iter().map(Explanation::description).collect();
        assert_eq!(
            labels,
            vec![
                "termFreq=2",
                "parameter k1",
                "parameter delta",
                "parameter b",
                "avgDocumentLength",
                "documentLength",
            ]
        );
        assert_eq!(tf_norm.details()[5].value(), scorer.document_length(DOC).unwrap());
        assert!((tf_norm.value() - 2.2 * 2.5 / 3.7).abs() < 1e-4);
    }

    #[test]
    fn test_slop_and_payload_factors() {
        let sim = Bm25lSimilarity::default();
        let (weight, norms) = scenario(1.0);
        let scorer = sim.scorer(&weight, &norms).unwrap();

        assert_eq!(scorer.compute_slop_factor(0), 1.0);
        assert!(scorer.compute_slop_factor(3) < scorer.compute_slop_factor(2));
        assert_eq!(scorer.compute_payload_factor(DOC, 0, 1, b"payload"), 1.0);
    }

    #[derive(Debug)]
    struct LengthPayload;

    impl PayloadScorer for LengthPayload {
        fn compute_payload_factor(
            &self,
            _doc: DocId,
            _start: u32,
            _end: u32,
            payload: &[u8],
        ) -> f32 {
            payload.len() as f32
        }
    }

    #[test]
    fn test_custom_payload_scorer() {
        let sim = Bm25lSimilarity::default().with_payload_scorer(LengthPayload);
        let (weight, norms) = scenario(1.0);
        let scorer = sim.scorer(&weight, &norms).unwrap();
        assert_eq!(scorer.compute_payload_factor(DOC, 0, 1, b"abc"), 3.0);
    }

    #[test]
    fn test_zero_average_length_rejected() {
        let sim = Bm25lSimilarity::default();
        let (weight, norms) = scenario(1.0);
        let broken = WeightContext::new("body", weight.idf().clone(), 1.0, 0.0).normalize(1.0, 1.0);

        let err = sim.scorer(&broken, &norms).unwrap_err();
        assert!(matches!(err, Bm25lError::InvalidAverageLength { .. }));
    }

    #[derive(Debug)]
    struct FailingNorms;

    impl NormsProvider for FailingNorms {
        fn norm_values(&self, _field: &str) -> io::Result<Box<dyn NormValues + '_>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "norms locked"))
        }
    }

    #[test]
    fn test_norm_source_error_propagates() {
        let sim = Bm25lSimilarity::default();
        let (weight, _) = scenario(1.0);

        let err = sim.scorer(&weight, &FailingNorms).unwrap_err();
        match err {
            Bm25lError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_doc_norm_propagates() {
        let sim = Bm25lSimilarity::default();
        let (weight, norms) = scenario(1.0);
        let scorer = sim.scorer(&weight, &norms).unwrap();

        assert!(matches!(scorer.score(99, 1.0), Err(Bm25lError::Io(_))));
        assert!(matches!(
            scorer.explain(99, Explanation::new(1.0, "freq")),
            Err(Bm25lError::Io(_))
        ));
    }

    #[test]
    fn test_zero_norm_byte_scores_zero() {
        let sim = Bm25lSimilarity::default();
        let (weight, _) = scenario(1.0);
        let norms = MemoryNorms::new("body", vec![0]);
        let scorer = sim.scorer(&weight, &norms).unwrap();
        assert_eq!(scorer.score(DOC, 5.0).unwrap(), 0.0);
    }
}
