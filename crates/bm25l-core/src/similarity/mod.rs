//! BM25L similarity.
//!
//! BM25L shifts the length-normalized term frequency by a constant `delta`
//! before saturation, which keeps long documents from being pushed towards
//! zero the way plain BM25 does:
//!
//! ```text
//! c'(q, D)   = tf(q, D) / (1 - b + b * |D| / avgdl)
//! score(q,D) = idf(q) * (k1 + 1) * (c' + delta) / (k1 + c' + delta)   if c' > 0
//!            = 0                                                      otherwise
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! index time:  FieldInvertState ──compute_norm──► u8 norm per (doc, field)
//!
//! query time:  CollectionStatistics + TermStatistics
//!                  │ compute_weight
//!                  ▼
//!              WeightContext ──normalize──► NormalizedWeight
//!                                               │ scorer (per segment)
//!                                               ▼
//!                                           DocScorer ──► score / explain
//! ```
//!
//! ## Key Components
//!
//! - [`norm`]: one-byte length encoding and the shared decode table
//! - [`idf`]: inverse document frequency for terms and phrases
//! - [`weight`]: two-phase per-query weights
//! - [`scorer`]: per-segment document scoring and explanations
//! - [`explanation`]: the explanation tree

pub mod explanation;
pub mod idf;
pub mod norm;
pub mod scorer;
pub mod weight;

pub use explanation::Explanation;
pub use idf::{idf, idf_explain, idf_explain_phrase};
pub use norm::{
    byte315_to_float, decode_norm_value, encode_norm_value, float_to_byte315, MemoryNorms,
    NormValues, NormsProvider,
};
pub use scorer::{DocScorer, PayloadScorer, UnitPayloadScorer};
pub use weight::{avg_field_length, NormalizedWeight, WeightContext};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Bm25lConfig;
use crate::errors::{Bm25lError, Result};
use crate::stats::FieldInvertState;

/// Default term frequency saturation.
pub const DEFAULT_K1: f32 = 1.2;

/// Default length normalization strength.
pub const DEFAULT_B: f32 = 0.75;

/// Default BM25L shift.
pub const DEFAULT_DELTA: f32 = 0.5;

/// BM25L free parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25lParams {
    /// Term frequency saturation. Must be positive.
    pub k1: f32,
    /// Length normalization strength in `[0, 1]`.
    pub b: f32,
    /// Shift applied to the normalized frequency. Must be non-negative.
    pub delta: f32,
}

impl Default for Bm25lParams {
    fn default() -> Self {
        Self {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
            delta: DEFAULT_DELTA,
        }
    }
}

impl Bm25lParams {
    /// Check the parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::InvalidConfiguration`] if `k1 <= 0`, `b` is
    /// outside `[0, 1]`, `delta < 0`, or any value is not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 <= 0.0 {
            return Err(Bm25lError::InvalidConfiguration {
                message: format!("k1 must be a positive number, got {}", self.k1),
                hint: "Set k1 to a positive value (recommended: 1.2)".to_string(),
            });
        }
        if !self.b.is_finite() || !(0.0..=1.0).contains(&self.b) {
            return Err(Bm25lError::InvalidConfiguration {
                message: format!("b must be within [0, 1], got {}", self.b),
                hint: "Set b between 0.0 and 1.0 (recommended: 0.75)".to_string(),
            });
        }
        if !self.delta.is_finite() || self.delta < 0.0 {
            return Err(Bm25lError::InvalidConfiguration {
                message: format!("delta cannot be negative, got {}", self.delta),
                hint: "Set delta to 0.0 or higher (recommended: 0.5)".to_string(),
            });
        }
        Ok(())
    }
}

/// The BM25L ranking model.
///
/// Holds the free parameters and the `discount_overlaps` toggle. Cheap to
/// clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct Bm25lSimilarity {
    params: Bm25lParams,
    discount_overlaps: bool,
    payload_scorer: Arc<dyn PayloadScorer>,
}

impl Default for Bm25lSimilarity {
    fn default() -> Self {
        Self::from_params(Bm25lParams::default())
    }
}

impl Bm25lSimilarity {
    /// BM25L with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::InvalidConfiguration`] for out-of-range values.
    pub fn new(k1: f32, b: f32, delta: f32) -> Result<Self> {
        let params = Bm25lParams { k1, b, delta };
        params.validate()?;
        Ok(Self::from_params(params))
    }

    /// BM25L with the default `k1` and `b` and a custom `delta`.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::InvalidConfiguration`] if `delta` is negative.
    pub fn with_delta(delta: f32) -> Result<Self> {
        Self::new(DEFAULT_K1, DEFAULT_B, delta)
    }

    /// BM25L from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::InvalidConfiguration`] if validation fails.
    pub fn from_config(config: &Bm25lConfig) -> Result<Self> {
        for warning in config.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }
        Ok(Self::from_params(config.params()).with_discount_overlaps(config.discount_overlaps))
    }

    fn from_params(params: Bm25lParams) -> Self {
        Self {
            params,
            discount_overlaps: true,
            payload_scorer: Arc::new(UnitPayloadScorer),
        }
    }

    /// Choose whether zero-increment tokens count towards the norm length.
    pub fn with_discount_overlaps(mut self, discount_overlaps: bool) -> Self {
        self.discount_overlaps = discount_overlaps;
        self
    }

    /// Replace the payload scoring hook used by scorers.
    pub fn with_payload_scorer(mut self, payload_scorer: impl PayloadScorer + 'static) -> Self {
        self.payload_scorer = Arc::new(payload_scorer);
        self
    }

    /// The parameters.
    pub fn params(&self) -> Bm25lParams {
        self.params
    }

    /// Term frequency saturation.
    pub fn k1(&self) -> f32 {
        self.params.k1
    }

    /// Length normalization strength.
    pub fn b(&self) -> f32 {
        self.params.b
    }

    /// BM25L shift.
    pub fn delta(&self) -> f32 {
        self.params.delta
    }

    /// Whether overlap tokens are excluded from the norm length.
    pub fn discount_overlaps(&self) -> bool {
        self.discount_overlaps
    }

    /// Encode the norm byte for an inverted field.
    ///
    /// Must stay in step with [`decode_norm_value`], which scorers use to read
    /// the byte back.
    pub fn compute_norm(&self, state: &FieldInvertState) -> u8 {
        let num_terms = if self.discount_overlaps {
            state.length.saturating_sub(state.num_overlap)
        } else {
            state.length
        };
        encode_norm_value(state.boost, num_terms)
    }

    /// Proximity decay for sloppy phrase matches: `1 / (distance + 1)`.
    pub fn sloppy_freq(&self, distance: u32) -> f32 {
        1.0 / (distance as f32 + 1.0)
    }
}

impl fmt::Display for Bm25lSimilarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BM25L(k1={},b={},delta={})",
            self.params.k1, self.params.b, self.params.delta
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let sim = Bm25lSimilarity::default();
        assert_eq!(sim.k1(), 1.2);
        assert_eq!(sim.b(), 0.75);
        assert_eq!(sim.delta(), 0.5);
        assert!(sim.discount_overlaps());
        assert_eq!(sim.to_string(), "BM25L(k1=1.2,b=0.75,delta=0.5)");
    }

    #[test]
    fn test_with_delta_keeps_other_defaults() {
        let sim = Bm25lSimilarity::with_delta(1.0).unwrap();
        assert_eq!(sim.k1(), DEFAULT_K1);
        assert_eq!(sim.b(), DEFAULT_B);
        assert_eq!(sim.delta(), 1.0);
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(Bm25lSimilarity::new(0.0, 0.75, 0.5).is_err());
        assert!(Bm25lSimilarity::new(1.2, 1.5, 0.5).is_err());
        assert!(Bm25lSimilarity::new(1.2, -0.1, 0.5).is_err());
        assert!(Bm25lSimilarity::new(1.2, 0.75, -0.5).is_err());
        assert!(Bm25lSimilarity::new(f32::NAN, 0.75, 0.5).is_err());
        assert!(Bm25lSimilarity::new(1.2, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_compute_norm_discounts_overlaps() {
        let state = FieldInvertState::new("body", 12).with_overlaps(3);

        let discounting = Bm25lSimilarity::default();
        assert_eq!(discounting.compute_norm(&state), encode_norm_value(1.0, 9));

        let counting = Bm25lSimilarity::default().with_discount_overlaps(false);
        assert_eq!(counting.compute_norm(&state), encode_norm_value(1.0, 12));
    }

    #[test]
    fn test_compute_norm_uses_boost() {
        let sim = Bm25lSimilarity::default();
        let plain = FieldInvertState::new("body", 50);
        let boosted = FieldInvertState::new("body", 50).with_boost(4.0);
        assert_eq!(sim.compute_norm(&boosted), encode_norm_value(4.0, 50));
        assert!(sim.compute_norm(&boosted) > sim.compute_norm(&plain));
    }

    #[test]
    fn test_sloppy_freq() {
        let sim = Bm25lSimilarity::default();
        assert_eq!(sim.sloppy_freq(0), 1.0);
        assert_eq!(sim.sloppy_freq(1), 0.5);
        for distance in 0..100 {
            assert!(sim.sloppy_freq(distance + 1) < sim.sloppy_freq(distance));
        }
    }
}
