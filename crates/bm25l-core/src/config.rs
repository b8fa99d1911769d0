//! Configuration for the scoring model and the analysis chain.
//!
//! Loaded from YAML. Every key is optional; missing keys take the defaults
//! below, and a missing file yields [`Bm25lConfig::default`].
//!
//! ```yaml
//! k1: 1.2
//! b: 0.75
//! delta: 0.5
//! discountOverlaps: true
//! field: body
//! analysis:
//!   stemming: true
//!   removeStopwords: true
//!   minTokenLength: 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Bm25lError, Result};
use crate::similarity::{Bm25lParams, DEFAULT_B, DEFAULT_DELTA, DEFAULT_K1};

/// Default name of the indexed text field.
pub const DEFAULT_FIELD: &str = "body";

/// Scoring and indexing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bm25lConfig {
    /// Term frequency saturation. Default: 1.2
    #[serde(default = "default_k1")]
    pub k1: f32,

    /// Length normalization strength, 0 = none, 1 = full. Default: 0.75
    #[serde(default = "default_b")]
    pub b: f32,

    /// BM25L shift applied to the normalized term frequency. Default: 0.5
    #[serde(default = "default_delta")]
    pub delta: f32,

    /// Exclude zero-increment tokens from the length stored in norms.
    /// Default: true
    #[serde(default = "default_discount_overlaps")]
    pub discount_overlaps: bool,

    /// Name of the indexed text field. Default: "body"
    #[serde(default = "default_field")]
    pub field: String,

    /// Analysis chain settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_k1() -> f32 {
    DEFAULT_K1
}

fn default_b() -> f32 {
    DEFAULT_B
}

fn default_delta() -> f32 {
    DEFAULT_DELTA
}

fn default_discount_overlaps() -> bool {
    true
}

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

impl Default for Bm25lConfig {
    fn default() -> Self {
        Self {
            k1: default_k1(),
            b: default_b(),
            delta: default_delta(),
            discount_overlaps: default_discount_overlaps(),
            field: default_field(),
            analysis: AnalysisConfig::default(),
        }
    }
}

/// Settings for the tokenize-then-normalize chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Apply English Snowball stemming. Default: true
    #[serde(default = "default_stemming")]
    pub stemming: bool,

    /// Drop common English stop words. Default: true
    #[serde(default = "default_remove_stopwords")]
    pub remove_stopwords: bool,

    /// Minimum token length (bytes) to keep. Default: 2
    #[serde(default = "default_min_token_length")]
    pub min_token_length: usize,
}

fn default_stemming() -> bool {
    true
}

fn default_remove_stopwords() -> bool {
    true
}

fn default_min_token_length() -> usize {
    2
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stemming: default_stemming(),
            remove_stopwords: default_remove_stopwords(),
            min_token_length: default_min_token_length(),
        }
    }
}

impl Bm25lConfig {
    /// Load configuration from a YAML file.
    ///
    /// Returns the defaults if the file does not exist. Values are not
    /// validated here, so callers can layer overrides on top first; call
    /// [`Bm25lConfig::validate`] on the final result.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::InvalidConfig`] if the file cannot be read or
    /// parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            Bm25lError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            Bm25lError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The scoring parameters.
    pub fn params(&self) -> Bm25lParams {
        Bm25lParams {
            k1: self.k1,
            b: self.b,
            delta: self.delta,
        }
    }

    /// Validate the configuration, returning warnings for unusual values.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::InvalidConfiguration`] if:
    /// - `k1` is not positive
    /// - `b` is outside `[0, 1]`
    /// - `delta` is negative
    /// - `field` is empty
    ///
    /// # Warnings
    ///
    /// - `k1 > 3.0`, where term frequency barely saturates
    /// - `delta > 1.5`, which lets a single occurrence dominate
    /// - `b == 0` with `delta > 0`, where the shift no longer corrects length bias
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        self.params().validate()?;

        if self.field.trim().is_empty() {
            return Err(Bm25lError::InvalidConfiguration {
                message: "field cannot be empty".to_string(),
                hint: format!("Set field to the indexed field name (default: {})", DEFAULT_FIELD),
            });
        }

        if self.k1 > 3.0 {
            warnings.push(format!(
                "k1={} is very large; term frequency will barely saturate (recommended: 1.2)",
                self.k1
            ));
        }

        if self.delta > 1.5 {
            warnings.push(format!(
                "delta={} is very large; one occurrence will dominate (recommended: 0.5)",
                self.delta
            ));
        }

        if self.b == 0.0 && self.delta > 0.0 {
            warnings.push(
                "b=0 disables length normalization; delta no longer corrects for long documents"
                    .to_string(),
            );
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Bm25lConfig::default();
        assert!((config.k1 - 1.2).abs() < 0.001);
        assert!((config.b - 0.75).abs() < 0.001);
        assert!((config.delta - 0.5).abs() < 0.001);
        assert!(config.discount_overlaps);
        assert_eq!(config.field, "body");
        assert!(config.analysis.stemming);
        assert!(config.analysis.remove_stopwords);
        assert_eq!(config.analysis.min_token_length, 2);
    }

    #[test]
    fn test_default_is_valid() {
        let warnings = Bm25lConfig::default().validate().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "delta: 1.0\nanalysis:\n  stemming: false\n";
        let config: Bm25lConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.delta, 1.0);
        assert_eq!(config.k1, 1.2);
        assert!(!config.analysis.stemming);
        assert!(config.analysis.remove_stopwords);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_k1 = Bm25lConfig {
            k1: 0.0,
            ..Default::default()
        };
        assert!(bad_k1.validate().is_err());

        let bad_b = Bm25lConfig {
            b: 1.2,
            ..Default::default()
        };
        let err = bad_b.validate().unwrap_err();
        assert!(err.to_string().contains("b must be within"));

        let bad_delta = Bm25lConfig {
            delta: -1.0,
            ..Default::default()
        };
        assert!(bad_delta.validate().is_err());

        let bad_field = Bm25lConfig {
            field: "  ".to_string(),
            ..Default::default()
        };
        assert!(bad_field.validate().is_err());
    }

    #[test]
    fn test_validate_warnings() {
        let config = Bm25lConfig {
            k1: 5.0,
            b: 0.0,
            ..Default::default()
        };
        let warnings = config.validate().unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("saturate")));
        assert!(warnings.iter().any(|w| w.contains("length normalization")));
    }

    #[test]
    fn test_from_path_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = Bm25lConfig::from_path(&temp.path().join("missing.yaml")).unwrap();
        assert_eq!(config, Bm25lConfig::default());
    }

    #[test]
    fn test_from_path_parses_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bm25l.yaml");
        fs::write(&path, "k1: 2.0\nb: 0.5\ndiscountOverlaps: false\nfield: content\n").unwrap();

        let config = Bm25lConfig::from_path(&path).unwrap();
        assert_eq!(config.k1, 2.0);
        assert_eq!(config.b, 0.5);
        assert!(!config.discount_overlaps);
        assert_eq!(config.field, "content");
    }

    #[test]
    fn test_from_path_leaves_validation_to_caller() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bm25l.yaml");
        fs::write(&path, "k1: 0\n").unwrap();

        let mut config = Bm25lConfig::from_path(&path).unwrap();
        assert!(config.validate().is_err());

        config.k1 = 1.2;
        assert!(config.validate().unwrap().is_empty());
    }

    #[test]
    fn test_from_path_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bm25l.yaml");
        fs::write(&path, "k1: [not, a, number]\n").unwrap();

        let err = Bm25lConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, Bm25lError::InvalidConfig(_)));
    }
}
