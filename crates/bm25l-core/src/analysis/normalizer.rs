//! Token normalization: case folding, filtering and stemming.

use std::collections::HashSet;
use std::fmt;

use rust_stemmers::{Algorithm, Stemmer};

use crate::config::AnalysisConfig;

/// Turns a raw word into an index term, or rejects it.
pub struct Normalizer {
    config: AnalysisConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<&'static str>,
}

impl Normalizer {
    /// Create a normalizer for the given analysis settings.
    pub fn new(config: AnalysisConfig) -> Self {
        let stemmer = config
            .stemming
            .then(|| Stemmer::create(Algorithm::English));

        Self {
            config,
            stemmer,
            stopwords: default_stopwords(),
        }
    }

    /// The analysis settings in effect.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Normalize one word.
    ///
    /// Returns `None` for words without any letter, words shorter than the
    /// minimum length (before or after stemming) and, when enabled, stop words.
    pub fn normalize(&self, word: &str) -> Option<String> {
        let lower = word.to_lowercase();

        if !lower.chars().any(char::is_alphabetic) {
            return None;
        }

        if lower.len() < self.config.min_token_length {
            return None;
        }

        if self.config.remove_stopwords && self.stopwords.contains(lower.as_str()) {
            return None;
        }

        let term = match &self.stemmer {
            Some(stemmer) => stemmer.stem(&lower).into_owned(),
            None => lower,
        };

        // stems can fall under the minimum
        if term.len() < self.config.min_token_length {
            return None;
        }

        Some(term)
    }

    /// Whether `word` (already lowercased) is a stop word.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("config", &self.config)
            .field("stopwords", &self.stopwords.len())
            .finish()
    }
}

/// Common English function words.
fn default_stopwords() -> HashSet<&'static str> {
    [
        "a", "an", "the", "in", "on", "at", "to", "of", "with", "by", "from", "as", "into",
        "through", "during", "before", "after", "above", "below", "between", "under", "over",
        "out", "up", "down", "off", "and", "or", "but", "nor", "so", "yet", "i", "you", "he",
        "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your", "his", "its",
        "our", "their", "this", "that", "these", "those", "which", "who", "whom", "whose", "what",
        "where", "when", "how", "why", "is", "are", "was", "were", "be", "been", "being", "have",
        "has", "had", "having", "do", "does", "did", "doing", "will", "would", "could", "should",
        "may", "might", "must", "shall", "can", "not", "no", "all", "any", "both", "each", "few",
        "more", "most", "other", "some", "such", "than", "too", "very", "just", "also", "only",
        "own", "same", "then", "there", "here", "now", "about", "if", "for",
    ]
    .into_iter()
    .collect()
}
