//! Text analysis: turning document text into index terms.
//!
//! ```text
//! text ──Tokenizer──► words ──Normalizer──► terms
//! ```
//!
//! [`Parser`] runs both stages. The same parser must analyze documents and
//! query terms, otherwise query terms will not match the index vocabulary.
//! [`Parser::words`] stops after tokenizing (and case folding) so a segmenter
//! can split words before each piece is normalized on its own.

pub mod normalizer;
pub mod tokenizer;

pub use normalizer::Normalizer;
pub use tokenizer::Tokenizer;

use crate::config::AnalysisConfig;

/// Tokenize, then normalize.
#[derive(Debug, Default)]
pub struct Parser {
    tokenizer: Tokenizer,
    normalizer: Normalizer,
}

impl Parser {
    /// Create a parser with the given analysis settings.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            normalizer: Normalizer::new(config),
        }
    }

    /// Terms of `text` in order of appearance, repeats included.
    ///
    /// Words the normalizer rejects are dropped.
    pub fn parse(&self, text: &str) -> Vec<String> {
        self.tokenizer
            .tokenize(text)
            .into_iter()
            .filter_map(|word| self.normalizer.normalize(word))
            .collect()
    }

    /// Lowercased words of `text`, not yet filtered or stemmed.
    pub fn words(&self, text: &str) -> Vec<String> {
        self.tokenizer
            .tokenize(text)
            .into_iter()
            .map(str::to_lowercase)
            .collect()
    }

    /// Normalize a single query word with the document analysis chain.
    pub fn normalize_term(&self, word: &str) -> Option<String> {
        self.normalizer.normalize(word)
    }

    /// The analysis settings in effect.
    pub fn config(&self) -> &AnalysisConfig {
        self.normalizer.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order_and_repeats() {
        let parser = Parser::default();
        let terms = parser.parse("Rust is fast. Rust is safe!");
        assert_eq!(terms, vec!["rust", "fast", "rust", "safe"]);
    }

    #[test]
    fn test_parse_drops_rejected_words() {
        let parser = Parser::default();
        assert!(parser.parse("the of 42 a").is_empty());
    }

    #[test]
    fn test_parse_without_stemming() {
        let parser = Parser::new(AnalysisConfig {
            stemming: false,
            ..Default::default()
        });
        assert_eq!(parser.parse("Indexing documents"), vec!["indexing", "documents"]);
    }

    #[test]
    fn test_words_are_lowercased_but_not_stemmed() {
        let parser = Parser::default();
        assert_eq!(parser.words("The Running_Shoes, 42"), vec!["the", "running_shoes", "42"]);
    }

    #[test]
    fn test_query_term_matches_document_term() {
        let parser = Parser::default();
        let doc_terms = parser.parse("searching searched");
        let query = parser.normalize_term("Search").unwrap();
        assert!(doc_terms.iter().all(|t| *t == query));
    }
}
