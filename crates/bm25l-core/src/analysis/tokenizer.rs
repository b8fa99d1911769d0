//! Unicode word segmentation.

use unicode_segmentation::UnicodeSegmentation;

/// Splits text into words on Unicode word boundaries (UAX #29).
///
/// Punctuation and whitespace are dropped; case is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a tokenizer.
    pub fn new() -> Self {
        Self
    }

    /// Words of `text`, in order of appearance.
    pub fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.unicode_words().collect()
    }
}
