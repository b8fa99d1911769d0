//! Term segmentation strategies.
//!
//! A segmenter sees the lowercased words of a document before normalization
//! and may split them into smaller pieces. Every piece it returns is then
//! normalized on its own, exactly like a query word. Parts of a split word are
//! emitted after the whole word with a position increment of zero, so they
//! count as overlaps when norms discount overlapping tokens.

use std::collections::HashSet;

/// One index term produced by a [`Segmenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The term text.
    pub term: String,
    /// Positions advanced by this term; `0` stacks it on the previous term.
    pub position_increment: u32,
}

impl Segment {
    /// A term that advances the position by one.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            position_increment: 1,
        }
    }

    /// A term stacked on the previous position.
    pub fn overlap(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            position_increment: 0,
        }
    }

    /// Whether this term shares the previous term's position.
    pub fn is_overlap(&self) -> bool {
        self.position_increment == 0
    }
}

/// Strategy splitting document words into index term candidates.
pub trait Segmenter: Send + Sync {
    /// Segment the lowercased words of one document, preserving order.
    fn segment(&self, terms: Vec<String>) -> Vec<Segment>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Passes every term through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySegmenter;

impl Segmenter for IdentitySegmenter {
    fn segment(&self, terms: Vec<String>) -> Vec<Segment> {
        terms.into_iter().map(Segment::new).collect()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

/// Splits compound terms into their parts.
///
/// A term containing the joiner character is split on it. Otherwise, if the
/// term can be covered completely by two or more dictionary words (greedy
/// longest match from the left), those words are emitted. The whole term is
/// always kept; parts follow it as overlaps.
#[derive(Debug, Clone)]
pub struct CompoundSegmenter {
    joiner: char,
    dictionary: HashSet<String>,
    min_part_length: usize,
}

/// Default joiner for compound identifiers.
pub const DEFAULT_JOINER: char = '_';

impl Default for CompoundSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_JOINER, std::iter::empty::<String>())
    }
}

impl CompoundSegmenter {
    /// Create a segmenter splitting on `joiner` and on words of `dictionary`.
    ///
    /// Dictionary entries are matched against lowercased, unstemmed words.
    pub fn new<I, S>(joiner: char, dictionary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            joiner,
            dictionary: dictionary.into_iter().map(Into::into).collect(),
            min_part_length: 2,
        }
    }

    /// Ignore parts shorter than `len` bytes. Default: 2
    pub fn with_min_part_length(mut self, len: usize) -> Self {
        self.min_part_length = len;
        self
    }

    /// Parts of `term`, or an empty vector if it is not a compound.
    pub fn split(&self, term: &str) -> Vec<String> {
        if term.contains(self.joiner) {
            let parts: Vec<String> = term
                .split(self.joiner)
                .filter(|part| part.len() >= self.min_part_length)
                .map(str::to_string)
                .collect();
            return if parts.len() >= 2 { parts } else { Vec::new() };
        }

        self.decompose(term)
    }

    fn decompose(&self, term: &str) -> Vec<String> {
        if self.dictionary.is_empty() {
            return Vec::new();
        }

        let mut parts = Vec::new();
        let mut rest = term;
        while !rest.is_empty() {
            let longest = rest
                .char_indices()
                .map(|(i, c)| i + c.len_utf8())
                .rev()
                .filter(|&end| end >= self.min_part_length)
                .find(|&end| self.dictionary.contains(&rest[..end]));

            match longest {
                Some(end) => {
                    parts.push(rest[..end].to_string());
                    rest = &rest[end..];
                }
                None => return Vec::new(),
            }
        }

        if parts.len() >= 2 {
            parts
        } else {
            Vec::new()
        }
    }
}

impl Segmenter for CompoundSegmenter {
    fn segment(&self, terms: Vec<String>) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(terms.len());
        for term in terms {
            let parts = self.split(&term);
            segments.push(Segment::new(term));
            segments.extend(parts.into_iter().map(Segment::overlap));
        }
        segments
    }

    fn name(&self) -> &'static str {
        "compound"
    }
}
