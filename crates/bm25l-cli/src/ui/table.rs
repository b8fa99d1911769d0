//! Table rendering for CLI output using comfy-table.
//!
//! | Command | Table Function |
//! |---------|----------------|
//! | `bm25l score` | `render_hits_table()` |
//! | `bm25l stats` | `render_terms_table()` |

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, CellAlignment, ColumnConstraint, Table, Width};

use super::format::{format_score, format_thousands, truncate_str};

/// One scored document.
#[derive(Debug, Clone)]
pub struct HitRow {
    /// 1-based rank
    pub rank: usize,
    /// Document name (relative path)
    pub name: String,
    /// Raw term frequency
    pub freq: u32,
    /// Length decoded from the document's norm
    pub length: f32,
    /// BM25L score
    pub score: f32,
}

/// One vocabulary entry.
#[derive(Debug, Clone)]
pub struct TermRow {
    /// Analyzed term
    pub term: String,
    /// Documents containing the term
    pub doc_freq: u64,
    /// Occurrences across all documents
    pub total_freq: u64,
}

/// Render ranked hits for `bm25l score`.
///
/// # Example Output
///
/// ```text
/// RANK  DOCUMENT        FREQ   LENGTH    SCORE
///    1  guide/rank.md      3   3.0000   2.1083
///    2  notes.txt          2  28.4444   0.9310
/// ```
pub fn render_hits_table(hits: &[HitRow]) -> String {
    if hits.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);

    table.set_header(vec![
        Cell::new("RANK").set_alignment(CellAlignment::Right),
        Cell::new("DOCUMENT"),
        Cell::new("FREQ").set_alignment(CellAlignment::Right),
        Cell::new("LENGTH").set_alignment(CellAlignment::Right),
        Cell::new("SCORE").set_alignment(CellAlignment::Right),
    ]);

    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(4)),  // RANK
        ColumnConstraint::LowerBoundary(Width::Fixed(12)), // DOCUMENT
        ColumnConstraint::LowerBoundary(Width::Fixed(4)),  // FREQ
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),  // LENGTH
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),  // SCORE
    ]);

    for hit in hits {
        table.add_row(vec![
            Cell::new(hit.rank).set_alignment(CellAlignment::Right),
            Cell::new(truncate_str(&hit.name, 48)),
            Cell::new(hit.freq).set_alignment(CellAlignment::Right),
            Cell::new(format_score(hit.length)).set_alignment(CellAlignment::Right),
            Cell::new(format_score(hit.score)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.trim_fmt().to_string()
}

/// Render the most frequent terms for `bm25l stats`.
pub fn render_terms_table(terms: &[TermRow]) -> String {
    if terms.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);

    table.set_header(vec![
        Cell::new("TERM"),
        Cell::new("DOCS").set_alignment(CellAlignment::Right),
        Cell::new("OCCURRENCES").set_alignment(CellAlignment::Right),
    ]);

    for row in terms {
        table.add_row(vec![
            Cell::new(truncate_str(&row.term, 32)),
            Cell::new(format_thousands(row.doc_freq)).set_alignment(CellAlignment::Right),
            Cell::new(format_thousands(row.total_freq)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.trim_fmt().to_string()
}
