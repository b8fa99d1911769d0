//! # CLI UI Module
//!
//! Styling and formatting for `bm25l` output. Colors respect `NO_COLOR` and
//! the `--color` flag; every command also has a `--json` form for scripts.
//!
//! ## Module Structure
//!
//! - `color`: Color mode detection and terminal capability checks
//! - `style`: Message types, prefixes, and styling functions
//! - `format`: Number and string formatters
//! - `table`: Table rendering with comfy-table

pub mod color;
pub mod format;
pub mod style;
pub mod table;

pub use color::ColorMode;
pub use style::{MessageType, Style};
