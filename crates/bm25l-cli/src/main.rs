//! # bm25l CLI
//!
//! Command-line front end for `bm25l-core`: indexes a directory of documents
//! in memory and reports statistics, norms and BM25L scores.
//! Run `bm25l --help` for usage information.

mod cli;
mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
