//! Shared test utilities for bm25l-cli integration tests.

use std::fs;
use std::path::Path;

use assert_cmd::Command;

/// Get a Command for the bm25l binary, isolated from the caller's environment.
///
/// # Panics
///
/// Panics if the bm25l binary cannot be found.
#[allow(deprecated)]
pub fn bm25l_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bm25l").expect("bm25l binary should exist");
    cmd.env_remove("BM25L_CONFIG")
        .env_remove("BM25L_VERBOSE")
        .env_remove("BM25L_QUIET")
        .env("BM25L_COLOR", "never");
    cmd
}

/// Write a small corpus into `dir/docs` and return that directory.
pub fn write_corpus(dir: &Path) -> std::path::PathBuf {
    let docs = dir.join("docs");
    fs::create_dir_all(&docs).expect("create docs dir");
    fs::write(docs.join("a.txt"), "lucene scoring with bm25").expect("write a.txt");
    fs::write(
        docs.join("b.txt"),
        "bm25l improves ranking for long documents because long documents \
         should not lose every ranking contest",
    )
    .expect("write b.txt");
    fs::write(docs.join("c.txt"), "ranking ranking ranking").expect("write c.txt");
    docs
}
