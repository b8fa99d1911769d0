//! Document sources for the indexer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::errors::{Bm25lError, Result};
use crate::stats::DocId;

/// A fixed, ordered set of documents addressed by sequential id.
pub trait DocumentCollection {
    /// Number of documents.
    fn count(&self) -> usize;

    /// Text of document `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the document cannot be read or does not exist.
    fn content(&self, doc_id: DocId) -> io::Result<String>;

    /// Human-readable name of a document, for reports.
    fn name(&self, doc_id: DocId) -> Option<String> {
        if (doc_id as usize) < self.count() {
            Some(format!("#{}", doc_id))
        } else {
            None
        }
    }
}

fn missing(doc_id: DocId, count: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("document {} out of range (collection has {})", doc_id, count),
    )
}

/// Documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    documents: Vec<String>,
}

impl MemoryCollection {
    /// Wrap a list of document texts; ids follow the list order.
    pub fn new<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documents: documents.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a document, returning its id.
    pub fn push(&mut self, text: impl Into<String>) -> DocId {
        self.documents.push(text.into());
        (self.documents.len() - 1) as DocId
    }
}

impl DocumentCollection for MemoryCollection {
    fn count(&self) -> usize {
        self.documents.len()
    }

    fn content(&self, doc_id: DocId) -> io::Result<String> {
        self.documents
            .get(doc_id as usize)
            .cloned()
            .ok_or_else(|| missing(doc_id, self.documents.len()))
    }
}

/// One document per file under a directory.
///
/// The directory is walked once at construction, honoring `.gitignore` and
/// hidden-file rules. Ids follow the sorted relative paths, so they are stable
/// across runs over the same tree.
#[derive(Debug, Clone)]
pub struct DirectoryCollection {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl DirectoryCollection {
    /// Collect the files below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Bm25lError::PathNotFound`] if `root` is not a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Bm25lError::PathNotFound(root.to_path_buf()));
        }

        let mut paths: Vec<PathBuf> = WalkBuilder::new(root)
            .require_git(false)
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();

        tracing::debug!("Found {} documents under {}", paths.len(), root.display());

        Ok(Self {
            root: root.to_path_buf(),
            paths,
        })
    }

    /// The directory the collection was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of document `doc_id`.
    pub fn path(&self, doc_id: DocId) -> Option<&Path> {
        self.paths.get(doc_id as usize).map(PathBuf::as_path)
    }
}

impl DocumentCollection for DirectoryCollection {
    fn count(&self) -> usize {
        self.paths.len()
    }

    fn content(&self, doc_id: DocId) -> io::Result<String> {
        let path = self
            .path(doc_id)
            .ok_or_else(|| missing(doc_id, self.paths.len()))?;
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn name(&self, doc_id: DocId) -> Option<String> {
        let path = self.path(doc_id)?;
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        Some(relative.display().to_string())
    }
}
