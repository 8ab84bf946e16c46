//! OutputFile entity - a pending declaration output
//!
//! OutputFiles are produced by default emission or by resolvers and are
//! keyed by their absolute path: a later file with the same path replaces
//! an earlier one.

use std::path::{Path, PathBuf};

/// A declaration (or declaration map) waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Absolute path this file is recorded under
    path: PathBuf,
    /// Declaration text or source-map JSON
    content: String,
}

impl OutputFile {
    /// Create a new OutputFile
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Get the output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Declaration maps end in `.map`; they are relocated, never rewritten
    pub fn is_source_map(&self) -> bool {
        is_source_map_path(&self.path)
    }

    /// Check if content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn into_parts(self) -> (PathBuf, String) {
        (self.path, self.content)
    }
}

/// `.map` suffix check shared by the write pipeline and replication
pub fn is_source_map_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "map")
}
