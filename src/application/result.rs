//! Bundle Result

use std::path::PathBuf;

/// What one flush produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleReport {
    /// Files in the primary output directory, after rollup
    pub written: Vec<PathBuf>,
    /// Flattened declaration files, empty without rollup
    pub rolled_up: Vec<PathBuf>,
    /// Copies in the extra output directories
    pub replicated: Vec<PathBuf>,
    /// Program version the flush ran against
    pub version: u64,
    pub duration_ms: u64,
}

impl BundleReport {
    pub fn file_count(&self) -> usize {
        self.written.len() + self.replicated.len()
    }
}
