//! Output accumulator
//!
//! Pending declaration text keyed by absolute path. Filled while files are
//! transformed and read at every flush. Entries survive a flush so a
//! re-flush after a source change still writes the whole tree. Recording
//! a path twice keeps the later content.
//!
//! Files recorded for a source can be dropped together once that source
//! is deleted.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::domain::entities::OutputFile;

#[derive(Debug, Clone, Default)]
pub struct OutputAccumulator {
    files: BTreeMap<PathBuf, String>,
    owners: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
}

impl OutputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the replaced content
    pub fn record(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Option<String> {
        self.files.insert(path.into(), content.into())
    }

    /// `record`, remembering that `source` produced `path`
    pub fn record_for(
        &mut self,
        source: &Path,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Option<String> {
        let path = path.into();
        self.owners
            .entry(source.to_path_buf())
            .or_default()
            .insert(path.clone());
        self.record(path, content)
    }

    /// Drop every file recorded for `source` that no other source also
    /// produced. Returns the dropped paths.
    pub fn forget(&mut self, source: &Path) -> Vec<PathBuf> {
        let Some(owned) = self.owners.remove(source) else {
            return Vec::new();
        };
        let mut dropped = Vec::new();
        for path in owned {
            let shared = self.owners.values().any(|paths| paths.contains(&path));
            if !shared && self.files.remove(&path).is_some() {
                dropped.push(path);
            }
        }
        dropped
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Every pending file, sorted by path
    pub fn snapshot(&self) -> Vec<OutputFile> {
        self.files
            .iter()
            .map(|(path, content)| OutputFile::new(path.clone(), content.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_writer_wins() {
        let mut acc = OutputAccumulator::new();
        assert_eq!(acc.record("/p/src/a.d.ts", "first"), None);
        assert_eq!(
            acc.record("/p/src/a.d.ts", "second"),
            Some("first".to_string())
        );
        assert_eq!(acc.len(), 1);
        assert_eq!(acc.get(Path::new("/p/src/a.d.ts")), Some("second"));
    }

    #[test]
    fn snapshot_is_sorted_and_keeps_entries() {
        let mut acc = OutputAccumulator::new();
        acc.record("/p/src/b.d.ts", "b");
        acc.record("/p/src/a.d.ts", "a");

        let files = acc.snapshot();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path(), Path::new("/p/src/a.d.ts"));
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn forget_drops_what_a_source_produced() {
        let mut acc = OutputAccumulator::new();
        let source = Path::new("/p/src/a.ts");
        acc.record_for(source, "/p/src/a.d.ts", "a");
        acc.record_for(source, "/p/src/a.d.ts.map", "{}");
        acc.record_for(Path::new("/p/src/b.ts"), "/p/src/b.d.ts", "b");

        assert_eq!(
            acc.forget(source),
            vec![PathBuf::from("/p/src/a.d.ts"), PathBuf::from("/p/src/a.d.ts.map")]
        );
        assert_eq!(acc.len(), 1);
        assert!(acc.forget(source).is_empty());
    }

    #[test]
    fn shared_outputs_survive_one_owner() {
        let mut acc = OutputAccumulator::new();
        acc.record_for(Path::new("/p/src/App.vue"), "/p/src/App.vue.d.ts", "vue");
        acc.record_for(Path::new("/p/src/App.vue.ts"), "/p/src/App.vue.d.ts", "ts");

        assert!(acc.forget(Path::new("/p/src/App.vue")).is_empty());
        assert_eq!(acc.get(Path::new("/p/src/App.vue.d.ts")), Some("ts"));
    }
}
