//! Library entry points

use std::path::{Path, PathBuf};

use crate::domain::value_objects::file_kind;
use crate::domain::value_objects::path as paths;

/// One externally importable entry of the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry name (table key, or the file's basename for list entries)
    pub name: String,
    /// Absolute path of the entry source
    pub source_path: PathBuf,
}

impl Entry {
    pub fn new(name: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
        }
    }

    /// Entry from a bare path: named after its basename.
    pub fn from_path(path: &Path, root: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, paths::resolve(root, path))
    }

    /// Per-entry root file name for multi-entry libraries (`main.ts` → `main.d.ts`)
    pub fn declaration_file_name(&self) -> String {
        format!("{}.d.ts", file_kind::strip_ts_extension(&self.name))
    }

    /// Where the compiler's declaration for this entry lands, relative to
    /// `entry_root` and re-anchored on `out_dir`.
    pub fn emitted_declaration(&self, entry_root: &Path, out_dir: &Path) -> PathBuf {
        let source = paths::to_slash(&self.source_path);
        let dts = format!("{}.d.ts", file_kind::strip_ts_extension(&source));
        paths::resolve(out_dir, &paths::relative(entry_root, Path::new(&dts)))
    }
}
