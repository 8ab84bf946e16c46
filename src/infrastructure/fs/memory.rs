//! In-memory File System
//!
//! Backs tests and dry runs. Directories are implicit: a directory exists
//! while some file lives under it, or after `create_dir_all`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::ports::file_system::{DirEntry, FileSystem, FsError, FsResult};

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

/// Thread-safe in-memory file system
#[derive(Debug, Default)]
pub struct MemoryFs {
    state: Mutex<MemoryState>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let path = path.into();
        let mut state = self.lock();
        add_ancestors(&mut state.dirs, &path);
        state.files.insert(path, content.into());
    }

    /// Every file currently stored, sorted by path
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock only means a test thread panicked mid-write
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn add_ancestors(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = path.parent();
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() || !dirs.insert(dir.to_path_buf()) {
            break;
        }
        current = dir.parent();
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &Path) -> FsResult<String> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        self.insert(path, content);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.lock();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn remove(&self, path: &Path) -> FsResult<()> {
        self.lock()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        let mut state = self.lock();
        state.dirs.insert(path.to_path_buf());
        add_ancestors(&mut state.dirs, path);
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> FsResult<Vec<DirEntry>> {
        let state = self.lock();
        if !state.dirs.contains(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        let files = state
            .files
            .keys()
            .filter(|file| file.parent() == Some(path))
            .map(|file| DirEntry {
                path: file.clone(),
                is_dir: false,
            });
        let dirs = state
            .dirs
            .iter()
            .filter(|dir| dir.parent() == Some(path))
            .map(|dir| DirEntry {
                path: dir.clone(),
                is_dir: true,
            });
        let mut entries: Vec<_> = files.chain(dirs).collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn remove_dir(&self, path: &Path) -> FsResult<()> {
        let mut state = self.lock();
        let occupied = state.files.keys().any(|f| f.starts_with(path))
            || state.dirs.iter().any(|d| d != path && d.starts_with(path));
        if occupied {
            return Err(FsError::Other(format!(
                "directory not empty: {}",
                path.display()
            )));
        }
        if !state.dirs.remove(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        Ok(())
    }
}
