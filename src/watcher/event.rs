//! Watch event types and options

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory watched recursively
    pub root: PathBuf,
    /// Changes under these directories are ignored (build outputs)
    pub ignore_dirs: Vec<PathBuf>,
}

impl WatchOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_dirs: Vec::new(),
        }
    }

    pub fn with_ignored(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.ignore_dirs.extend(dirs);
        self
    }

    pub(crate) fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_dirs.iter().any(|dir| path.starts_with(dir))
            || path
                .components()
                .any(|c| c.as_os_str() == "node_modules" || c.as_os_str() == ".git")
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted {
        root: String,
    },
    FileChanged {
        path: String,
    },
    RebuildStarted,
    RebuildComplete {
        written: usize,
        duration_ms: u64,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Watcher state for debouncing
pub(crate) struct WatcherState {
    pub(crate) pending_changes: BTreeSet<PathBuf>,
    pub(crate) last_change: Option<Instant>,
}

impl WatcherState {
    pub(crate) fn new() -> Self {
        Self {
            pending_changes: BTreeSet::new(),
            last_change: None,
        }
    }

    pub(crate) fn add_change(&mut self, path: PathBuf) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    pub(crate) fn should_sync(&self) -> bool {
        if let Some(last) = self.last_change {
            !self.pending_changes.is_empty() && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
        } else {
            false
        }
    }

    pub(crate) fn take_changes(&mut self) -> Vec<PathBuf> {
        let changes: Vec<_> = std::mem::take(&mut self.pending_changes)
            .into_iter()
            .collect();
        self.last_change = None;
        changes
    }
}

/// Last seen content per file; editors often save without changing anything
#[derive(Default)]
pub(crate) struct ContentTracker {
    contents: HashMap<PathBuf, String>,
}

impl ContentTracker {
    /// Record `content` for `path`; `false` when it is what we saw last time
    pub(crate) fn changed(&mut self, path: &Path, content: String) -> bool {
        match self.contents.get(path) {
            Some(previous) if *previous == content => false,
            _ => {
                self.contents.insert(path.to_path_buf(), content);
                true
            }
        }
    }

    /// Drop what was seen for a deleted `path`
    pub(crate) fn forget(&mut self, path: &Path) {
        self.contents.remove(path);
    }
}
