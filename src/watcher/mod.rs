//! File watcher for continuous declaration builds
//!
//! Implements the `watch` command with:
//! - Debouncing (100ms)
//! - Content checks so no-op saves do not rebuild
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

mod event;
mod rebuild;

pub use event::{WatchEvent, WatchOptions, DEBOUNCE_MS};
pub use rebuild::{apply_changes, watch};
