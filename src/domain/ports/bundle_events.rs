//! Bundle Event Port
//!
//! Provides an observable interface for declaration builds.
//! Enables progress reporting, JSON event streams, and debugging.

use std::path::PathBuf;

/// Event emitted during a declaration build
#[derive(Debug, Clone, PartialEq)]
pub enum BundleEvent {
    /// Declaration generation for this flush started
    Started,

    /// Internal progress marker (debug-level)
    Phase { name: &'static str },

    /// The compiler reported declaration diagnostics
    Diagnostics { count: usize, formatted: String },

    /// No library entry is configured; every source file is a root
    NotALibrary,

    /// A declaration file was written
    FileWritten { path: PathBuf },

    /// A write escaped the output directory and was skipped
    OutsideOutDir { path: PathBuf },

    /// A declaration map could not be parsed; written unrelocated
    SourceMapFailed { path: PathBuf, reason: String },

    /// Rollup of declaration files started
    RollupStarted,

    /// Build completed
    Finished { written: usize, duration_ms: u64 },
}

impl BundleEvent {
    /// Warnings are shown even at quiet verbosity
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            BundleEvent::NotALibrary
                | BundleEvent::OutsideOutDir { .. }
                | BundleEvent::SourceMapFailed { .. }
                | BundleEvent::Diagnostics { .. }
        )
    }
}

/// Trait for receiving bundle events
///
/// Implementations can be:
/// - ConsoleEventSink: colored progress in the terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait BundleEventSink: Send + Sync {
    /// Handle a bundle event
    fn on_event(&self, event: BundleEvent);

    /// Check if this sink wants per-file events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BundleEventSink for NoopEventSink {
    fn on_event(&self, _event: BundleEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
