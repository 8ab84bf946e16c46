//! declpack - declaration file emitter and bundler for TypeScript libraries
//!
//! declpack drives the TypeScript compiler in declaration-only mode, rewrites
//! the emitted `.d.ts` files (alias resolution, import cleanup, map
//! relocation), writes them under the output directory and optionally
//! synthesizes an index file or rolls everything into one declaration per
//! entry.
//!
//! The library is layered:
//! - `domain` - pure rewriting and path logic behind port traits
//! - `application` - the [`BuildSession`] and its write pipeline
//! - `infrastructure` - file systems, `tsc`, api-extractor, resolvers
//! - `config` - `declpack.toml` loading
//! - `ui`, `watcher` - command line event sinks and the watch loop

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod watcher;

// Re-exports for convenience
pub use application::{BuildOptions, BuildSession, BundleReport, LibOptions};
pub use config::{Config, ConfigWarning};
pub use domain::entities::{Entry, OutputFile};
pub use domain::ports::{BuildHooks, BundleEvent, BundleEventSink, Program, RollupEngine};
pub use error::{DeclError, DeclResult};
pub use watcher::{watch, WatchEvent, WatchOptions};
