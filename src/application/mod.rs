//! Application Layer
//!
//! Orchestrates a declaration build on top of the domain services.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain rewriting rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Entry point
//!
//! - `BuildSession` - start, transform, invalidate, write_bundle
//!
//! ## Flush stages
//!
//! - `writer` - rewrite, relocate and write accumulated outputs
//! - `index` - synthesize root declaration files
//! - `rollup` - flatten declarations and prune what is left
//! - `replicate` - copy results into extra output directories

pub mod accumulator;
pub mod index;
pub mod options;
pub mod parallel;
pub mod replicate;
pub mod result;
pub mod rollup;
pub mod session;
pub mod writer;

pub use accumulator::OutputAccumulator;
pub use index::{insert_types_entries, IndexContext};
pub use options::{BuildOptions, LibOptions, DEFAULT_INDEX_NAME, DEFAULT_OUT_DIR};
pub use parallel::{worker_count, WorkerPool};
pub use replicate::replicate_outputs;
pub use result::BundleReport;
pub use rollup::{prune_empty_dirs, rollup_declarations, RollupContext};
pub use session::BuildSession;
pub use writer::{write_outputs, EmittedFiles, OutputLayout, OutputWriter};
