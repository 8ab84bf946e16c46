//! Domain Entities
//!
//! - `OutputFile` - a pending declaration output keyed by path
//! - `Entry` - a library entry point
//! - `SourceMapDocument` - a declaration map

mod entry;
mod output_file;
mod source_map;

pub use entry::Entry;
pub use output_file::{is_source_map_path, OutputFile};
pub use source_map::SourceMapDocument;
