//! Domain Services
//!
//! Pure logic over declaration text and paths. Nothing here touches the
//! file system; callers feed content in and write results out.

pub mod entry_synth;
pub mod public_root;
pub mod resolver_registry;
pub mod rewriter;
pub mod source_map;
pub mod vlq;

pub use entry_synth::{has_default_export, index_content, plan_index_files, IndexPlan};
pub use public_root::query_public_path;
pub use resolver_registry::ResolverRegistry;
pub use rewriter::{clean_vue_path, clean_vue_references, RewriteOptions, Rewriter};
pub use source_map::{rebase_sources, relocate_sources, MapRelocation};
