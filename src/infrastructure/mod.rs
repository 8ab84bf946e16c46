//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File system implementations (Local, Memory)
//! - `compiler/` - Program implementations (tsc, in-memory) and tsconfig loading
//! - `rollup/` - Rollup engine (api-extractor)
//! - `resolvers/` - Built-in resolvers (JSON, Vue, Svelte)
//! - `manifest` - package.json reading with a lookup cache

pub mod compiler;
pub mod fs;
pub mod manifest;
pub mod resolvers;
pub mod rollup;

// Re-export for convenience
pub use compiler::{MemoryProgram, TsConfig, TscOptions, TscProgram};
pub use fs::{LocalFs, MemoryFs};
pub use manifest::{ManifestCache, PackageManifest};
pub use resolvers::{builtin_resolvers, JsonResolver, SvelteResolver, VueResolver};
pub use rollup::ApiExtractorRollup;
