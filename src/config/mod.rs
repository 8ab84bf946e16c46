//! Configuration module for declpack
//!
//! Settings are resolved in this order:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (DECLPACK_*)
//! 3. Project config (`declpack.toml`)
//! 4. tsconfig `outDir`, `include` and `exclude`
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{apply_overrides, build_options, ConfigWarning, CONFIG_FILE};
pub use types::{
    AliasConfig, ColorMode, CompilerConfig, Config, EntryConfig, LibConfig, OneOrMany,
    OutputConfig, RollupConfig, Verbosity,
};
