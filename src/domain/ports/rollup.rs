//! Rollup engine port
//!
//! Flattening every declaration reachable from an entry into one file is
//! delegated to an external tool; this is the request it receives.

use std::path::{Path, PathBuf};

use crate::error::DeclResult;

/// Everything the rollup engine is configured with for one entry
#[derive(Debug, Clone, PartialEq)]
pub struct RollupRequest {
    /// Project root
    pub root: PathBuf,
    /// tsconfig the compiler options came from
    pub config_path: Option<PathBuf>,
    /// Raw `compilerOptions` to override the tsconfig with
    pub compiler_options: serde_json::Value,
    pub out_dir: PathBuf,
    /// Already-emitted declaration to start flattening from
    pub entry_path: PathBuf,
    /// Output file name inside `out_dir`, always a declaration name
    pub file_name: String,
    /// `node_modules/typescript` to compile with; `None` lets the engine
    /// pick its bundled compiler
    pub lib_folder: Option<PathBuf>,
    /// Manifest the engine reads package metadata from
    pub package_json: Option<PathBuf>,
    /// Packages whose declarations get inlined instead of imported
    pub bundled_packages: Vec<String>,
}

impl RollupRequest {
    /// Where the flattened declaration file is written
    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(&self.file_name)
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry_path
    }
}

/// External declaration-flattening engine
pub trait RollupEngine: Send + Sync {
    /// Flatten `request.entry_path` into `request.output_path()`.
    ///
    /// Failing to prepare or run the engine is an error; the build cannot
    /// produce the requested output without it.
    fn rollup(&self, request: &RollupRequest) -> DeclResult<()>;
}
