//! Resolver port
//!
//! A resolver turns a source format the compiler cannot emit on its own
//! (JSON, single-file components, ...) into declaration outputs. Resolvers
//! only return outputs; writing is the pipeline's job.

use std::path::Path;

use crate::domain::entities::OutputFile;
use crate::error::DeclResult;

use super::program::{LanguageService, Program};

/// Everything a resolver may consult while transforming one file
pub struct TransformContext<'a> {
    /// Absolute path of the file being transformed
    pub id: &'a Path,
    /// Raw file content
    pub code: &'a str,
    /// Public root; relative output paths are resolved against it
    pub root: &'a Path,
    /// Primary output directory
    pub out_dir: &'a Path,
    pub program: &'a dyn Program,
    pub service: &'a dyn LanguageService,
}

/// Per-extension declaration transformer
pub trait Resolver: Send + Sync {
    /// Registry key; a later resolver with the same name replaces this one
    fn name(&self) -> &str;

    fn supports(&self, id: &Path) -> bool;

    /// Produce declaration outputs. Paths are relative to `ctx.root`, or
    /// absolute inside `ctx.out_dir`.
    fn transform(&self, ctx: &TransformContext<'_>) -> DeclResult<Vec<OutputFile>>;
}
