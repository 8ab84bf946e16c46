//! Svelte resolver
//!
//! Components are typed as the library's generic component class.

use std::path::Path;

use crate::domain::entities::OutputFile;
use crate::domain::ports::{Resolver, TransformContext};
use crate::domain::value_objects::path as paths;
use crate::error::DeclResult;

const SVELTE_SHIM: &str = "export { SvelteComponentTyped as default } from 'svelte';\n";

#[derive(Default)]
pub struct SvelteResolver;

impl SvelteResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for SvelteResolver {
    fn name(&self) -> &str {
        "svelte"
    }

    fn supports(&self, id: &Path) -> bool {
        id.extension().is_some_and(|ext| ext == "svelte")
    }

    fn transform(&self, ctx: &TransformContext<'_>) -> DeclResult<Vec<OutputFile>> {
        let dts = format!("{}.d.ts", ctx.id.display());
        Ok(vec![OutputFile::new(
            paths::relative(ctx.root, Path::new(&dts)),
            SVELTE_SHIM,
        )])
    }
}
