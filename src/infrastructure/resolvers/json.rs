//! JSON resolver
//!
//! `data.json` becomes `data.json.d.ts` declaring the file's literal type.

use std::path::Path;

use crate::domain::entities::OutputFile;
use crate::domain::ports::{Resolver, TransformContext};
use crate::domain::value_objects::path as paths;
use crate::error::DeclResult;

pub struct JsonResolver;

impl JsonResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for JsonResolver {
    fn name(&self) -> &str {
        "json"
    }

    fn supports(&self, id: &Path) -> bool {
        id.extension().is_some_and(|ext| ext == "json")
    }

    fn transform(&self, ctx: &TransformContext<'_>) -> DeclResult<Vec<OutputFile>> {
        let Some(source) = ctx.program.source_file(ctx.id) else {
            return Ok(Vec::new());
        };
        let dts = format!("{}.d.ts", ctx.id.display());
        Ok(vec![OutputFile::new(
            paths::relative(ctx.root, Path::new(&dts)),
            format!(
                "declare const _default: {};\n\nexport default _default;\n",
                source.text
            ),
        )])
    }
}
