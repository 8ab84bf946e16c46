//! Vue single-file component resolver
//!
//! The compiler sees a component through one of its virtual script files
//! (`App.vue.ts`, `App.vue.tsx`, ...). Declarations are emitted for that
//! file; when declaration maps are on their sources are pointed back at the
//! `.vue` file and the mappings shifted past the template block.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::{is_source_map_path, OutputFile, SourceMapDocument};
use crate::domain::ports::{Resolver, SourceFile, TransformContext};
use crate::domain::services::vlq;
use crate::domain::value_objects::path as paths;
use crate::error::DeclResult;

static SCRIPT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*<script.*>").expect("valid script tag regex"));

const VIRTUAL_SUFFIXES: &[&str] = &["", ".ts", ".js", ".tsx", ".jsx"];

#[derive(Default)]
pub struct VueResolver;

impl VueResolver {
    pub fn new() -> Self {
        Self
    }

    fn find_source(ctx: &TransformContext<'_>) -> Option<SourceFile> {
        VIRTUAL_SUFFIXES.iter().find_map(|suffix| {
            let candidate = PathBuf::from(format!("{}{}", ctx.id.display(), suffix));
            ctx.program.source_file(&candidate)
        })
    }
}

impl Resolver for VueResolver {
    fn name(&self) -> &str {
        "vue"
    }

    fn supports(&self, id: &Path) -> bool {
        id.extension().is_some_and(|ext| ext == "vue")
    }

    fn transform(&self, ctx: &TransformContext<'_>) -> DeclResult<Vec<OutputFile>> {
        let Some(source) = Self::find_source(ctx) else {
            return Ok(Vec::new());
        };

        let current_dir = ctx.program.current_directory();
        let mut outputs: Vec<OutputFile> = ctx
            .service
            .emit_output(&source.file_name, true, false)
            .output_files
            .into_iter()
            .map(|file| {
                let absolute = paths::resolve(current_dir, &file.name);
                OutputFile::new(paths::relative(current_dir, &absolute), file.text)
            })
            .collect();

        if !ctx.program.compiler_options().declaration_map {
            return Ok(outputs);
        }

        let lines_before_script = lines_before_script(ctx.code);
        for output in &mut outputs {
            if !is_source_map_path(output.path()) {
                continue;
            }
            // An unreadable map is passed through as emitted
            if let Some(content) = remap_to_component(output.content(), lines_before_script) {
                *output = OutputFile::new(output.path().to_path_buf(), content);
            }
        }

        Ok(outputs)
    }
}

/// Lines preceding the first `<script>` block, or `None` when the component
/// starts with the script or has none.
fn lines_before_script(code: &str) -> Option<usize> {
    let found = SCRIPT_OPEN.find(code)?;
    let before = &code[..found.start()];
    if before.is_empty() {
        return None;
    }
    Some(before.split('\n').count())
}

fn remap_to_component(content: &str, lines_before_script: Option<usize>) -> Option<String> {
    let mut map = SourceMapDocument::parse(content).ok()?;
    map.map_sources(|source| match source.strip_suffix(".vue.ts") {
        Some(stem) => format!("{}.vue", stem),
        None => source.to_string(),
    });
    if let Some(lines) = lines_before_script {
        let shift = vlq::encode_segment(&[0, 0, lines as i64, 0]);
        map.mappings = format!("{};{}", shift, map.mappings);
    }
    map.to_json().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CompilerOptions;
    use crate::infrastructure::compiler::MemoryProgram;

    const COMPONENT: &str = "<template>\n  <div />\n</template>\n\n<script setup lang=\"ts\">\ndefineProps<{ a: string }>()\n</script>\n";

    fn ctx<'a>(program: &'a MemoryProgram, code: &'a str) -> TransformContext<'a> {
        TransformContext {
            id: Path::new("/p/src/App.vue"),
            code,
            root: Path::new("/p/src"),
            out_dir: Path::new("/p/dist"),
            program,
            service: program,
        }
    }

    #[test]
    fn emits_through_virtual_script_file() {
        let program = MemoryProgram::new("/p/src")
            .with_source("/p/src/App.vue.ts", "")
            .with_emit("/p/src/App.vue.ts", "/p/src/App.vue.d.ts", "declare const _default: {};\n");

        let outputs = VueResolver::new().transform(&ctx(&program, COMPONENT)).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].path(), Path::new("App.vue.d.ts"));
    }

    #[test]
    fn maps_point_back_at_component() {
        let program = MemoryProgram::new("/p/src")
            .with_options(CompilerOptions {
                declaration_map: true,
                ..CompilerOptions::default()
            })
            .with_source("/p/src/App.vue.ts", "")
            .with_emit("/p/src/App.vue.ts", "App.vue.d.ts", "export {};\n")
            .with_emit(
                "/p/src/App.vue.ts",
                "App.vue.d.ts.map",
                r#"{"version":3,"sources":["App.vue.ts"],"mappings":"AAAA"}"#,
            );

        let outputs = VueResolver::new().transform(&ctx(&program, COMPONENT)).unwrap();
        let map = SourceMapDocument::parse(outputs[1].content()).unwrap();
        assert_eq!(map.sources, vec!["App.vue"]);
        // Three lines precede the blank line and script block
        assert_eq!(map.mappings, "AAGA;AAAA");
    }

    #[test]
    fn script_first_components_are_not_shifted() {
        assert_eq!(lines_before_script("<script lang=\"ts\">\n</script>"), None);
        assert_eq!(lines_before_script("<template></template>"), None);
        assert_eq!(lines_before_script("<template />\n<script>"), Some(1));
    }

    #[test]
    fn missing_source_yields_nothing() {
        let program = MemoryProgram::new("/p/src");
        assert!(VueResolver::new()
            .transform(&ctx(&program, COMPONENT))
            .unwrap()
            .is_empty());
    }
}
