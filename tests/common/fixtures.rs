//! Test fixtures - a three-file library and its compiler output.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use declpack::application::{BuildOptions, LibOptions};
use declpack::domain::ports::{RollupEngine, RollupRequest};
use declpack::domain::value_objects::{path as paths, AliasRule};
use declpack::infrastructure::MemoryProgram;
use declpack::{DeclResult, Entry};

pub const INDEX_TS: &str = r#"export { Button } from './components/button';
export { format } from './utils/format';
const version = '1.0.0';
export default version;
"#;

pub const BUTTON_TS: &str = r#"import { format } from '@/utils/format';
import './button.css';
export class Button {
  label = format(1);
}
"#;

pub const FORMAT_TS: &str = "export function format(value: number): string {\n  return String(value);\n}\n";

pub const INDEX_DTS: &str = r#"export { Button } from './components/button';
export { format } from './utils/format';
declare const version = "1.0.0";
export default version;
"#;

pub const BUTTON_DTS: &str = r#"import { format } from '@/utils/format';
import './button.css';
export declare class Button {
    label: ReturnType<typeof format>;
}
"#;

/// `BUTTON_DTS` after alias rewriting and pure-import removal
pub const BUTTON_DTS_REWRITTEN: &str = r#"import { format } from '../utils/format';
export declare class Button {
    label: ReturnType<typeof format>;
}
"#;

pub const FORMAT_DTS: &str = "export declare function format(value: number): string;\n";

/// Compiler output for a library under `root/src`
pub fn library_program(root: &Path) -> MemoryProgram {
    let src = root.join("src");
    MemoryProgram::new(&src)
        .with_source(src.join("index.ts"), INDEX_TS)
        .with_source(src.join("components/button.ts"), BUTTON_TS)
        .with_source(src.join("utils/format.ts"), FORMAT_TS)
        .with_external(
            root.join("node_modules/typescript/lib/lib.d.ts"),
            "interface Array<T> {}\n",
        )
        .with_emit(src.join("index.ts"), "index.d.ts", INDEX_DTS)
        .with_emit(src.join("components/button.ts"), "components/button.d.ts", BUTTON_DTS)
        .with_emit(src.join("utils/format.ts"), "utils/format.d.ts", FORMAT_DTS)
}

/// Library options: entry `src/index.ts`, alias `@/` → `src`
pub fn library_options(root: &Path) -> BuildOptions {
    let mut options = BuildOptions::new(root);
    options.lib = Some(LibOptions::new(
        "my-lib",
        vec![Entry::from_path(Path::new("src/index.ts"), root)],
    ));
    options.aliases = vec![AliasRule::literal(
        "@/",
        paths::to_slash(&root.join("src")),
    )];
    options
}

/// Rollup engine that writes a marker instead of flattening
#[derive(Default)]
pub struct FakeRollup {
    pub requests: Mutex<Vec<RollupRequest>>,
}

impl RollupEngine for FakeRollup {
    fn rollup(&self, request: &RollupRequest) -> DeclResult<()> {
        let output = request.output_path();
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(
            &output,
            format!("// rolled up from {}\n", request.entry_path.display()),
        )?;
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

/// Shell script standing in for `tsc`: copies everything under `emitted`
/// into the `--outDir` it is given. Returns the script path.
#[cfg(unix)]
pub fn fake_compiler(dir: &Path, emitted: &Path) -> std::path::PathBuf {
    let script = dir.join("fake-tsc.sh");
    std::fs::write(
        &script,
        format!(
            "out=\"\"\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"--outDir\" ]; then out=\"$2\"; shift; fi\n  shift\ndone\ncp -R '{}/.' \"$out\"\n",
            emitted.display()
        ),
    )
    .unwrap();
    script
}
