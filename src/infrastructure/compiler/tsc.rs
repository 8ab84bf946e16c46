//! `tsc`-backed Program
//!
//! Runs the TypeScript compiler once per (re)build with declaration-only
//! emission into a private staging directory, then serves emit output
//! from there. The staging directory is the program's current directory
//! and mirrors the public root.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use ignore::WalkBuilder;
use regex::Regex;
use tempfile::TempDir;

use crate::domain::ports::{
    CompilerOptions, Diagnostic, DiagnosticCategory, EmitOutput, EmittedFile, LanguageService,
    Program, SourceFile,
};
use crate::domain::services::query_public_path;
use crate::domain::value_objects::path as paths;
use crate::domain::value_objects::{file_kind, SourceFilter};
use crate::error::{DeclError, DeclResult};

use super::tsconfig::TsConfig;

static DIAGNOSTIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(.+)\((\d+),(\d+)\): )?(error|warning|message) TS(\d+): (.*)$")
        .expect("valid diagnostic regex")
});

/// What the compiler is run with
#[derive(Debug, Clone)]
pub struct TscOptions {
    /// Program and leading arguments, e.g. `["npx", "tsc"]`
    pub command: Vec<String>,
    pub root: PathBuf,
    pub tsconfig: Option<TsConfig>,
    pub filter: SourceFilter,
    /// Entry sources, always part of the program
    pub extra_roots: Vec<PathBuf>,
    /// Non-script extensions picked up as sources, without the dot
    pub extensions: Vec<String>,
}

pub struct TscProgram {
    options: TscOptions,
    compiler_options: CompilerOptions,
    files: BTreeMap<PathBuf, SourceFile>,
    emit_root: PathBuf,
    staging: TempDir,
    diagnostics: Vec<Diagnostic>,
}

impl TscProgram {
    /// Discover sources and run the first compilation
    pub fn create(options: TscOptions) -> DeclResult<Self> {
        let compiler_options = options
            .tsconfig
            .as_ref()
            .map(|config| config.compiler_options.clone())
            .unwrap_or_default();
        let files = discover_sources(&options)?;
        let emit_root = emit_root(&compiler_options, &files);
        let staging = tempfile::Builder::new().prefix("declpack-").tempdir()?;

        let mut program = Self {
            options,
            compiler_options,
            files,
            emit_root,
            staging,
            diagnostics: Vec::new(),
        };
        program.compile()?;
        Ok(program)
    }

    fn compile(&mut self) -> DeclResult<()> {
        let Some((program, leading)) = self.options.command.split_first() else {
            return Err(DeclError::Compiler {
                message: "empty compiler command".to_string(),
            });
        };

        let mut cmd = Command::new(program);
        cmd.args(leading)
            .arg("--declaration")
            .arg("--emitDeclarationOnly")
            .arg("--pretty")
            .arg("false")
            .arg("--outDir")
            .arg(self.staging.path())
            .arg("--rootDir")
            .arg(&self.emit_root)
            .current_dir(&self.options.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if self.compiler_options.declaration_map {
            cmd.arg("--declarationMap");
        }
        match &self.options.tsconfig {
            Some(config) => {
                cmd.arg("--project").arg(&config.path);
            }
            None => {
                cmd.args(
                    self.files
                        .values()
                        .filter(|file| is_compiled(file))
                        .map(|file| file.file_name.as_os_str()),
                );
            }
        }

        let output = cmd.output().map_err(|e| DeclError::Compiler {
            message: format!("failed to run '{}': {}", self.options.command.join(" "), e),
        })?;

        // A failing exit status only means diagnostics were reported
        let stdout = String::from_utf8_lossy(&output.stdout);
        self.diagnostics = parse_diagnostics(&stdout, &self.options.root);
        Ok(())
    }

    /// Where `tsc` wrote the declaration for `source`
    fn staged_declaration(&self, source: &Path) -> Option<PathBuf> {
        let relative = paths::relative(&self.emit_root, source);
        if relative.components().next() == Some(Component::ParentDir) {
            return None;
        }
        let relative = paths::to_slash(&relative);
        let name = format!(
            "{}.d.{}ts",
            file_kind::strip_script_extension(&relative),
            file_kind::module_prefix(&relative)
        );
        Some(PathBuf::from(name))
    }

    fn read_source(&mut self, path: &Path) -> bool {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                self.files
                    .insert(path.to_path_buf(), SourceFile::new(path, text));
                true
            }
            Err(_) => {
                self.files.remove(path);
                false
            }
        }
    }
}

impl LanguageService for TscProgram {
    fn emit_output(&self, file_name: &Path, _emit_only_dts: bool, _force_dts: bool) -> EmitOutput {
        let Some(declaration) = self.staged_declaration(file_name) else {
            return EmitOutput::default();
        };
        let map = PathBuf::from(format!("{}.map", declaration.display()));

        let output_files = [declaration, map]
            .into_iter()
            .filter_map(|name| {
                std::fs::read_to_string(self.staging.path().join(&name))
                    .ok()
                    .map(|text| EmittedFile { name, text })
            })
            .collect();
        EmitOutput { output_files }
    }
}

impl Program for TscProgram {
    fn source_file(&self, path: &Path) -> Option<SourceFile> {
        self.files.get(path).cloned()
    }

    fn source_files(&self) -> Vec<SourceFile> {
        self.files.values().cloned().collect()
    }

    fn is_source_file_from_external_library(&self, file: &SourceFile) -> bool {
        is_external(&file.file_name)
    }

    fn declaration_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }

    fn compiler_options(&self) -> &CompilerOptions {
        &self.compiler_options
    }

    fn current_directory(&self) -> &Path {
        self.staging.path()
    }

    fn language_service(&self) -> &dyn LanguageService {
        self
    }

    fn refresh(&mut self, path: &Path) -> DeclResult<bool> {
        if !self.options.filter.matches(path) || !is_program_file(&self.options, path) {
            return Ok(false);
        }
        let known = self.files.contains_key(path);
        // A deleted source only changes the program if it was part of it
        if !self.read_source(path) && !known {
            return Ok(false);
        }
        self.compile()?;
        Ok(true)
    }
}

/// Scripts and files with a resolved extension under the root that pass
/// the filter
fn discover_sources(options: &TscOptions) -> DeclResult<BTreeMap<PathBuf, SourceFile>> {
    let mut found = BTreeSet::new();
    for entry in WalkBuilder::new(&options.root).hidden(false).build() {
        let entry = entry.map_err(|e| DeclError::Io(std::io::Error::other(e.to_string())))?;
        let path = entry.path();
        if entry.file_type().is_some_and(|t| t.is_file())
            && is_program_file(options, path)
            && options.filter.matches(path)
        {
            found.insert(paths::normalize(path));
        }
    }
    if let Some(config) = &options.tsconfig {
        found.extend(config.files.iter().cloned());
    }
    found.extend(options.extra_roots.iter().map(|p| paths::normalize(p)));

    let mut files = BTreeMap::new();
    for path in found {
        if let Ok(text) = std::fs::read_to_string(&path) {
            files.insert(path.clone(), SourceFile::new(path, text));
        }
    }
    Ok(files)
}

fn is_program_file(options: &TscOptions, path: &Path) -> bool {
    file_kind::is_script(&path.to_string_lossy())
        || path
            .extension()
            .is_some_and(|ext| options.extensions.iter().any(|e| ext == e.as_str()))
}

fn is_compiled(file: &SourceFile) -> bool {
    file_kind::is_script(&file.file_name.to_string_lossy())
}

fn is_external(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == "node_modules")
}

fn emit_root(options: &CompilerOptions, files: &BTreeMap<PathBuf, SourceFile>) -> PathBuf {
    if let Some(root_dir) = &options.root_dir {
        return root_dir.clone();
    }
    if options.composite {
        if let Some(config) = &options.config_file_path {
            return paths::parent_dir(config);
        }
    }
    let emitted: Vec<&Path> = files
        .values()
        .filter(|file| {
            file_kind::is_emitted_source(
                &file.file_name.to_string_lossy(),
                options.no_emit_for_js_files,
            ) && !is_external(&file.file_name)
        })
        .map(|file| file.file_name.as_path())
        .collect();
    query_public_path(&emitted)
}

/// Parse `file(line,col): error TS1234: message` lines
pub fn parse_diagnostics(output: &str, root: &Path) -> Vec<Diagnostic> {
    output
        .lines()
        .filter_map(|line| {
            let caps = DIAGNOSTIC_LINE.captures(line.trim_end())?;
            let file = caps
                .get(1)
                .map(|m| paths::resolve(root, Path::new(m.as_str())));
            let position = match (caps.get(2), caps.get(3)) {
                (Some(l), Some(c)) => Some((l.as_str().parse().ok()?, c.as_str().parse().ok()?)),
                _ => None,
            };
            let category = match &caps[4] {
                "error" => DiagnosticCategory::Error,
                "warning" => DiagnosticCategory::Warning,
                _ => DiagnosticCategory::Message,
            };
            Some(Diagnostic {
                file,
                position,
                category,
                code: caps[5].parse().ok()?,
                message: caps[6].to_string(),
            })
        })
        .collect()
}
