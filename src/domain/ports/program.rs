//! Compiled-program port
//!
//! The compiler that type-checks and emits raw declarations lives outside
//! this crate. The pipeline only needs to look source files up, ask for
//! their declaration output and read diagnostics; `refresh` is how a watch
//! session tells the program a file changed on disk.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DeclResult;

/// A file known to the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub file_name: PathBuf,
    pub text: String,
    pub is_declaration_file: bool,
}

impl SourceFile {
    pub fn new(file_name: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let is_declaration_file =
            crate::domain::value_objects::file_kind::is_declaration(&file_name.to_string_lossy());
        Self {
            file_name,
            text: text.into(),
            is_declaration_file,
        }
    }
}

/// Subset of compiler options the pipeline reads
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
    #[serde(default)]
    pub composite: bool,
    #[serde(default)]
    pub base_url: Option<PathBuf>,
    #[serde(default)]
    pub paths: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub declaration_map: bool,
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    /// Skip JS sources when deciding which files produce declarations
    #[serde(default)]
    pub no_emit_for_js_files: bool,
    /// The tsconfig these options came from
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
    /// `compilerOptions` exactly as written, forwarded to the rollup engine
    #[serde(skip)]
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Error => f.write_str("error"),
            DiagnosticCategory::Warning => f.write_str("warning"),
            DiagnosticCategory::Message => f.write_str("message"),
        }
    }
}

/// A declaration-emission problem reported by the compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Option<PathBuf>,
    /// 1-based line and column
    pub position: Option<(usize, usize)>,
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}", file.display())?;
            if let Some((line, column)) = self.position {
                write!(f, "({},{})", line, column)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} TS{}: {}", self.category, self.code, self.message)
    }
}

/// Render diagnostics one per line, the way the compiler prints them
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One emitted file; `name` is absolute or relative to the program's
/// current directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub name: PathBuf,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOutput {
    pub output_files: Vec<EmittedFile>,
}

/// Declaration emission for a single file
pub trait LanguageService {
    /// Emit outputs for `file_name`. With `force_dts`, declarations are
    /// produced even when the program would normally skip the file.
    fn emit_output(&self, file_name: &Path, emit_only_dts: bool, force_dts: bool) -> EmitOutput;
}

/// A compiled program
pub trait Program {
    fn source_file(&self, path: &Path) -> Option<SourceFile>;

    fn source_files(&self) -> Vec<SourceFile>;

    fn is_source_file_from_external_library(&self, file: &SourceFile) -> bool;

    fn declaration_diagnostics(&self) -> Vec<Diagnostic>;

    fn compiler_options(&self) -> &CompilerOptions;

    /// Directory emitted file names and map sources are relative to
    fn current_directory(&self) -> &Path;

    fn language_service(&self) -> &dyn LanguageService;

    /// Re-read `path` from disk. Returns `false` when the program does
    /// not know (and cannot pick up) the file.
    fn refresh(&mut self, path: &Path) -> DeclResult<bool>;
}
