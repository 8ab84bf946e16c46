//! In-memory Program
//!
//! A program whose sources and emit results are supplied up front. Backs
//! tests and embedders that already hold declaration output.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::ports::{
    CompilerOptions, Diagnostic, EmitOutput, EmittedFile, LanguageService, Program, SourceFile,
};
use crate::error::DeclResult;

#[derive(Debug, Default)]
pub struct MemoryProgram {
    current_dir: PathBuf,
    options: CompilerOptions,
    files: BTreeMap<PathBuf, SourceFile>,
    external: BTreeSet<PathBuf>,
    emits: BTreeMap<PathBuf, Vec<EmittedFile>>,
    diagnostics: Vec<Diagnostic>,
    emit_calls: AtomicUsize,
    refreshes: usize,
}

impl MemoryProgram {
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let file = SourceFile::new(path, text);
        self.files.insert(file.file_name.clone(), file);
        self
    }

    /// A source that belongs to a dependency, never emitted
    pub fn with_external(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        self.external.insert(path.clone());
        self.with_source(path, text)
    }

    /// What `emit_output(source)` returns; `name` is relative to the
    /// current directory or absolute
    pub fn with_emit(
        mut self,
        source: impl Into<PathBuf>,
        name: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        self.emits
            .entry(source.into())
            .or_default()
            .push(EmittedFile {
                name: name.into(),
                text: text.into(),
            });
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    /// Replace a source's text, as an editor save would
    pub fn update_source(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let file = SourceFile::new(path, text);
        self.files.insert(file.file_name.clone(), file);
    }

    /// Number of `emit_output` calls so far
    pub fn emit_calls(&self) -> usize {
        self.emit_calls.load(Ordering::SeqCst)
    }

    /// Number of successful `refresh` calls so far
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl LanguageService for MemoryProgram {
    fn emit_output(&self, file_name: &Path, _emit_only_dts: bool, _force_dts: bool) -> EmitOutput {
        self.emit_calls.fetch_add(1, Ordering::SeqCst);
        EmitOutput {
            output_files: self.emits.get(file_name).cloned().unwrap_or_default(),
        }
    }
}

impl Program for MemoryProgram {
    fn source_file(&self, path: &Path) -> Option<SourceFile> {
        self.files.get(path).cloned()
    }

    fn source_files(&self) -> Vec<SourceFile> {
        self.files.values().cloned().collect()
    }

    fn is_source_file_from_external_library(&self, file: &SourceFile) -> bool {
        self.external.contains(&file.file_name)
    }

    fn declaration_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }

    fn compiler_options(&self) -> &CompilerOptions {
        &self.options
    }

    fn current_directory(&self) -> &Path {
        &self.current_dir
    }

    fn language_service(&self) -> &dyn LanguageService {
        self
    }

    fn refresh(&mut self, path: &Path) -> DeclResult<bool> {
        if self.files.contains_key(path) {
            self.refreshes += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
