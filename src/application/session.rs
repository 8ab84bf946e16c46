//! Build Session
//!
//! Owns everything one declaration build keeps between calls:
//! 1. `start` resolves roots, aliases and the source filter once
//! 2. `transform` records declaration outputs for each loaded file;
//!    `transform_sources` feeds it every source of the program
//! 3. `write_bundle` rewrites, writes, indexes, rolls up and replicates
//! 4. `invalidate` re-arms the session after a source changed
//!
//! The compiled program is shared and only ever refreshed in place; each
//! refresh bumps the session version.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::entities::OutputFile;
use crate::domain::ports::{
    format_diagnostics, BuildHooks, BundleEvent, BundleEventSink, FileSystem, NoopEventSink,
    NoopHooks, Program, Resolver, RollupEngine, SourceFile, TransformContext,
};
use crate::domain::services::{query_public_path, ResolverRegistry, RewriteOptions, Rewriter};
use crate::domain::value_objects::path as paths;
use crate::domain::value_objects::{file_kind, AliasRule, AliasSet, LibName, SourceFilter};
use crate::error::{DeclError, DeclResult};
use crate::infrastructure::fs::LocalFs;
use crate::infrastructure::manifest::ManifestCache;
use crate::infrastructure::resolvers::builtin_resolvers;

use super::accumulator::OutputAccumulator;
use super::index::{insert_types_entries, IndexContext};
use super::options::BuildOptions;
use super::parallel::WorkerPool;
use super::replicate::replicate_outputs;
use super::result::BundleReport;
use super::rollup::{rollup_declarations, RollupContext};
use super::writer::{write_outputs, OutputLayout, OutputWriter};

/// Mutable state of a started session
struct BuildState {
    accumulator: OutputAccumulator,
    /// Sources whose declarations were not produced by `transform` yet
    root_files: BTreeSet<PathBuf>,
    bundled: bool,
    elapsed: Duration,
    public_root: PathBuf,
    entry_root: PathBuf,
    rewriter: Rewriter,
    filter: SourceFilter,
    lib_name: LibName,
    index_name: String,
    pool: WorkerPool,
}

pub struct BuildSession {
    options: BuildOptions,
    program: Box<dyn Program>,
    registry: ResolverRegistry,
    fs: Arc<dyn FileSystem>,
    hooks: Arc<dyn BuildHooks>,
    events: Arc<dyn BundleEventSink>,
    rollup: Option<Arc<dyn RollupEngine>>,
    manifests: ManifestCache,
    version: u64,
    state: Option<BuildState>,
}

impl BuildSession {
    /// Session over the local file system with the built-in resolvers
    pub fn new(options: BuildOptions, program: Box<dyn Program>) -> Self {
        Self {
            options,
            program,
            registry: ResolverRegistry::with_resolvers(builtin_resolvers()),
            fs: Arc::new(LocalFs::new()),
            hooks: Arc::new(NoopHooks),
            events: Arc::new(NoopEventSink),
            rollup: None,
            manifests: ManifestCache::new(),
            version: 0,
            state: None,
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn BuildHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn BundleEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_rollup(mut self, engine: Arc<dyn RollupEngine>) -> Self {
        self.rollup = Some(engine);
        self
    }

    /// Register a resolver; one with a built-in's name replaces it.
    pub fn with_resolver(mut self, resolver: Box<dyn Resolver>) -> Self {
        self.registry.register(resolver);
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Bumped on every successful `invalidate`
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    /// Resolved public root, once started
    pub fn public_root(&self) -> Option<&Path> {
        self.state.as_ref().map(|s| s.public_root.as_path())
    }

    /// Resolved entry root, once started
    pub fn entry_root(&self) -> Option<&Path> {
        self.state.as_ref().map(|s| s.entry_root.as_path())
    }

    /// Does `id` go through `transform`?
    pub fn handles(&self, id: &Path) -> bool {
        let Some(state) = &self.state else {
            return false;
        };
        let id = clean_id(id);
        state.filter.matches(&id)
            && (self.registry.supports(&id) || file_kind::is_script(&id.to_string_lossy()))
    }

    /// Resolve roots, aliases and the filter. A second call is a no-op.
    pub fn start(&mut self) -> DeclResult<()> {
        if self.state.is_some() {
            return Ok(());
        }
        let started = Instant::now();
        let options = &self.options;
        let program = self.program.as_ref();

        if options.lib.is_none() {
            self.events.on_event(BundleEvent::NotALibrary);
        }

        let compiler_options = program.compiler_options();
        let mut aliases = AliasSet::new(options.aliases.clone(), options.aliases_exclude.clone());
        if options.paths_to_aliases {
            if let Some(base_url) = &compiler_options.base_url {
                let config_dir = compiler_options
                    .config_file_path
                    .as_deref()
                    .map(paths::parent_dir)
                    .unwrap_or_else(|| options.root.clone());
                let base = paths::resolve(&config_dir, base_url);
                for (key, targets) in &compiler_options.paths {
                    let Some(target) = targets.first() else {
                        continue;
                    };
                    let replacement = paths::resolve(&base, Path::new(&target.replacen("/*", "", 1)));
                    aliases.push_if_absent(AliasRule::literal(
                        key.replacen("/*", "", 1),
                        paths::to_slash(&replacement),
                    ));
                }
            }
        }
        let filter = SourceFilter::new(&options.root, &options.include, &options.exclude)?;
        self.phase("parse config");

        let sources = program.source_files();
        let mut root_files: BTreeSet<PathBuf> = options
            .entries()
            .iter()
            .map(|entry| paths::normalize(&entry.source_path))
            .collect();
        root_files.extend(
            sources
                .iter()
                .filter(|file| !program.is_source_file_from_external_library(file))
                .map(|file| paths::normalize(&file.file_name))
                .filter(|path| filter.matches(path)),
        );

        let public_root = match (&compiler_options.root_dir, &compiler_options.config_file_path) {
            (Some(root_dir), _) => paths::resolve(&options.root, root_dir),
            (None, Some(config)) if compiler_options.composite => paths::parent_dir(config),
            _ => {
                let emitted: Vec<&Path> = sources
                    .iter()
                    .filter(|file| maybe_emitted(program, file))
                    .map(|file| file.file_name.as_path())
                    .collect();
                query_public_path(&emitted)
            }
        };
        let public_root = paths::normalize(&public_root);
        let entry_root = match &options.entry_root {
            Some(entry_root) => paths::resolve(&options.root, entry_root),
            None => public_root.clone(),
        };

        let diagnostics = program.declaration_diagnostics();
        if !diagnostics.is_empty() {
            self.events.on_event(BundleEvent::Diagnostics {
                count: diagnostics.len(),
                formatted: format_diagnostics(&diagnostics),
            });
        }
        self.hooks.after_diagnostic(&diagnostics)?;

        let pool = WorkerPool::with_default_size()?;
        let rewriter = Rewriter::new(
            aliases,
            RewriteOptions {
                clear_pure_import: options.clear_pure_import,
                consolidate_dynamic_imports: options.consolidate_dynamic_imports(),
            },
        );
        self.state = Some(BuildState {
            accumulator: OutputAccumulator::new(),
            root_files,
            bundled: false,
            elapsed: started.elapsed(),
            public_root,
            entry_root,
            rewriter,
            filter,
            lib_name: LibName::new(options.lib_name()),
            index_name: options.index_name(),
            pool,
        });
        self.phase("create program");
        Ok(())
    }

    /// Record the declaration outputs of one loaded file. Returns `false`
    /// when the file is not handled.
    pub fn transform(&mut self, id: &Path, code: &str) -> DeclResult<bool> {
        let state = self.state.as_mut().ok_or(DeclError::SessionNotStarted)?;
        let id = clean_id(id);
        let id_str = id.to_string_lossy().into_owned();
        if !state.filter.matches(&id) {
            return Ok(false);
        }
        let resolver = self.registry.dispatch(&id);
        if resolver.is_none() && !file_kind::is_script(&id_str) {
            return Ok(false);
        }

        let started = Instant::now();
        let program = self.program.as_ref();
        let service = program.language_service();
        let out_dir = self.options.primary_out_dir();
        state.root_files.remove(&id);

        match resolver {
            Some(resolver) => {
                let ctx = TransformContext {
                    id: &id,
                    code,
                    root: &state.public_root,
                    out_dir,
                    program,
                    service,
                };
                for output in resolver.transform(&ctx)? {
                    let (path, content) = output.into_parts();
                    let key = paths::resolve(
                        &state.public_root,
                        &paths::relative(out_dir, &paths::resolve(out_dir, &path)),
                    );
                    state.accumulator.record_for(&id, key, content);
                }
            }
            None => {
                if let Some(source) = program.source_file(&id) {
                    let output = service.emit_output(&source.file_name, true, true);
                    for file in output.output_files {
                        let key = emitted_key(program, &state.public_root, &file.name);
                        state.accumulator.record_for(&id, key, file.text);
                    }
                }
            }
        }

        let sidecar = PathBuf::from(format!("{}.d.ts", file_kind::strip_script_extension(&id_str)));
        if let Some(source) = program.source_file(&sidecar) {
            let path = paths::normalize(&source.file_name);
            if state.filter.matches(&path) {
                state.accumulator.record_for(&id, path, source.text);
            }
        }

        state.elapsed += started.elapsed();
        Ok(true)
    }

    /// Transform every program source the session handles, the way a host
    /// loading each module would. Non-script files outside the entry root
    /// (manifests, configs) are skipped. Returns how many were transformed.
    pub fn transform_sources(&mut self) -> DeclResult<usize> {
        let state = self.state.as_ref().ok_or(DeclError::SessionNotStarted)?;
        let program = self.program.as_ref();
        let sources: Vec<SourceFile> = program
            .source_files()
            .into_iter()
            .filter(|file| {
                !file.is_declaration_file && !program.is_source_file_from_external_library(file)
            })
            .filter(|file| {
                file_kind::is_script(&file.file_name.to_string_lossy())
                    || paths::normalize(&file.file_name).starts_with(&state.entry_root)
            })
            .collect();

        let mut transformed = 0;
        for file in sources {
            if self.transform(&file.file_name, &file.text)? {
                transformed += 1;
            }
        }
        Ok(transformed)
    }

    /// Transform one source with its current program text. `false` when the
    /// program does not hold it or the session does not handle it.
    pub fn transform_source(&mut self, id: &Path) -> DeclResult<bool> {
        let id = clean_id(id);
        match self.program.source_file(&id) {
            Some(source) if !source.is_declaration_file => self.transform(&id, &source.text),
            _ => Ok(false),
        }
    }

    /// A source changed on disk. Re-reads it and re-arms the next flush.
    /// A source that is gone takes its recorded declarations with it.
    /// Returns `false` when the file is not one this session handles.
    pub fn invalidate(&mut self, id: &Path) -> DeclResult<bool> {
        if !self.handles(id) {
            return Ok(false);
        }
        let id = clean_id(id);
        let refreshed = self.program.refresh(&id)?;
        let removed = self.program.source_file(&id).is_none();
        let Some(state) = self.state.as_mut() else {
            return Ok(false);
        };
        if removed {
            let dropped = state.accumulator.forget(&id);
            let pending = state.root_files.remove(&id);
            if !refreshed && dropped.is_empty() && !pending {
                return Ok(false);
            }
        } else if refreshed {
            state.root_files.insert(id);
        } else {
            return Ok(false);
        }
        state.bundled = false;
        state.elapsed = Duration::ZERO;
        self.version += 1;
        Ok(true)
    }

    /// Write every recorded declaration. `Ok(None)` when this session
    /// already flushed and nothing was invalidated since.
    pub fn write_bundle(&mut self) -> DeclResult<Option<BundleReport>> {
        let state = self.state.as_mut().ok_or(DeclError::SessionNotStarted)?;
        if state.bundled {
            return Ok(None);
        }
        state.bundled = true;

        let events = self.events.as_ref();
        events.on_event(BundleEvent::Started);
        let started = Instant::now();
        let options = &self.options;
        let program = self.program.as_ref();
        let fs = self.fs.as_ref();
        let out_dir = options.primary_out_dir();

        let service = program.language_service();
        for source in program.source_files() {
            let path = paths::normalize(&source.file_name);
            if !state.filter.matches(&path) {
                continue;
            }
            if options.copy_dts_files && source.is_declaration_file {
                state.accumulator.record_for(&path, path.clone(), source.text.clone());
            }
            if state.root_files.remove(&path) {
                for file in service.emit_output(&source.file_name, true, false).output_files {
                    let key = emitted_key(program, &state.public_root, &file.name);
                    state.accumulator.record_for(&path, key, file.text);
                }
            }
        }
        phase(events, "emit output patch");

        let layout = OutputLayout {
            rewriter: &state.rewriter,
            clean_vue_file_name: options.clean_vue_file_name,
            current_dir: program.current_directory(),
            public_root: &state.public_root,
            entry_root: &state.entry_root,
            out_dir,
        };
        let writer = OutputWriter::new(
            &state.pool,
            fs,
            self.hooks.as_ref(),
            events,
            out_dir,
            options.strict_output,
        );
        let outputs: Vec<OutputFile> = state.accumulator.snapshot();
        let mut emitted = write_outputs(outputs, &layout, &writer)?;
        phase(events, "write output");

        let mut rolled_up = Vec::new();
        if options.insert_types_entry || options.rollup_types {
            let index = IndexContext {
                fs,
                manifests: &self.manifests,
                root: &options.root,
                entry_root: &state.entry_root,
                entries: options.entries(),
                index_name: &state.index_name,
                lib_name: state.lib_name.as_str(),
            };
            let types_path = insert_types_entries(&index, &writer, &mut emitted)?;
            phase(events, "insert index");

            if options.rollup_types {
                let engine = self.rollup.as_deref().ok_or_else(|| DeclError::RollupPrepare {
                    entry: types_path.clone(),
                    message: "no rollup engine configured".to_string(),
                })?;
                let compiler_options = program.compiler_options();
                let rollup = RollupContext {
                    engine,
                    pool: &state.pool,
                    fs,
                    events,
                    manifests: &self.manifests,
                    root: &options.root,
                    entry_root: &state.entry_root,
                    out_dir,
                    config_path: compiler_options.config_file_path.as_deref(),
                    compiler_options: &compiler_options.raw,
                    bundled_packages: &options.bundled_packages,
                };
                rolled_up =
                    rollup_declarations(&rollup, options.entries(), &types_path, &mut emitted)?;
                phase(events, "rollup output");
            }
        }

        let extra_dirs = options.out_dirs.get(1..).unwrap_or_default();
        let replicated = replicate_outputs(&emitted, extra_dirs, &writer)?;

        self.hooks.after_build()?;
        phase(events, "finish");

        let duration_ms = (state.elapsed + started.elapsed()).as_millis() as u64;
        events.on_event(BundleEvent::Finished {
            written: emitted.len(),
            duration_ms,
        });

        Ok(Some(BundleReport {
            written: emitted.into_keys().collect(),
            rolled_up,
            replicated,
            version: self.version,
            duration_ms,
        }))
    }

    fn phase(&self, name: &'static str) {
        phase(self.events.as_ref(), name);
    }
}

fn phase(events: &dyn BundleEventSink, name: &'static str) {
    events.on_event(BundleEvent::Phase { name });
}

/// Drop a `?query` suffix and normalize
fn clean_id(id: &Path) -> PathBuf {
    let id = id.to_string_lossy();
    let id = id.split('?').next().unwrap_or_default();
    paths::normalize(Path::new(id))
}

/// Sources that produce a declaration when emitted. Only scripts count, so
/// manifests and other non-script files never widen the public root.
fn maybe_emitted(program: &dyn Program, file: &SourceFile) -> bool {
    file_kind::is_emitted_source(
        &file.file_name.to_string_lossy(),
        program.compiler_options().no_emit_for_js_files,
    ) && !program.is_source_file_from_external_library(file)
}

/// Accumulator key for a compiler-emitted file: its path under the
/// current directory re-anchored on the public root
fn emitted_key(program: &dyn Program, public_root: &Path, name: &Path) -> PathBuf {
    let current_dir = program.current_directory();
    paths::resolve(
        public_root,
        &paths::relative(current_dir, &paths::resolve(current_dir, name)),
    )
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
