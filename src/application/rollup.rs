//! Declaration rollup
//!
//! Flattens each entry's declarations through the rollup engine, deletes
//! every other file written in this flush and prunes directories left
//! empty.

use std::path::{Path, PathBuf};

use crate::domain::entities::Entry;
use crate::domain::ports::{BundleEvent, BundleEventSink, FileSystem, RollupEngine, RollupRequest};
use crate::domain::value_objects::file_kind;
use crate::error::DeclResult;
use crate::infrastructure::manifest::ManifestCache;

use super::parallel::WorkerPool;
use super::writer::EmittedFiles;

const TYPESCRIPT_FOLDER: &str = "node_modules/typescript";

pub struct RollupContext<'a> {
    pub engine: &'a dyn RollupEngine,
    pub pool: &'a WorkerPool,
    pub fs: &'a dyn FileSystem,
    pub events: &'a dyn BundleEventSink,
    pub manifests: &'a ManifestCache,
    pub root: &'a Path,
    pub entry_root: &'a Path,
    pub out_dir: &'a Path,
    pub config_path: Option<&'a Path>,
    pub compiler_options: &'a serde_json::Value,
    pub bundled_packages: &'a [String],
}

impl RollupContext<'_> {
    /// Compiler the engine should use: the project's own, else the entry
    /// root's, else whatever the engine ships with.
    pub fn lib_folder(&self) -> Option<PathBuf> {
        let from_root = self.root.join(TYPESCRIPT_FOLDER);
        if self.fs.exists(&from_root) {
            return Some(from_root);
        }
        if self.root != self.entry_root {
            let from_entry_root = self.entry_root.join(TYPESCRIPT_FOLDER);
            if self.fs.exists(&from_entry_root) {
                return Some(from_entry_root);
            }
        }
        None
    }

    fn request(&self, entry_path: &Path, lib_folder: Option<PathBuf>) -> RollupRequest {
        let file_name = entry_path
            .file_name()
            .map(|name| file_kind::declaration_name(&name.to_string_lossy()))
            .unwrap_or_default();
        RollupRequest {
            root: self.root.to_path_buf(),
            config_path: self.config_path.map(Path::to_path_buf),
            compiler_options: self.compiler_options.clone(),
            out_dir: self.out_dir.to_path_buf(),
            entry_path: entry_path.to_path_buf(),
            file_name,
            lib_folder,
            package_json: self.manifests.find(self.fs, self.root),
            bundled_packages: self.bundled_packages.to_vec(),
        }
    }
}

/// Roll up every entry and replace `emitted` with the rolled-up files.
pub fn rollup_declarations(
    ctx: &RollupContext<'_>,
    entries: &[Entry],
    types_path: &Path,
    emitted: &mut EmittedFiles,
) -> DeclResult<Vec<PathBuf>> {
    ctx.events.on_event(BundleEvent::RollupStarted);

    let targets: Vec<PathBuf> = if entries.len() > 1 {
        entries
            .iter()
            .map(|entry| ctx.out_dir.join(entry.declaration_file_name()))
            .collect()
    } else {
        vec![types_path.to_path_buf()]
    };

    let lib_folder = ctx.lib_folder();
    let mut rolled_up = Vec::with_capacity(targets.len());
    for target in targets {
        let request = ctx.request(&target, lib_folder.clone());
        ctx.engine.rollup(&request)?;
        let output = request.output_path();
        emitted.remove(&target);
        emitted.remove(&output);
        rolled_up.push(output);
    }

    let stale: Vec<PathBuf> = std::mem::take(emitted).into_keys().collect();
    ctx.pool.run(stale, |path| Ok(ctx.fs.remove(&path)?))?;
    prune_empty_dirs(ctx.fs, ctx.out_dir)?;

    for path in &rolled_up {
        emitted.insert(path.clone(), ctx.fs.read(path)?);
    }
    Ok(rolled_up)
}

/// Remove `dir` and its subdirectories when they hold no files at all.
/// Returns whether `dir` was removed.
pub fn prune_empty_dirs(fs: &dyn FileSystem, dir: &Path) -> DeclResult<bool> {
    if !fs.exists(dir) {
        return Ok(false);
    }
    let mut only_dirs = true;
    for entry in fs.read_dir(dir)? {
        if !entry.is_dir || !prune_empty_dirs(fs, &entry.path)? {
            only_dirs = false;
        }
    }
    if only_dirs {
        fs.remove_dir(dir)?;
    }
    Ok(only_dirs)
}
