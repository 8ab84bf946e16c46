//! Declaration write pipeline
//!
//! Turns accumulated outputs into files on disk:
//! 1. rewrite declaration text (pure imports, aliases, dynamic imports)
//! 2. move the path from the entry root to the output directory
//! 3. relocate declaration map sources for the new location
//! 4. ask `before_write_file`, enforce strict output, write
//!
//! Steps run per file on the bounded worker pool.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::entities::{is_source_map_path, OutputFile};
use crate::domain::ports::{BuildHooks, BundleEvent, BundleEventSink, FileSystem, WriteDecision};
use crate::domain::services::{
    clean_vue_path, clean_vue_references, relocate_sources, MapRelocation, Rewriter,
};
use crate::domain::value_objects::path as paths;
use crate::error::DeclResult;

use super::parallel::WorkerPool;

/// Files written during a flush, by final path
pub type EmittedFiles = BTreeMap<PathBuf, String>;

/// Hook-aware, policy-checked single-file writer
pub struct OutputWriter<'a> {
    pool: &'a WorkerPool,
    fs: &'a dyn FileSystem,
    hooks: &'a dyn BuildHooks,
    events: &'a dyn BundleEventSink,
    out_dir: &'a Path,
    strict_output: bool,
}

impl<'a> OutputWriter<'a> {
    pub fn new(
        pool: &'a WorkerPool,
        fs: &'a dyn FileSystem,
        hooks: &'a dyn BuildHooks,
        events: &'a dyn BundleEventSink,
        out_dir: &'a Path,
        strict_output: bool,
    ) -> Self {
        Self {
            pool,
            fs,
            hooks,
            events,
            out_dir,
            strict_output,
        }
    }

    pub fn out_dir(&self) -> &Path {
        self.out_dir
    }

    pub fn pool(&self) -> &WorkerPool {
        self.pool
    }

    pub fn report(&self, event: BundleEvent) {
        self.events.on_event(event);
    }

    /// Same hooks and policy, another directory
    pub fn for_dir(&self, out_dir: &'a Path) -> Self {
        Self { out_dir, ..*self }
    }

    /// Write one file. `Ok(None)` when the hook vetoed it or it would
    /// land outside the output directory.
    pub fn write(&self, path: &Path, content: &str) -> DeclResult<Option<OutputFile>> {
        let (path, content) = match self.hooks.before_write_file(path, content) {
            WriteDecision::Skip => return Ok(None),
            WriteDecision::Keep => (path.to_path_buf(), content.to_string()),
            WriteDecision::Rewrite {
                path: new_path,
                content: new_content,
            } => (
                new_path.unwrap_or_else(|| path.to_path_buf()),
                new_content.unwrap_or_else(|| content.to_string()),
            ),
        };

        let path = paths::normalize(&path);
        let dir = paths::parent_dir(&path);
        if self.strict_output && !paths::is_within(&dir, self.out_dir) {
            self.events.on_event(BundleEvent::OutsideOutDir { path });
            return Ok(None);
        }

        if !self.fs.exists(&dir) {
            self.fs.create_dir_all(&dir)?;
        }
        self.fs.write(&path, &content)?;

        if self.events.wants_detailed_events() {
            self.events.on_event(BundleEvent::FileWritten { path: path.clone() });
        }
        Ok(Some(OutputFile::new(path, content)))
    }
}

/// Where recorded outputs are anchored and where they go
pub struct OutputLayout<'a> {
    pub rewriter: &'a Rewriter,
    pub clean_vue_file_name: bool,
    pub current_dir: &'a Path,
    pub public_root: &'a Path,
    pub entry_root: &'a Path,
    pub out_dir: &'a Path,
}

impl OutputLayout<'_> {
    /// Final path and content for one recorded output
    pub fn prepare(&self, recorded: &Path, content: &str, events: &dyn BundleEventSink) -> (PathBuf, String) {
        let is_map = is_source_map_path(recorded);
        let mut content = if !is_map && !content.is_empty() {
            self.rewriter.rewrite(recorded, content)
        } else {
            content.to_string()
        };

        let source_path = if self.clean_vue_file_name {
            PathBuf::from(clean_vue_path(&recorded.to_string_lossy()))
        } else {
            recorded.to_path_buf()
        };
        let final_path = paths::resolve(
            self.out_dir,
            &paths::relative(self.entry_root, &source_path),
        );

        if self.clean_vue_file_name && !is_map {
            content = clean_vue_references(&content);
        }

        if is_map {
            let relocation = MapRelocation {
                current_dir: self.current_dir,
                public_root: self.public_root,
                recorded_dir: &paths::parent_dir(recorded),
                final_dir: &paths::parent_dir(&final_path),
            };
            match relocate_sources(&content, &relocation) {
                Ok(relocated) => content = relocated,
                Err(e) => events.on_event(BundleEvent::SourceMapFailed {
                    path: final_path.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        (final_path, content)
    }
}

/// Prepare and write every output on the worker pool.
pub fn write_outputs(
    outputs: Vec<OutputFile>,
    layout: &OutputLayout<'_>,
    writer: &OutputWriter<'_>,
) -> DeclResult<EmittedFiles> {
    let written = writer.pool.run(outputs, |output| {
        let (path, content) = layout.prepare(output.path(), output.content(), writer.events);
        writer.write(&path, &content)
    })?;

    Ok(written
        .into_iter()
        .flatten()
        .map(OutputFile::into_parts)
        .collect())
}
