//! Multi-target replication
//!
//! Copies everything written to the primary output directory into each
//! extra output directory. Copies go through the same hook and strict
//! output check but are not recorded as emitted.

use std::path::{Path, PathBuf};

use crate::domain::entities::is_source_map_path;
use crate::domain::ports::BundleEvent;
use crate::domain::services::rebase_sources;
use crate::domain::value_objects::path as paths;
use crate::error::DeclResult;

use super::writer::{EmittedFiles, OutputWriter};

/// Replicate `emitted` into every directory of `extra_dirs`. Returns the
/// paths actually written.
pub fn replicate_outputs(
    emitted: &EmittedFiles,
    extra_dirs: &[PathBuf],
    writer: &OutputWriter<'_>,
) -> DeclResult<Vec<PathBuf>> {
    if extra_dirs.is_empty() {
        return Ok(Vec::new());
    }

    let primary = writer.out_dir();
    let written = writer.pool().run(emitted.iter().collect(), |(path, content)| {
        let relative = paths::relative(primary, path);
        let mut copies = Vec::with_capacity(extra_dirs.len());
        for dir in extra_dirs {
            let target = paths::resolve(dir, &relative);
            let content = if is_source_map_path(path) {
                rebase_map(path, &target, content, writer)
            } else {
                content.clone()
            };
            if let Some(file) = writer.for_dir(dir).write(&target, &content)? {
                copies.push(file.path().to_path_buf());
            }
        }
        Ok(copies)
    })?;

    Ok(written.into_iter().flatten().collect())
}

fn rebase_map(from: &Path, to: &Path, content: &str, writer: &OutputWriter<'_>) -> String {
    let from_dir = paths::parent_dir(from);
    let to_dir = paths::parent_dir(to);
    if from_dir == to_dir {
        return content.to_string();
    }
    match rebase_sources(content, &from_dir, &to_dir) {
        Ok(rebased) => rebased,
        Err(e) => {
            writer.report(BundleEvent::SourceMapFailed {
                path: to.to_path_buf(),
                reason: e.to_string(),
            });
            content.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SourceMapDocument;
    use crate::domain::ports::bundle_events::testing::RecordingEventSink;
    use crate::domain::ports::{FileSystem, NoopHooks};
    use crate::application::parallel::WorkerPool;
    use crate::infrastructure::fs::MemoryFs;

    #[test]
    fn copies_land_at_the_same_relative_path() {
        let fs = MemoryFs::new();
        let events = RecordingEventSink::new();
        let pool = WorkerPool::new(2).unwrap();
        let writer = OutputWriter::new(&pool, &fs, &NoopHooks, &events, Path::new("/p/dist"), true);
        let mut emitted = EmittedFiles::new();
        emitted.insert(
            PathBuf::from("/p/dist/utils/a.d.ts"),
            "export declare const a: 1;\n".to_string(),
        );

        let copies =
            replicate_outputs(&emitted, &[PathBuf::from("/p/types")], &writer).unwrap();

        assert_eq!(copies, vec![PathBuf::from("/p/types/utils/a.d.ts")]);
        assert_eq!(
            fs.read(Path::new("/p/types/utils/a.d.ts")).unwrap(),
            "export declare const a: 1;\n"
        );
    }

    #[test]
    fn map_sources_still_reach_the_original_source() {
        let fs = MemoryFs::new();
        let events = RecordingEventSink::new();
        let pool = WorkerPool::new(2).unwrap();
        let writer = OutputWriter::new(&pool, &fs, &NoopHooks, &events, Path::new("/p/dist"), true);
        let mut emitted = EmittedFiles::new();
        emitted.insert(
            PathBuf::from("/p/dist/a.d.ts.map"),
            r#"{"version":3,"file":"a.d.ts","sources":["../src/a.ts"],"mappings":"AAAA"}"#
                .to_string(),
        );

        replicate_outputs(&emitted, &[PathBuf::from("/p/out/types")], &writer).unwrap();

        let copied = fs.read(Path::new("/p/out/types/a.d.ts.map")).unwrap();
        let map = SourceMapDocument::parse(&copied).unwrap();
        assert_eq!(map.sources, vec!["../../src/a.ts".to_string()]);
        assert!(events.snapshot().iter().all(|e| !e.is_warning()));
    }

    #[test]
    fn malformed_map_is_copied_verbatim_with_warning() {
        let fs = MemoryFs::new();
        let events = RecordingEventSink::new();
        let pool = WorkerPool::new(2).unwrap();
        let writer = OutputWriter::new(&pool, &fs, &NoopHooks, &events, Path::new("/p/dist"), true);
        let mut emitted = EmittedFiles::new();
        emitted.insert(PathBuf::from("/p/dist/a.d.ts.map"), "{oops".to_string());

        replicate_outputs(&emitted, &[PathBuf::from("/p/out")], &writer).unwrap();

        assert_eq!(fs.read(Path::new("/p/out/a.d.ts.map")).unwrap(), "{oops");
        assert!(events
            .snapshot()
            .iter()
            .any(|e| matches!(e, BundleEvent::SourceMapFailed { .. })));
    }
}
