//! Watch-style rebuilds: invalidate, then flush again.

use std::path::Path;
use std::sync::{Arc, Mutex};

use declpack::application::BuildSession;
use declpack::domain::ports::FileSystem;
use declpack::infrastructure::MemoryFs;
use declpack::watcher::{apply_changes, WatchEvent};

use crate::common::*;

#[test]
fn scenario_rebuild_rewrites_full_tree() {
    let root = Path::new("/p");
    let fs = Arc::new(MemoryFs::new());
    let mut session = BuildSession::new(library_options(root), Box::new(library_program(root)))
        .with_fs(fs.clone());
    session.start().unwrap();
    session.write_bundle().unwrap();

    // Output cleaned by something else between builds
    fs.remove(Path::new("/p/dist/index.d.ts")).unwrap();

    let events = Mutex::new(Vec::new());
    let rebuilt = apply_changes(
        &mut session,
        &[root.join("src/utils/format.ts")],
        &|event| events.lock().unwrap().push(event),
    );

    assert!(rebuilt);
    assert_eq!(fs.read(Path::new("/p/dist/index.d.ts")).unwrap(), INDEX_DTS);
    let events = events.into_inner().unwrap();
    assert!(matches!(
        events.last(),
        Some(WatchEvent::RebuildComplete { written: 3, .. })
    ));
}

#[test]
fn scenario_unrelated_change_does_not_rebuild() {
    let root = Path::new("/p");
    let mut session = BuildSession::new(library_options(root), Box::new(library_program(root)))
        .with_fs(Arc::new(MemoryFs::new()));
    session.start().unwrap();
    session.write_bundle().unwrap();

    let rebuilt = apply_changes(&mut session, &[root.join("README.md")], &|_| {});

    assert!(!rebuilt);
    assert_eq!(session.version(), 0);
    assert!(session.write_bundle().unwrap().is_none());
}

#[cfg(unix)]
#[test]
fn scenario_deleted_source_leaves_the_tree() {
    use declpack::domain::value_objects::SourceFilter;
    use declpack::infrastructure::{TscOptions, TscProgram};
    use declpack::BuildOptions;

    let project = tempfile::tempdir().unwrap();
    let tools = tempfile::tempdir().unwrap();
    let root = project.path();
    let emitted = tools.path().join("emitted");
    std::fs::create_dir_all(&emitted).unwrap();
    std::fs::write(emitted.join("index.d.ts"), "export declare const a = 1;\n").unwrap();
    std::fs::write(emitted.join("extra.d.ts"), "export declare const b = 2;\n").unwrap();
    let script = fake_compiler(tools.path(), &emitted);

    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("src/index.ts"), "export const a = 1;\n").unwrap();
    std::fs::write(root.join("src/extra.ts"), "export const b = 2;\n").unwrap();
    let program = TscProgram::create(TscOptions {
        command: vec!["sh".to_string(), script.display().to_string()],
        root: root.to_path_buf(),
        tsconfig: None,
        filter: SourceFilter::with_defaults(root).unwrap(),
        extra_roots: Vec::new(),
        extensions: Vec::new(),
    })
    .unwrap();

    let mut session = BuildSession::new(BuildOptions::new(root), Box::new(program));
    session.start().unwrap();
    session.transform_sources().unwrap();
    let first = session.write_bundle().unwrap().unwrap();
    assert_eq!(first.written.len(), 2);

    std::fs::remove_file(root.join("src/extra.ts")).unwrap();
    let events = Mutex::new(Vec::new());
    let rebuilt = apply_changes(
        &mut session,
        &[root.join("src/extra.ts")],
        &|event| events.lock().unwrap().push(event),
    );

    assert!(rebuilt);
    let events = events.into_inner().unwrap();
    assert!(matches!(
        events.last(),
        Some(WatchEvent::RebuildComplete { written: 1, .. })
    ));
}
