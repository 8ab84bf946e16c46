//! Declaration rollup with a stand-in engine.

use std::fs;
use std::sync::Arc;

use declpack::application::{BuildSession, LibOptions};
use declpack::{DeclError, Entry};
use tempfile::tempdir;

use crate::common::*;

#[test]
fn scenario_rollup_replaces_tree_with_single_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("node_modules/typescript")).unwrap();
    let mut options = library_options(root);
    options.rollup_types = true;
    let engine = Arc::new(FakeRollup::default());

    let mut session =
        BuildSession::new(options, Box::new(library_program(root))).with_rollup(engine.clone());
    session.start().unwrap();
    let report = session.write_bundle().unwrap().unwrap();

    let index = root.join("dist/index.d.ts");
    assert_eq!(report.rolled_up, vec![index.clone()]);
    assert!(fs::read_to_string(&index)
        .unwrap()
        .starts_with("// rolled up from"));
    assert!(!root.join("dist/components").exists());
    assert!(!root.join("dist/utils").exists());

    let requests = engine.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].entry_path, index);
    assert_eq!(
        requests[0].lib_folder,
        Some(root.join("node_modules/typescript"))
    );
}

#[test]
fn scenario_rollup_per_entry() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let mut options = library_options(root);
    options.rollup_types = true;
    options.lib = Some(LibOptions::new(
        "my-lib",
        vec![
            Entry::new("main.ts", root.join("src/index.ts")),
            Entry::new("format.ts", root.join("src/utils/format.ts")),
        ],
    ));
    let engine = Arc::new(FakeRollup::default());

    let mut session =
        BuildSession::new(options, Box::new(library_program(root))).with_rollup(engine.clone());
    session.start().unwrap();
    let report = session.write_bundle().unwrap().unwrap();

    assert_eq!(
        report.rolled_up,
        vec![root.join("dist/main.d.ts"), root.join("dist/format.d.ts")]
    );
    assert!(!root.join("dist/index.d.ts").exists());
    assert_eq!(engine.requests.lock().unwrap().len(), 2);
}

#[test]
fn scenario_rollup_needs_engine() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let mut options = library_options(root);
    options.rollup_types = true;

    let mut session = BuildSession::new(options, Box::new(library_program(root)));
    session.start().unwrap();

    assert!(matches!(
        session.write_bundle(),
        Err(DeclError::RollupPrepare { .. })
    ));
}
