//! Library builds written to disk.

use std::fs;
use std::path::PathBuf;

use declpack::application::BuildSession;
use declpack::BundleReport;
use tempfile::tempdir;

use crate::common::*;

fn build(options: declpack::BuildOptions, root: &std::path::Path) -> BundleReport {
    let mut session = BuildSession::new(options, Box::new(library_program(root)));
    session.start().unwrap();
    session.write_bundle().unwrap().unwrap()
}

#[test]
fn scenario_library_lands_under_out_dir() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    let report = build(library_options(root), root);

    let dist = root.join("dist");
    assert_eq!(
        report.written,
        vec![
            dist.join("components/button.d.ts"),
            dist.join("index.d.ts"),
            dist.join("utils/format.d.ts"),
        ]
    );
    assert_eq!(fs::read_to_string(dist.join("index.d.ts")).unwrap(), INDEX_DTS);
    assert_eq!(
        fs::read_to_string(dist.join("components/button.d.ts")).unwrap(),
        BUTTON_DTS_REWRITTEN
    );
    assert!(!dist.join("node_modules").exists());
}

#[test]
fn scenario_pure_imports_kept_when_disabled() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let mut options = library_options(root);
    options.clear_pure_import = false;

    build(options, root);

    let button = fs::read_to_string(root.join("dist/components/button.d.ts")).unwrap();
    assert!(button.contains("import './button.css';"));
    assert!(button.contains("from '../utils/format'"));
}

#[test]
fn scenario_types_entry_follows_manifest() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("package.json"),
        r#"{ "name": "my-lib", "types": "dist/main.d.ts" }"#,
    )
    .unwrap();
    let mut options = library_options(root);
    options.insert_types_entry = true;

    let report = build(options, root);

    assert!(report.written.contains(&root.join("dist/main.d.ts")));
    assert_eq!(
        fs::read_to_string(root.join("dist/main.d.ts")).unwrap(),
        "export * from './index'\nimport MyLib from './index'\nexport default MyLib\n"
    );
}

#[test]
fn scenario_extra_out_dirs_mirror_primary() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let mut options = library_options(root);
    options.out_dirs.push(root.join("types"));

    let report = build(options, root);

    assert_eq!(report.replicated.len(), 3);
    assert_eq!(
        fs::read_to_string(root.join("types/components/button.d.ts")).unwrap(),
        BUTTON_DTS_REWRITTEN
    );
}

#[test]
fn scenario_entry_root_changes_layout() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let mut options = library_options(root);
    options.entry_root = Some(PathBuf::from(root));

    build(options, root);

    assert!(root.join("dist/src/index.d.ts").exists());
    assert!(root.join("dist/src/utils/format.d.ts").exists());
}

#[test]
fn scenario_root_manifest_keeps_public_root_on_sources() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let manifest = r#"{ "name": "my-lib", "types": "dist/main.d.ts" }"#;
    fs::write(root.join("package.json"), manifest).unwrap();
    // The compiler lists project-level JSON next to the sources
    let program = library_program(root)
        .with_source(root.join("package.json"), manifest)
        .with_source(root.join("tsconfig.json"), "{}");
    let mut options = library_options(root);
    options.insert_types_entry = true;

    let mut session = BuildSession::new(options, Box::new(program));
    session.start().unwrap();
    assert_eq!(session.public_root(), Some(root.join("src").as_path()));
    session.write_bundle().unwrap();

    assert_eq!(
        fs::read_to_string(root.join("dist/main.d.ts")).unwrap(),
        "export * from './index'\nimport MyLib from './index'\nexport default MyLib\n"
    );
    assert!(root.join("dist/index.d.ts").exists());
    assert!(!root.join("dist/src").exists());
}

#[test]
fn scenario_transformed_json_lands_next_to_scripts() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let program = library_program(root)
        .with_source(root.join("package.json"), r#"{ "name": "my-lib" }"#)
        .with_source(root.join("src/data.json"), r#"{"size":3}"#);

    let mut session = BuildSession::new(library_options(root), Box::new(program));
    session.start().unwrap();
    session.transform_sources().unwrap();
    let report = session.write_bundle().unwrap().unwrap();

    let dist = root.join("dist");
    assert!(report.written.contains(&dist.join("data.json.d.ts")));
    assert_eq!(
        fs::read_to_string(dist.join("data.json.d.ts")).unwrap(),
        "declare const _default: {\"size\":3};\n\nexport default _default;\n"
    );
    assert!(!report.written.contains(&dist.join("package.json.d.ts")));
    assert_eq!(report.written.len(), 4);
}
