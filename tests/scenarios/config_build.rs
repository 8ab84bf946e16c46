//! Builds configured through `declpack.toml`.

use std::fs;

use declpack::application::BuildSession;
use declpack::config::{apply_overrides, build_options, Config, CONFIG_FILE};
use tempfile::tempdir;

use crate::common::*;

const CONFIG: &str = r#"
out_dir = "lib"

[lib]
name = "my-lib"
entry = "src/index.ts"

[[alias]]
find = "@/"
replacement = "./src"
"#;

#[test]
fn scenario_config_file_drives_build() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join(CONFIG_FILE), CONFIG).unwrap();

    let (config, warnings) = Config::load_or_default(&root.join(CONFIG_FILE)).unwrap();
    assert!(warnings.is_empty());
    let options = build_options(&config, root, None).unwrap();

    let mut session = BuildSession::new(options, Box::new(library_program(root)));
    session.start().unwrap();
    session.write_bundle().unwrap();

    assert_eq!(
        fs::read_to_string(root.join("lib/components/button.d.ts")).unwrap(),
        BUTTON_DTS_REWRITTEN
    );
    assert!(!root.join("dist").exists());
}

#[test]
fn scenario_env_override_redirects_output() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join(CONFIG_FILE), CONFIG).unwrap();

    let (config, _) = Config::load_or_default(&root.join(CONFIG_FILE)).unwrap();
    let config = apply_overrides(config, |key| {
        (key == "DECLPACK_OUT_DIR").then(|| "types,types-copy".to_string())
    });
    let options = build_options(&config, root, None).unwrap();

    let mut session = BuildSession::new(options, Box::new(library_program(root)));
    session.start().unwrap();
    let report = session.write_bundle().unwrap().unwrap();

    assert_eq!(report.written.len(), 3);
    assert_eq!(report.replicated.len(), 3);
    assert!(root.join("types/index.d.ts").exists());
    assert!(root.join("types-copy/utils/format.d.ts").exists());
    assert!(!root.join("lib").exists());
}

#[test]
fn scenario_unknown_keys_are_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "insert_type_entry = true\n").unwrap();

    let (config, warnings) = Config::load_or_default(&path).unwrap();

    assert!(!config.insert_types_entry);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("insert_types_entry")
    );
}
