//! Entry/index synthesis
//!
//! Plans the root declaration file(s) that re-export each library entry.
//! Deciding whether a target already exists and reading the entry's
//! declaration is left to the caller; this module only computes paths and
//! content.

use std::path::{Path, PathBuf};

use crate::domain::entities::Entry;
use crate::domain::value_objects::file_kind;
use crate::domain::value_objects::path as paths;

/// One root file to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPlan {
    /// The root declaration file
    pub target: PathBuf,
    /// The entry's own emitted declaration
    pub declaration: PathBuf,
    /// Specifier from `target` to `declaration`
    pub import_path: String,
}

/// Plan one root file per entry.
///
/// A single entry is written at `types_path`; with several entries each
/// gets `<out_dir>/<entry name>.d.ts`.
pub fn plan_index_files(
    entries: &[Entry],
    types_path: &Path,
    out_dir: &Path,
    entry_root: &Path,
) -> Vec<IndexPlan> {
    let multiple = entries.len() > 1;
    entries
        .iter()
        .map(|entry| {
            let target = if multiple {
                out_dir.join(entry.declaration_file_name())
            } else {
                types_path.to_path_buf()
            };
            let declaration = entry.emitted_declaration(entry_root, out_dir);
            let import_path = import_path(&target, &declaration);
            IndexPlan {
                target,
                declaration,
                import_path,
            }
        })
        .collect()
}

/// Relative specifier for importing `declaration` from `target`.
pub fn import_path(target: &Path, declaration: &Path) -> String {
    let relative = paths::to_slash(&paths::relative(&paths::parent_dir(target), declaration));
    paths::ensure_dot_relative(file_kind::strip_declaration_extension(&relative))
}

/// Root file content. `default_name` is set when the entry's declaration
/// has a default export.
pub fn index_content(import_path: &str, default_name: Option<&str>) -> String {
    let mut content = format!("export * from '{}'\n", import_path);
    if let Some(name) = default_name {
        content.push_str(&format!(
            "import {name} from '{import_path}'\nexport default {name}\n"
        ));
    }
    content
}

/// Does this declaration text carry a default export?
pub fn has_default_export(declaration: &str) -> bool {
    declaration.contains("export default")
}
