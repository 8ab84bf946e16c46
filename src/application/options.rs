//! Build Options
//!
//! Everything a [`BuildSession`](super::BuildSession) is configured with.
//! Paths are absolute by the time they reach here; `config` resolves them.

use std::path::{Path, PathBuf};

use crate::domain::entities::Entry;
use crate::domain::value_objects::file_kind;
use crate::domain::value_objects::{
    AliasExclude, AliasRule, DEFAULT_EXCLUDE, DEFAULT_INCLUDE, DEFAULT_LIB_NAME,
};

pub const DEFAULT_INDEX_NAME: &str = "index.d.ts";
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Library build settings
#[derive(Debug, Clone, PartialEq)]
pub struct LibOptions {
    /// Library name; the default re-export is bound to its capitalized form
    pub name: String,
    pub entries: Vec<Entry>,
    /// Root declaration file name (`index.mjs` is read as `index.d.mts`)
    pub file_name: String,
}

impl LibOptions {
    pub fn new(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            entries,
            file_name: DEFAULT_INDEX_NAME.to_string(),
        }
    }

    pub fn index_name(&self) -> String {
        file_kind::declaration_name(&self.file_name)
    }
}

/// Options for a declaration build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Project root
    pub root: PathBuf,
    /// Output paths mirror sources relative to this; defaults to the
    /// public root
    pub entry_root: Option<PathBuf>,
    /// Output directories; the first is primary, the rest get copies
    pub out_dirs: Vec<PathBuf>,
    /// `None` builds every source file without an index
    pub lib: Option<LibOptions>,
    pub aliases: Vec<AliasRule>,
    pub aliases_exclude: Vec<AliasExclude>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Hoist `import("x").T` references into static imports
    pub static_import: bool,
    pub clear_pure_import: bool,
    /// `X.vue.d.ts` → `X.d.ts`, `'./X.vue'` → `"./X"`
    pub clean_vue_file_name: bool,
    pub insert_types_entry: bool,
    pub rollup_types: bool,
    /// Turn tsconfig `paths` into aliases
    pub paths_to_aliases: bool,
    /// Copy hand-written `.d.ts` sources to the output
    pub copy_dts_files: bool,
    /// Refuse writes outside the primary output directory
    pub strict_output: bool,
    /// Packages the rollup engine inlines instead of importing
    pub bundled_packages: Vec<String>,
}

impl BuildOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let out_dir = root.join(DEFAULT_OUT_DIR);
        Self {
            root,
            entry_root: None,
            out_dirs: vec![out_dir],
            lib: None,
            aliases: Vec::new(),
            aliases_exclude: Vec::new(),
            include: vec![DEFAULT_INCLUDE.to_string()],
            exclude: vec![DEFAULT_EXCLUDE.to_string()],
            static_import: false,
            clear_pure_import: true,
            clean_vue_file_name: false,
            insert_types_entry: false,
            rollup_types: false,
            paths_to_aliases: true,
            copy_dts_files: false,
            strict_output: true,
            bundled_packages: Vec::new(),
        }
    }

    pub fn primary_out_dir(&self) -> &Path {
        self.out_dirs
            .first()
            .map(PathBuf::as_path)
            .unwrap_or(self.root.as_path())
    }

    pub fn entries(&self) -> &[Entry] {
        self.lib.as_ref().map(|lib| lib.entries.as_slice()).unwrap_or(&[])
    }

    pub fn lib_name(&self) -> &str {
        self.lib
            .as_ref()
            .map(|lib| lib.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_LIB_NAME)
    }

    pub fn index_name(&self) -> String {
        self.lib
            .as_ref()
            .map(LibOptions::index_name)
            .unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string())
    }

    /// Dynamic imports are consolidated for static imports and rollups
    pub fn consolidate_dynamic_imports(&self) -> bool {
        self.static_import || self.rollup_types
    }
}
