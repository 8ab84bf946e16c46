//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DeclResult;

use super::loader::{self, ConfigWarning};

/// A value written either as one string or as a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value.clone()],
            OneOrMany::Many(values) => values.clone(),
        }
    }
}

/// Library entries
///
/// Accepts a single path, a list of paths (named after their basename):
///   entry = ["src/index.ts", "src/cli.ts"]
///
/// Or a table of entry name to path:
///   [lib.entry]
///   main = "src/index.ts"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryConfig {
    Single(String),
    List(Vec<String>),
    Named(BTreeMap<String, String>),
}

/// `[lib]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibConfig {
    #[serde(default)]
    pub name: Option<String>,

    pub entry: EntryConfig,

    #[serde(default)]
    pub file_name: Option<String>,
}

/// One `[[alias]]` entry; exactly one of `find` and `pattern` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    #[serde(default)]
    pub find: Option<String>,

    /// Regular expression matched against the whole specifier
    #[serde(default)]
    pub pattern: Option<String>,

    pub replacement: String,
}

/// `[compiler]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default = "default_compiler_command")]
    pub command: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: default_compiler_command(),
        }
    }
}

fn default_compiler_command() -> Vec<String> {
    vec!["npx".to_string(), "tsc".to_string()]
}

/// `[rollup]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupConfig {
    #[serde(default = "default_rollup_command")]
    pub command: Vec<String>,

    /// Packages whose declarations are inlined into the rollup
    #[serde(default)]
    pub bundled_packages: Vec<String>,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            command: default_rollup_command(),
            bundled_packages: Vec::new(),
        }
    }
}

fn default_rollup_command() -> Vec<String> {
    vec!["npx".to_string(), "api-extractor".to_string()]
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,

    #[serde(default)]
    pub color: ColorMode,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

fn default_true() -> bool {
    true
}

/// Main configuration structure (`declpack.toml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Project root, relative to the config file's directory
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default)]
    pub tsconfig: Option<PathBuf>,

    #[serde(default)]
    pub entry_root: Option<PathBuf>,

    #[serde(default)]
    pub out_dir: Option<OneOrMany>,

    #[serde(default)]
    pub include: Option<OneOrMany>,

    #[serde(default)]
    pub exclude: Option<OneOrMany>,

    #[serde(default)]
    pub static_import: bool,

    #[serde(default = "default_true")]
    pub clear_pure_import: bool,

    #[serde(default)]
    pub clean_vue_file_name: bool,

    #[serde(default)]
    pub insert_types_entry: bool,

    #[serde(default)]
    pub rollup_types: bool,

    #[serde(default = "default_true")]
    pub paths_to_aliases: bool,

    #[serde(default)]
    pub copy_dts_files: bool,

    #[serde(default = "default_true")]
    pub strict_output: bool,

    #[serde(default)]
    pub aliases_exclude: Vec<String>,

    #[serde(default)]
    pub aliases_exclude_patterns: Vec<String>,

    #[serde(default)]
    pub lib: Option<LibConfig>,

    #[serde(default, rename = "alias")]
    pub aliases: Vec<AliasConfig>,

    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub rollup: RollupConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            tsconfig: None,
            entry_root: None,
            out_dir: None,
            include: None,
            exclude: None,
            static_import: false,
            clear_pure_import: true,
            clean_vue_file_name: false,
            insert_types_entry: false,
            rollup_types: false,
            paths_to_aliases: true,
            copy_dts_files: false,
            strict_output: true,
            aliases_exclude: Vec::new(),
            aliases_exclude_patterns: Vec::new(),
            lib: None,
            aliases: Vec::new(),
            compiler: CompilerConfig::default(),
            rollup: RollupConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> DeclResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> DeclResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> DeclResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(path)
    }

    /// Apply environment variable overrides (DECLPACK_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Project root: `root` resolved against the config file's directory
    pub fn project_root(&self, config_dir: &Path) -> PathBuf {
        match &self.root {
            Some(root) => crate::domain::value_objects::path::resolve(config_dir, root),
            None => config_dir.to_path_buf(),
        }
    }
}
