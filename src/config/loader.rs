//! Configuration loading and conversion to build options

use std::fs;
use std::path::{Path, PathBuf};

use crate::application::{BuildOptions, LibOptions, DEFAULT_OUT_DIR};
use crate::domain::entities::Entry;
use crate::domain::value_objects::path as paths;
use crate::domain::value_objects::{AliasExclude, AliasRule, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
use crate::error::{DeclError, DeclResult};
use crate::infrastructure::compiler::TsConfig;

use super::types::{AliasConfig, Config, EntryConfig, LibConfig, OneOrMany, Verbosity};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "declpack.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeclResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(path, &content)
}

pub(crate) fn parse_with_warnings(
    path: &Path,
    content: &str,
) -> DeclResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeclError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load `path` when it exists; a missing file yields the defaults
pub fn load_or_default(path: &Path) -> DeclResult<(Config, Vec<ConfigWarning>)> {
    if path.exists() {
        load_with_warnings(path)
    } else {
        Ok((Config::default(), Vec::new()))
    }
}

/// Apply environment variable overrides (DECLPACK_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`
pub fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    // DECLPACK_OUT_DIR (comma-separated)
    if let Some(dirs) = lookup("DECLPACK_OUT_DIR") {
        let parsed: Vec<String> = dirs
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        if !parsed.is_empty() {
            config.out_dir = Some(OneOrMany::Many(parsed));
        }
    }

    // DECLPACK_ROLLUP_TYPES
    if let Some(val) = lookup("DECLPACK_ROLLUP_TYPES") {
        config.rollup_types = parse_flag(&val);
    }

    // DECLPACK_STRICT_OUTPUT
    if let Some(val) = lookup("DECLPACK_STRICT_OUTPUT") {
        config.strict_output = parse_flag(&val);
    }

    // DECLPACK_VERBOSITY
    if let Some(verbosity) = lookup("DECLPACK_VERBOSITY") {
        config.output.verbosity = match verbosity.to_lowercase().as_str() {
            "quiet" => Verbosity::Quiet,
            "verbose" => Verbosity::Verbose,
            "debug" => Verbosity::Debug,
            _ => Verbosity::Normal,
        };
    }

    config
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() != "false" && val != "0"
}

/// Resolve a loaded configuration into build options.
///
/// `config_dir` anchors the configured root; include, exclude and the
/// output directory fall back to the tsconfig before the defaults.
pub fn build_options(
    config: &Config,
    config_dir: &Path,
    tsconfig: Option<&TsConfig>,
) -> DeclResult<BuildOptions> {
    let root = config.project_root(config_dir);
    let mut options = BuildOptions::new(&root);

    options.entry_root = config
        .entry_root
        .as_ref()
        .map(|entry_root| paths::resolve(&root, entry_root));

    let out_dirs: Vec<PathBuf> = config
        .out_dir
        .as_ref()
        .map(OneOrMany::to_vec)
        .unwrap_or_default()
        .iter()
        .map(|dir| paths::resolve(&root, Path::new(dir)))
        .collect();
    options.out_dirs = if out_dirs.is_empty() {
        vec![tsconfig
            .and_then(|ts| ts.compiler_options.out_dir.clone())
            .unwrap_or_else(|| root.join(DEFAULT_OUT_DIR))]
    } else {
        out_dirs
    };

    options.include = config
        .include
        .as_ref()
        .map(OneOrMany::to_vec)
        .or_else(|| tsconfig.and_then(|ts| ts.include.clone()))
        .unwrap_or_else(|| vec![DEFAULT_INCLUDE.to_string()]);
    options.exclude = config
        .exclude
        .as_ref()
        .map(OneOrMany::to_vec)
        .or_else(|| tsconfig.and_then(|ts| ts.exclude.clone()))
        .unwrap_or_else(|| vec![DEFAULT_EXCLUDE.to_string()]);

    options.lib = config.lib.as_ref().map(|lib| lib_options(lib, &root));
    options.aliases = config
        .aliases
        .iter()
        .map(|alias| alias_rule(alias, &root, config_dir))
        .collect::<DeclResult<_>>()?;
    options.aliases_exclude = config
        .aliases_exclude
        .iter()
        .map(|value| Ok(AliasExclude::Literal(value.clone())))
        .chain(
            config
                .aliases_exclude_patterns
                .iter()
                .map(|pattern| AliasExclude::pattern(pattern)),
        )
        .collect::<DeclResult<_>>()?;

    options.static_import = config.static_import;
    options.clear_pure_import = config.clear_pure_import;
    options.clean_vue_file_name = config.clean_vue_file_name;
    options.insert_types_entry = config.insert_types_entry;
    options.rollup_types = config.rollup_types;
    options.paths_to_aliases = config.paths_to_aliases;
    options.copy_dts_files = config.copy_dts_files;
    options.strict_output = config.strict_output;
    options.bundled_packages = config.rollup.bundled_packages.clone();

    Ok(options)
}

fn lib_options(lib: &LibConfig, root: &Path) -> LibOptions {
    let entries = match &lib.entry {
        EntryConfig::Single(path) => vec![Entry::from_path(Path::new(path), root)],
        EntryConfig::List(list) => list
            .iter()
            .map(|path| Entry::from_path(Path::new(path), root))
            .collect(),
        EntryConfig::Named(named) => named
            .iter()
            .map(|(name, path)| Entry::new(name.clone(), paths::resolve(root, Path::new(path))))
            .collect(),
    };
    let mut options = LibOptions::new(lib.name.clone().unwrap_or_default(), entries);
    if let Some(file_name) = &lib.file_name {
        options.file_name = file_name.clone();
    }
    options
}

fn alias_rule(alias: &AliasConfig, root: &Path, config_dir: &Path) -> DeclResult<AliasRule> {
    let replacement = resolve_replacement(&alias.replacement, root);
    match (&alias.find, &alias.pattern) {
        (Some(find), None) => Ok(AliasRule::literal(find.clone(), replacement)),
        (None, Some(pattern)) => AliasRule::pattern(pattern, replacement),
        _ => Err(DeclError::InvalidConfig {
            file: config_dir.join(CONFIG_FILE),
            message: format!(
                "alias to '{}' needs exactly one of `find` and `pattern`",
                alias.replacement
            ),
        }),
    }
}

/// Relative filesystem targets become absolute; bare package names stay.
fn resolve_replacement(replacement: &str, root: &Path) -> String {
    let path = Path::new(replacement);
    if path.is_absolute() {
        return replacement.to_string();
    }
    let first = replacement.split('/').next().unwrap_or(replacement);
    let is_local = first.starts_with('.') || (!first.is_empty() && root.join(first).is_dir());
    if !is_local {
        return replacement.to_string();
    }
    paths::to_slash(&paths::resolve(root, path))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "root",
        "tsconfig",
        "entry_root",
        "out_dir",
        "include",
        "exclude",
        "static_import",
        "clear_pure_import",
        "clean_vue_file_name",
        "insert_types_entry",
        "rollup_types",
        "paths_to_aliases",
        "copy_dts_files",
        "strict_output",
        "aliases_exclude",
        "aliases_exclude_patterns",
        "lib",
        "name",
        "entry",
        "file_name",
        "alias",
        "find",
        "pattern",
        "replacement",
        "compiler",
        "rollup",
        "command",
        "bundled_packages",
        "output",
        "verbosity",
        "color",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
