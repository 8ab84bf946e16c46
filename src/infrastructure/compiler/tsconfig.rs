//! tsconfig loading
//!
//! Reads the subset of `tsconfig.json` the build needs. The file is JSON
//! with comments and trailing commas; `extends` is not followed.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::ports::CompilerOptions;
use crate::domain::value_objects::path as paths;
use crate::error::{DeclError, DeclResult};

pub const TSCONFIG_FILE: &str = "tsconfig.json";

#[derive(Debug, Default, Deserialize)]
struct RawTsConfig {
    #[serde(default, rename = "compilerOptions")]
    compiler_options: Option<serde_json::Value>,
    #[serde(default)]
    include: Option<Vec<String>>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
    #[serde(default)]
    files: Option<Vec<String>>,
}

/// A parsed tsconfig with its directory-relative paths made absolute
#[derive(Debug, Clone, PartialEq)]
pub struct TsConfig {
    pub path: PathBuf,
    pub compiler_options: CompilerOptions,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub files: Vec<PathBuf>,
}

impl TsConfig {
    pub fn load(path: &Path) -> DeclResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> DeclResult<Self> {
        let invalid = |message: String| DeclError::InvalidConfig {
            file: path.to_path_buf(),
            message,
        };
        let raw: RawTsConfig =
            serde_json::from_str(&strip_json_comments(content)).map_err(|e| invalid(e.to_string()))?;

        let dir = paths::parent_dir(path);
        let raw_options = raw
            .compiler_options
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
        let mut compiler_options: CompilerOptions =
            serde_json::from_value(raw_options.clone()).map_err(|e| invalid(e.to_string()))?;
        compiler_options.root_dir = compiler_options.root_dir.map(|p| paths::resolve(&dir, &p));
        compiler_options.out_dir = compiler_options.out_dir.map(|p| paths::resolve(&dir, &p));
        compiler_options.config_file_path = Some(path.to_path_buf());
        compiler_options.raw = raw_options;

        Ok(Self {
            path: path.to_path_buf(),
            compiler_options,
            include: raw.include,
            exclude: raw.exclude,
            files: raw
                .files
                .unwrap_or_default()
                .iter()
                .map(|f| paths::resolve(&dir, Path::new(f)))
                .collect(),
        })
    }

    pub fn dir(&self) -> PathBuf {
        paths::parent_dir(&self.path)
    }
}

/// Nearest `tsconfig.json` at or above `start`
pub fn find_tsconfig(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(TSCONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Drop `//` and `/* */` comments and trailing commas outside strings.
pub fn strip_json_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            ',' => {
                let rest: String = chars.clone().collect();
                let trimmed = strip_leading_trivia(&rest);
                if !(trimmed.starts_with('}') || trimmed.starts_with(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Skip whitespace and comments at the start of `rest`
fn strip_leading_trivia(rest: &str) -> &str {
    let mut rest = rest.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("//") {
            rest = after.split_once('\n').map(|(_, r)| r).unwrap_or("").trim_start();
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map(|(_, r)| r).unwrap_or("").trim_start();
        } else {
            return rest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments_but_not_strings() {
        let content = r#"{
  // line comment
  "a": "http://example.com", /* block */
  "b": [1, 2,],
}"#;
        let value: serde_json::Value =
            serde_json::from_str(&strip_json_comments(content)).unwrap();
        assert_eq!(value["a"], "http://example.com");
        assert_eq!(value["b"], serde_json::json!([1, 2]));
    }

    #[test]
    fn parse_resolves_directory_relative_options() {
        let config = TsConfig::parse(
            Path::new("/p/tsconfig.json"),
            r#"{
              "compilerOptions": { "rootDir": "./src", "baseUrl": ".", "declarationMap": true },
              "include": ["src"],
            }"#,
        )
        .unwrap();

        let options = &config.compiler_options;
        assert_eq!(options.root_dir, Some(PathBuf::from("/p/src")));
        assert_eq!(options.base_url, Some(PathBuf::from(".")));
        assert!(options.declaration_map);
        assert_eq!(options.config_file_path, Some(PathBuf::from("/p/tsconfig.json")));
        assert_eq!(options.raw["rootDir"], "./src");
        assert_eq!(config.include, Some(vec!["src".to_string()]));
        assert_eq!(config.exclude, None);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = TsConfig::parse(Path::new("/p/tsconfig.json"), "{ nope").unwrap_err();
        assert!(matches!(err, DeclError::InvalidConfig { .. }));
    }

    #[test]
    fn finds_config_in_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TSCONFIG_FILE), "{}").unwrap();
        let nested = dir.path().join("packages/a");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_tsconfig(&nested), Some(dir.path().join(TSCONFIG_FILE)));
    }
}
