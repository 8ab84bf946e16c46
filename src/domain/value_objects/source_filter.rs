//! Include/exclude filter over source files
//!
//! Globs are written relative to the project root. A glob naming a
//! directory (`src`, `src/`) is widened to everything below it.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{DeclError, DeclResult};

use super::path as paths;

pub const DEFAULT_INCLUDE: &str = "**/*";
pub const DEFAULT_EXCLUDE: &str = "node_modules/**";

/// `src/` → `src/**`, `src` → `src/**`; file globs and `*` stay as-is.
pub fn normalize_glob(glob: &str) -> String {
    if glob.ends_with('/') || glob.ends_with('\\') {
        return format!("{}**", glob);
    }
    let last = glob.rsplit(['/', '\\']).next().unwrap_or(glob);
    let has_extension = last
        .rfind('.')
        .is_some_and(|idx| idx + 1 < last.len());
    let all_stars = !last.is_empty() && last.chars().all(|c| c == '*');
    if has_extension || all_stars {
        glob.to_string()
    } else {
        format!("{}/**", glob)
    }
}

#[derive(Debug, Clone)]
pub struct SourceFilter {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
}

impl SourceFilter {
    pub fn new(root: &Path, include: &[String], exclude: &[String]) -> DeclResult<Self> {
        Ok(Self {
            root: paths::normalize(root),
            include: build_set(include)?,
            exclude: build_set(exclude)?,
        })
    }

    /// `**/*` minus `node_modules/**`
    pub fn with_defaults(root: &Path) -> DeclResult<Self> {
        Self::new(
            root,
            &[DEFAULT_INCLUDE.to_string()],
            &[DEFAULT_EXCLUDE.to_string()],
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Is `path` (absolute, or relative to the root) a build input?
    pub fn matches(&self, path: &Path) -> bool {
        let absolute = paths::resolve(&self.root, path);
        if !paths::is_within(&absolute, &self.root) {
            return false;
        }
        let relative = paths::to_slash(&paths::relative(&self.root, &absolute));
        self.include.is_match(&relative) && !self.exclude.is_match(&relative)
    }
}

fn build_set(globs: &[String]) -> DeclResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let normalized = normalize_glob(glob.trim_start_matches("./"));
        let compiled = Glob::new(&normalized).map_err(|e| DeclError::InvalidPattern {
            pattern: glob.clone(),
            message: e.to_string(),
        })?;
        builder.add(compiled);
    }
    builder.build().map_err(|e| DeclError::InvalidPattern {
        pattern: globs.join(", "),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_widens_directories() {
        assert_eq!(normalize_glob("src"), "src/**");
        assert_eq!(normalize_glob("src/"), "src/**");
        assert_eq!(normalize_glob("src/*.ts"), "src/*.ts");
        assert_eq!(normalize_glob("**"), "**");
        assert_eq!(normalize_glob("src/**"), "src/**");
        assert_eq!(normalize_glob("env.d.ts"), "env.d.ts");
    }

    #[test]
    fn defaults_skip_node_modules() {
        let filter = SourceFilter::with_defaults(Path::new("/p")).unwrap();
        assert!(filter.matches(Path::new("/p/src/index.ts")));
        assert!(!filter.matches(Path::new("/p/node_modules/vue/index.d.ts")));
        assert!(!filter.matches(Path::new("/elsewhere/a.ts")));
    }

    #[test]
    fn include_directory_and_exclude_tests() {
        let filter = SourceFilter::new(
            Path::new("/p"),
            &["src".to_string()],
            &["src/**/*.spec.ts".to_string()],
        )
        .unwrap();
        assert!(filter.matches(Path::new("/p/src/a/b.ts")));
        assert!(filter.matches(Path::new("src/c.vue")));
        assert!(!filter.matches(Path::new("/p/src/a/b.spec.ts")));
        assert!(!filter.matches(Path::new("/p/test/x.ts")));
    }

    #[test]
    fn invalid_globs_are_reported() {
        let err = SourceFilter::new(Path::new("/p"), &["src/[".to_string()], &[]).unwrap_err();
        assert!(matches!(err, DeclError::InvalidPattern { .. }));
    }
}
