//! Lexical path helpers
//!
//! Declaration paths are compared and re-anchored without touching the
//! disk, so everything here works on path components only:
//! - `normalize` folds `.` and `..`
//! - `resolve` anchors a path on a base directory
//! - `relative` computes the path from one directory to another
//! - `to_slash` renders a path with forward slashes for import specifiers

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path (no symlink resolution).
///
/// Leading `..` components of a relative path are preserved; `..` at the
/// root of an absolute path is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                out.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
        }
    }

    out
}

/// Anchor `path` on `base` unless it is already absolute, then normalize.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Path from directory `from` to `to`.
///
/// Returns an empty path when both are the same location. Falls back to
/// `to` when no relative path exists (different prefixes on Windows).
pub fn relative(from: &Path, to: &Path) -> PathBuf {
    let from = normalize(from);
    let to = normalize(to);
    pathdiff::diff_paths(&to, &from).unwrap_or(to)
}

/// Render a path with `/` separators.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Parent directory, or an empty path for a bare file name.
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// True when `path` sits inside (or is) `dir`, compared component-wise.
pub fn is_within(path: &Path, dir: &Path) -> bool {
    normalize(path).starts_with(normalize(dir))
}

/// Make a specifier explicitly relative (`./x`) when it isn't already.
pub fn ensure_dot_relative(specifier: &str) -> String {
    if specifier.is_empty() {
        ".".to_string()
    } else if specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
    {
        specifier.to_string()
    } else {
        format!("./{}", specifier)
    }
}
