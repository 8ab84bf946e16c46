//! Public root: the deepest directory containing every emitted source

use std::path::{Path, PathBuf};

use crate::domain::value_objects::path as paths;

/// Deepest common directory of `files`' parent directories.
///
/// Empty input yields an empty path; a single file yields its directory.
pub fn query_public_path<P: AsRef<Path>>(files: &[P]) -> PathBuf {
    let mut dirs = files
        .iter()
        .map(|file| paths::normalize(&paths::parent_dir(file.as_ref())));

    let Some(mut public) = dirs.next() else {
        return PathBuf::new();
    };

    for dir in dirs {
        if dir.starts_with(&public) {
            continue;
        }
        public = public
            .components()
            .zip(dir.components())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.as_os_str())
            .collect();
        if public.as_os_str().is_empty() {
            break;
        }
    }

    public
}
