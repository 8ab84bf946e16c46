//! Source map relocation
//!
//! A declaration map's `sources` are relative to the directory the map was
//! emitted into. Whenever the map is written somewhere else they have to be
//! re-expressed relative to the new directory.

use std::path::Path;

use crate::domain::entities::SourceMapDocument;
use crate::domain::value_objects::path as paths;
use crate::error::DeclResult;

/// Where a recorded map came from and where it is going
#[derive(Debug, Clone, Copy)]
pub struct MapRelocation<'a> {
    /// Directory the compiler resolves emitted names against
    pub current_dir: &'a Path,
    /// Root the accumulator keys are anchored on
    pub public_root: &'a Path,
    /// Directory of the accumulator key
    pub recorded_dir: &'a Path,
    /// Directory of the final on-disk file
    pub final_dir: &'a Path,
}

impl MapRelocation<'_> {
    /// Directory the map was physically emitted into
    pub fn emitted_dir(&self) -> std::path::PathBuf {
        paths::resolve(
            self.current_dir,
            &paths::relative(self.public_root, self.recorded_dir),
        )
    }
}

/// Re-anchor every `sources` entry for a map moved per `relocation`.
///
/// Fails only when `content` is not a source map; the caller decides what
/// to do with the original text.
pub fn relocate_sources(content: &str, relocation: &MapRelocation<'_>) -> DeclResult<String> {
    let emitted_dir = relocation.emitted_dir();
    let mut map = SourceMapDocument::parse(content)?;
    map.map_sources(|source| {
        let absolute = paths::resolve(&emitted_dir, Path::new(source));
        paths::to_slash(&paths::relative(relocation.final_dir, &absolute))
    });
    map.to_json()
}

/// Re-anchor `sources` for a copy of a map from `from_dir` into `to_dir`.
pub fn rebase_sources(content: &str, from_dir: &Path, to_dir: &Path) -> DeclResult<String> {
    let mut map = SourceMapDocument::parse(content)?;
    map.map_sources(|source| {
        let absolute = paths::resolve(from_dir, Path::new(source));
        paths::to_slash(&paths::relative(to_dir, &absolute))
    });
    map.to_json()
}
