//! Package manifest reading
//!
//! Only the declared types entry matters here. Lookups of the nearest
//! `package.json` are memoized in a [`ManifestCache`] owned by the session,
//! never in global state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::FileSystem;
use crate::error::DeclResult;

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishConfig {
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub typings: Option<String>,
}

/// The parts of `package.json` the pipeline reads
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub typings: Option<String>,
    #[serde(default)]
    pub publish_config: Option<PublishConfig>,
    #[serde(default)]
    pub exports: Option<Value>,
}

impl PackageManifest {
    pub fn parse(content: &str) -> DeclResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Declared types entry, first of: `types`, `typings`,
    /// `publishConfig.types`, `publishConfig.typings`,
    /// `exports["."].types` (or `exports["./"].types`).
    pub fn types_path(&self) -> Option<&str> {
        let publish = self.publish_config.as_ref();
        let exported = self.exports.as_ref().and_then(|exports| {
            exports
                .get(".")
                .or_else(|| exports.get("./"))
                .and_then(|root| root.get("types"))
                .and_then(Value::as_str)
        });

        [
            self.types.as_deref(),
            self.typings.as_deref(),
            publish.and_then(|p| p.types.as_deref()),
            publish.and_then(|p| p.typings.as_deref()),
            exported,
        ]
        .into_iter()
        .flatten()
        .find(|path| !path.is_empty())
    }
}

/// Memo of directory → nearest manifest path
#[derive(Debug, Default)]
pub struct ManifestCache {
    lookups: Mutex<HashMap<PathBuf, Option<PathBuf>>>,
}

impl ManifestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nearest `package.json` at or above `start`.
    pub fn find(&self, fs: &dyn FileSystem, start: &Path) -> Option<PathBuf> {
        let mut lookups = self.lookups.lock().unwrap_or_else(|e| e.into_inner());
        let mut visited = Vec::new();
        let mut current = Some(start);

        let found = loop {
            let Some(dir) = current else {
                break None;
            };
            if let Some(cached) = lookups.get(dir) {
                break cached.clone();
            }
            visited.push(dir.to_path_buf());
            let candidate = dir.join(MANIFEST_FILE);
            if fs.exists(&candidate) {
                break Some(candidate);
            }
            current = dir.parent().filter(|p| !p.as_os_str().is_empty());
        };

        for dir in visited {
            lookups.insert(dir, found.clone());
        }
        found
    }

    /// Manifest nearest to `start`; missing or invalid manifests read as
    /// empty.
    pub fn load(&self, fs: &dyn FileSystem, start: &Path) -> PackageManifest {
        self.find(fs, start)
            .and_then(|path| fs.read(&path).ok())
            .and_then(|content| PackageManifest::parse(&content).ok())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        self.lookups
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fs::MemoryFs;

    #[test]
    fn types_lookup_order() {
        let manifest = PackageManifest::parse(
            r#"{"typings":"lib/t.d.ts","publishConfig":{"types":"p.d.ts"},"exports":{".":{"types":"e.d.ts"}}}"#,
        )
        .unwrap();
        assert_eq!(manifest.types_path(), Some("lib/t.d.ts"));

        let manifest =
            PackageManifest::parse(r#"{"types":"","exports":{"./":{"types":"e.d.ts"}}}"#)
                .unwrap();
        assert_eq!(manifest.types_path(), Some("e.d.ts"));

        assert_eq!(PackageManifest::default().types_path(), None);
    }

    #[test]
    fn exports_as_string_is_ignored() {
        let manifest = PackageManifest::parse(r#"{"exports":"./index.js"}"#).unwrap();
        assert_eq!(manifest.types_path(), None);
    }

    #[test]
    fn find_walks_upwards_and_memoizes() {
        let fs = MemoryFs::new().with_file("/repo/package.json", "{}");
        fs.create_dir_all(Path::new("/repo/packages/lib")).unwrap();
        let cache = ManifestCache::new();

        assert_eq!(
            cache.find(&fs, Path::new("/repo/packages/lib")),
            Some(PathBuf::from("/repo/package.json"))
        );

        // Memoized even after the file disappears
        fs.remove(Path::new("/repo/package.json")).unwrap();
        assert_eq!(
            cache.find(&fs, Path::new("/repo/packages")),
            Some(PathBuf::from("/repo/package.json"))
        );

        cache.clear();
        assert_eq!(cache.find(&fs, Path::new("/repo/packages")), None);
    }

    #[test]
    fn invalid_manifest_loads_empty() {
        let fs = MemoryFs::new().with_file("/p/package.json", "{ not json");
        let manifest = ManifestCache::new().load(&fs, Path::new("/p"));
        assert_eq!(manifest, PackageManifest::default());
    }
}
