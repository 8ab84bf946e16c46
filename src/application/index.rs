//! Types entry insertion
//!
//! Writes the root declaration file(s) planned by the entry synthesizer,
//! skipping targets that already exist on disk.

use std::path::{Path, PathBuf};

use crate::domain::entities::Entry;
use crate::domain::ports::FileSystem;
use crate::domain::services::{has_default_export, index_content, plan_index_files};
use crate::domain::value_objects::path as paths;
use crate::error::DeclResult;
use crate::infrastructure::manifest::ManifestCache;

use super::writer::{EmittedFiles, OutputWriter};

pub struct IndexContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub manifests: &'a ManifestCache,
    pub root: &'a Path,
    pub entry_root: &'a Path,
    pub entries: &'a [Entry],
    pub index_name: &'a str,
    /// Capitalized library name the default export is bound to
    pub lib_name: &'a str,
}

impl IndexContext<'_> {
    /// Declared `types` from the nearest manifest, else `<out_dir>/<index>`
    pub fn types_path(&self, out_dir: &Path) -> PathBuf {
        let manifest = self.manifests.load(self.fs, self.root);
        match manifest.types_path() {
            Some(types) => paths::resolve(self.root, Path::new(types)),
            None => out_dir.join(self.index_name),
        }
    }
}

/// Write missing root files. Returns the types path used for a single
/// entry.
pub fn insert_types_entries(
    ctx: &IndexContext<'_>,
    writer: &OutputWriter<'_>,
    emitted: &mut EmittedFiles,
) -> DeclResult<PathBuf> {
    let out_dir = writer.out_dir();
    let types_path = ctx.types_path(out_dir);

    for plan in plan_index_files(ctx.entries, &types_path, out_dir, ctx.entry_root) {
        if ctx.fs.exists(&plan.target) {
            continue;
        }
        let default_name = ctx
            .fs
            .read(&plan.declaration)
            .ok()
            .filter(|declaration| has_default_export(declaration))
            .map(|_| ctx.lib_name);
        let content = index_content(&plan.import_path, default_name);
        if let Some(written) = writer.write(&plan.target, &content)? {
            let (path, content) = written.into_parts();
            emitted.insert(path, content);
        }
    }

    Ok(types_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::parallel::WorkerPool;
    use crate::domain::ports::{NoopEventSink, NoopHooks};
    use crate::infrastructure::fs::MemoryFs;

    fn ctx<'a>(
        fs: &'a MemoryFs,
        manifests: &'a ManifestCache,
        entries: &'a [Entry],
    ) -> IndexContext<'a> {
        IndexContext {
            fs,
            manifests,
            root: Path::new("/p"),
            entry_root: Path::new("/p/src"),
            entries,
            index_name: "index.d.ts",
            lib_name: "MyLib",
        }
    }

    #[test]
    fn writes_index_with_default_reexport() {
        let fs = MemoryFs::new().with_file(
            "/p/dist/main.d.ts",
            "declare const _default: {};\nexport default _default;\n",
        );
        let manifests = ManifestCache::new();
        let entries = [Entry::new("main.ts", "/p/src/main.ts")];
        let pool = WorkerPool::new(2).unwrap();
        let writer = OutputWriter::new(&pool, &fs, &NoopHooks, &NoopEventSink, Path::new("/p/dist"), true);
        let mut emitted = EmittedFiles::new();

        let types = insert_types_entries(&ctx(&fs, &manifests, &entries), &writer, &mut emitted)
            .unwrap();

        assert_eq!(types, PathBuf::from("/p/dist/index.d.ts"));
        assert_eq!(
            fs.read(Path::new("/p/dist/index.d.ts")).unwrap(),
            "export * from './main'\nimport MyLib from './main'\nexport default MyLib\n"
        );
        assert!(emitted.contains_key(Path::new("/p/dist/index.d.ts")));
    }

    #[test]
    fn existing_target_is_left_alone() {
        let fs = MemoryFs::new().with_file("/p/dist/index.d.ts", "// hand written\n");
        let manifests = ManifestCache::new();
        let entries = [Entry::new("index.ts", "/p/src/index.ts")];
        let pool = WorkerPool::new(2).unwrap();
        let writer = OutputWriter::new(&pool, &fs, &NoopHooks, &NoopEventSink, Path::new("/p/dist"), true);
        let mut emitted = EmittedFiles::new();

        insert_types_entries(&ctx(&fs, &manifests, &entries), &writer, &mut emitted).unwrap();

        assert_eq!(
            fs.read(Path::new("/p/dist/index.d.ts")).unwrap(),
            "// hand written\n"
        );
        assert!(emitted.is_empty());
    }

    #[test]
    fn manifest_types_path_wins() {
        let fs = MemoryFs::new().with_file("/p/package.json", r#"{"types":"dist/types/lib.d.ts"}"#);
        let manifests = ManifestCache::new();
        let entries = [Entry::new("index.ts", "/p/src/index.ts")];
        let pool = WorkerPool::new(2).unwrap();
        let writer = OutputWriter::new(&pool, &fs, &NoopHooks, &NoopEventSink, Path::new("/p/dist"), true);
        let mut emitted = EmittedFiles::new();

        let types = insert_types_entries(&ctx(&fs, &manifests, &entries), &writer, &mut emitted)
            .unwrap();

        assert_eq!(types, PathBuf::from("/p/dist/types/lib.d.ts"));
        // No declaration emitted yet: wildcard re-export only
        assert_eq!(
            fs.read(&types).unwrap(),
            "export * from '../index'\n"
        );
    }
}
