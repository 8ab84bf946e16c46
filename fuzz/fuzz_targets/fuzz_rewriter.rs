#![no_main]

use std::path::Path;

use declpack::domain::services::{RewriteOptions, Rewriter};
use declpack::domain::value_objects::{AliasRule, AliasSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let rewriter = Rewriter::new(
            AliasSet::new(vec![AliasRule::literal("@/", "/p/src")], vec![]),
            RewriteOptions {
                clear_pure_import: true,
                consolidate_dynamic_imports: true,
            },
        );
        let _ = rewriter.rewrite(Path::new("/p/src/index.d.ts"), content);
    }
});
