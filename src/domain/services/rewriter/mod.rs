//! Declaration text rewriting
//!
//! Three transforms run in a fixed order on every non-map output:
//! pure-import removal, alias substitution, dynamic-import consolidation.
//! Each one is built on the lexical [`scanner`], so specifiers inside
//! comments and string literals are never touched.

mod alias;
mod dynamic_import;
mod pure_import;
pub mod scanner;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::value_objects::AliasSet;

pub use alias::rewrite_aliases;
pub use dynamic_import::consolidate_dynamic_imports;
pub use pure_import::remove_pure_imports;

static VUE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]([^'"\n]+)\.vue['"]"#).expect("valid vue reference regex"));

/// Which transforms are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOptions {
    pub clear_pure_import: bool,
    pub consolidate_dynamic_imports: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            clear_pure_import: true,
            consolidate_dynamic_imports: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    aliases: AliasSet,
    options: RewriteOptions,
}

impl Rewriter {
    pub fn new(aliases: AliasSet, options: RewriteOptions) -> Self {
        Self { aliases, options }
    }

    pub fn aliases(&self) -> &AliasSet {
        &self.aliases
    }

    pub fn options(&self) -> RewriteOptions {
        self.options
    }

    /// Rewrite the content of the declaration recorded at `file`.
    ///
    /// Alias targets are made relative to `file`'s directory; the final
    /// layout mirrors the recorded one, so the result stays valid after
    /// the file is moved under the output directory.
    pub fn rewrite(&self, file: &Path, content: &str) -> String {
        let mut content = if self.options.clear_pure_import {
            remove_pure_imports(content)
        } else {
            content.to_string()
        };
        content = rewrite_aliases(file, &content, &self.aliases);
        if self.options.consolidate_dynamic_imports {
            content = consolidate_dynamic_imports(&content);
        }
        content
    }
}

/// `Comp.vue.d.ts` → `Comp.d.ts`
pub fn clean_vue_path(path: &str) -> String {
    path.replacen(".vue.d.ts", ".d.ts", 1)
}

/// `'./Comp.vue'` → `"./Comp"`
pub fn clean_vue_references(content: &str) -> String {
    VUE_REFERENCE.replace_all(content, "\"$1\"").into_owned()
}
