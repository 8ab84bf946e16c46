//! Alias substitution in import/export specifiers

use std::path::Path;

use crate::domain::value_objects::path as paths;
use crate::domain::value_objects::{AliasFind, AliasSet};

use super::scanner::scan_imports;

/// Rewrite every aliased specifier in `content` to a path relative to the
/// directory of `file`.
pub fn rewrite_aliases(file: &Path, content: &str, aliases: &AliasSet) -> String {
    if aliases.is_empty() {
        return content.to_string();
    }

    let file_dir = paths::parent_dir(file);
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for site in scan_imports(content) {
        let specifier = site.specifier(content);
        let Some(rule) = aliases.resolve(specifier) else {
            continue;
        };
        // Pattern captures are expanded before the path is made relative
        let rewritten = match &rule.find {
            AliasFind::Pattern(_) => {
                truth_path(&file_dir, &rule.apply(specifier, &rule.replacement))
            }
            AliasFind::Literal(_) => {
                rule.apply(specifier, &truth_path(&file_dir, &rule.replacement))
            }
        };
        out.push_str(&content[last..site.specifier.start]);
        out.push_str(&rewritten);
        last = site.specifier.end;
    }

    out.push_str(&content[last..]);
    out
}

/// Replacement as seen from `file_dir`, always starting with `.`
fn truth_path(file_dir: &Path, replacement: &str) -> String {
    let replacement = Path::new(replacement);
    let truth = if replacement.is_absolute() {
        paths::relative(file_dir, replacement)
    } else {
        paths::normalize(replacement)
    };
    paths::ensure_dot_relative(&paths::to_slash(&truth))
}
