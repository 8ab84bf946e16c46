//! Side-effect import removal
//!
//! Declaration files never need side effects, so `import './x';` lines are
//! dropped entirely.

use super::scanner::{scan_imports, ImportKind};

pub fn remove_pure_imports(content: &str) -> String {
    let sites: Vec<_> = scan_imports(content)
        .into_iter()
        .filter(|site| site.kind == ImportKind::SideEffect)
        .collect();
    if sites.is_empty() {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for site in sites {
        out.push_str(&content[last..site.span.start]);
        last = site.span.end;
    }
    out.push_str(&content[last..]);
    out
}
