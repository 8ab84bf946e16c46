//! Dynamic-import consolidation
//!
//! `import("lib").Name` type references are replaced by `Name` and a named
//! import of `lib` is hoisted to the top of the file (or merged into an
//! existing one). `default` members are bound to `__DTS_<n>__` locals.

use std::collections::HashMap;

use super::scanner::{scan_imports, scan_type_references, ImportKind, Keyword};

pub fn consolidate_dynamic_imports(content: &str) -> String {
    let references = scan_type_references(content);
    if references.is_empty() {
        return content.to_string();
    }

    let mut libs: Vec<(String, Vec<String>)> = Vec::new();
    let mut default_locals: HashMap<String, String> = HashMap::new();
    let mut default_count = 1;
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for reference in &references {
        let lib = &content[reference.specifier.clone()];
        let member = &content[reference.member.clone()];

        let (local, binding) = if member == "default" {
            let local = default_locals
                .entry(lib.to_string())
                .or_insert_with(|| {
                    let local = format!("__DTS_{}__", default_count);
                    default_count += 1;
                    local
                })
                .clone();
            let binding = format!("default as {}", local);
            (local, binding)
        } else {
            (member.to_string(), member.to_string())
        };

        let index = match libs.iter().position(|(name, _)| name == lib) {
            Some(index) => index,
            None => {
                libs.push((lib.to_string(), Vec::new()));
                libs.len() - 1
            }
        };
        let bindings = &mut libs[index].1;
        if !bindings.contains(&binding) {
            bindings.push(binding);
        }

        out.push_str(&content[last..reference.span.start]);
        out.push_str(&local);
        last = reference.span.end;
    }
    out.push_str(&content[last..]);

    let mut hoisted = String::new();
    for (lib, bindings) in libs {
        match merge_into_existing(&out, &lib, &bindings) {
            Some(merged) => out = merged,
            None => {
                hoisted.push_str(&format!(
                    "import {{ {} }} from '{}';\n",
                    bindings.join(", "),
                    lib
                ));
            }
        }
    }

    if hoisted.is_empty() {
        return out;
    }
    let at = after_directives(&out);
    out.insert_str(at, &hoisted);
    out
}

/// Merge `bindings` into the first static import of `lib` that can take
/// named bindings (`{ ... }` or `Default, { ... }`, or a plain default
/// import). Existing bindings, and any `type` modifier, stay first.
fn merge_into_existing(content: &str, lib: &str, bindings: &[String]) -> Option<String> {
    let (site, default, mut merged) = scan_imports(content).into_iter().find_map(|site| {
        if site.kind != ImportKind::Static
            || site.keyword != Keyword::Import
            || site.specifier(content) != lib
        {
            return None;
        }
        let bindings = site.bindings(content)?;
        // `import type X, { Y }` is not valid, so a type-only default
        // import cannot take bindings
        if bindings.named.is_none() && site.type_only {
            return None;
        }
        Some((site, bindings.default, bindings.named.unwrap_or_default()))
    })?;

    for binding in bindings {
        if !merged.iter().any(|existing| binding_key(existing) == binding_key(binding)) {
            merged.push(binding.clone());
        }
    }

    let default = default.map(|name| format!("{}, ", name)).unwrap_or_default();
    Some(format!(
        "{}{}{{ {} }}{}",
        &content[..site.clause.start],
        default,
        merged.join(", "),
        &content[site.clause.end..]
    ))
}

/// A binding without its `type` modifier
fn binding_key(binding: &str) -> &str {
    binding.strip_prefix("type ").unwrap_or(binding)
}

/// Offset just past the leading `///` directive lines.
fn after_directives(content: &str) -> usize {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if !line.trim_start().starts_with("///") {
            break;
        }
        offset += line.len();
    }
    offset
}
