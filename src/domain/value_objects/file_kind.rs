//! Script and declaration file-name classification
//!
//! Extensions come in `ts`/`tsx` and `js`/`jsx` flavours, each optionally
//! prefixed with `m` (ES module) or `c` (CommonJS).

const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "mtsx", "cts", "ctsx"];
const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "mjsx", "cjs", "cjsx"];

fn extension(name: &str) -> Option<&str> {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    file.rfind('.').map(|idx| &file[idx + 1..])
}

fn strip_extension_in<'a>(name: &'a str, allowed: &[&[&str]]) -> &'a str {
    match extension(name) {
        Some(ext) if allowed.iter().any(|set| set.contains(&ext)) => {
            &name[..name.len() - ext.len() - 1]
        }
        _ => name,
    }
}

/// `.ts`, `.tsx`, `.mts`, `.cts`, ...
pub fn is_ts(name: &str) -> bool {
    extension(name).is_some_and(|ext| TS_EXTENSIONS.contains(&ext))
}

/// `.js`, `.jsx`, `.mjs`, `.cjs`, ...
pub fn is_js(name: &str) -> bool {
    extension(name).is_some_and(|ext| JS_EXTENSIONS.contains(&ext))
}

/// Any TypeScript or JavaScript source.
pub fn is_script(name: &str) -> bool {
    is_ts(name) || is_js(name)
}

/// `.d.ts`, `.d.mts`, `.d.cts`, `.d.tsx`
pub fn is_declaration(name: &str) -> bool {
    is_ts(name) && strip_ts_extension(name).ends_with(".d")
}

/// A script the compiler writes a declaration for. JavaScript only counts
/// when JS emission is on.
pub fn is_emitted_source(name: &str, no_emit_for_js: bool) -> bool {
    is_script(name) && !is_declaration(name) && !(no_emit_for_js && is_js(name))
}

/// Drop a TypeScript extension (`a/b.mts` → `a/b`).
pub fn strip_ts_extension(name: &str) -> &str {
    strip_extension_in(name, &[TS_EXTENSIONS])
}

/// Drop a TypeScript or JavaScript extension.
pub fn strip_script_extension(name: &str) -> &str {
    strip_extension_in(name, &[TS_EXTENSIONS, JS_EXTENSIONS])
}

/// Drop a declaration suffix (`a/b.d.ts` → `a/b`); other names unchanged.
pub fn strip_declaration_extension(name: &str) -> &str {
    if is_declaration(name) {
        let stem = strip_ts_extension(name);
        &stem[..stem.len() - 2]
    } else {
        name
    }
}

/// Module-kind prefix carried over to the declaration extension.
pub fn module_prefix(name: &str) -> &'static str {
    match extension(name) {
        Some(ext) if ext.starts_with('m') && is_script(name) => "m",
        Some(ext) if ext.starts_with('c') && is_script(name) => "c",
        _ => "",
    }
}

/// Declaration file name for an index or entry output name.
///
/// `index.mjs` → `index.d.mts`, `types` → `types.d.ts`; names that are
/// already declarations are returned as-is.
pub fn declaration_name(name: &str) -> String {
    if is_declaration(name) {
        return name.to_string();
    }
    format!(
        "{}.d.{}ts",
        strip_script_extension(name),
        module_prefix(name)
    )
}
