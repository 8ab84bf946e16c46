//! Property tests for declaration rewriting.

use std::path::Path;

use proptest::prelude::*;

use declpack::domain::services::{RewriteOptions, Rewriter};
use declpack::domain::services::rewriter::scanner::{scan_imports, ImportKind};
use declpack::domain::value_objects::{AliasRule, AliasSet};

fn rewriter(clear_pure_import: bool, consolidate_dynamic_imports: bool) -> Rewriter {
    Rewriter::new(
        AliasSet::new(vec![AliasRule::literal("@/", "/p/src")], vec![]),
        RewriteOptions {
            clear_pure_import,
            consolidate_dynamic_imports,
        },
    )
}

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,8}")
        .unwrap()
        .prop_filter("must not be a keyword", |s| {
            !matches!(s.as_str(), "import" | "export" | "from" | "type" | "declare" | "const")
        })
}

fn declaration_line() -> impl Strategy<Value = String> {
    prop_oneof![
        (segment(), segment()).prop_map(|(name, dir)| format!("import {{ {name} }} from '@/{dir}/{name}';")),
        segment().prop_map(|name| format!("import './{name}.css';")),
        segment().prop_map(|name| format!("import '@/{name}';")),
        segment().prop_map(|name| format!("export * from './{name}';")),
        segment().prop_map(|name| format!("export declare const {name}: number;")),
        segment().prop_map(|name| format!("// see '@/{name}'")),
    ]
}

fn declaration_file() -> impl Strategy<Value = String> {
    proptest::collection::vec(declaration_line(), 0..12).prop_map(|lines| {
        let mut content = lines.join("\n");
        content.push('\n');
        content
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Rewriting never panics on arbitrary text.
    #[test]
    fn property_rewrite_never_panics(
        s in "(?s).{0,256}"
    ) {
        let file = Path::new("/p/src/index.d.ts");
        let _ = rewriter(true, true).rewrite(file, &s);
        let _ = rewriter(false, false).rewrite(file, &s);
    }

    /// PROPERTY: A rewritten declaration is a fixed point of the rewriter.
    #[test]
    fn property_rewrite_is_idempotent(
        content in declaration_file()
    ) {
        let rewriter = rewriter(true, false);
        let file = Path::new("/p/src/components/button.d.ts");

        let once = rewriter.rewrite(file, &content);
        let twice = rewriter.rewrite(file, &once);

        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: No side-effect import or alias specifier survives a rewrite.
    #[test]
    fn property_rewrite_clears_side_effects_and_aliases(
        content in declaration_file()
    ) {
        let file = Path::new("/p/src/components/button.d.ts");
        let out = rewriter(true, false).rewrite(file, &content);

        for site in scan_imports(&out) {
            prop_assert_ne!(site.kind, ImportKind::SideEffect);
            prop_assert!(!site.specifier(&out).starts_with("@/"));
        }
    }
}
