//! Property tests for lexical path handling.

use std::path::PathBuf;

use proptest::prelude::*;

use declpack::domain::services::query_public_path;
use declpack::domain::value_objects::path as paths;

fn absolute_path() -> impl Strategy<Value = PathBuf> {
    let segment = proptest::string::string_regex("[a-z]{1,6}").unwrap();
    proptest::collection::vec(segment, 0..=5).prop_map(|segments| {
        let mut path = PathBuf::from("/");
        path.extend(segments);
        path
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Normalizing never panics on arbitrary input.
    #[test]
    fn property_normalize_never_panics(
        s in "(?s).{0,256}"
    ) {
        let _ = paths::normalize(std::path::Path::new(&s));
        let _ = paths::to_slash(std::path::Path::new(&s));
    }

    /// PROPERTY: `resolve(from, relative(from, to))` lands back on `to`.
    #[test]
    fn property_relative_round_trip(
        from in absolute_path(),
        to in absolute_path()
    ) {
        let relative = paths::relative(&from, &to);
        prop_assert_eq!(paths::resolve(&from, &relative), to);
    }

    /// PROPERTY: The public root contains every file's directory.
    #[test]
    fn property_public_root_is_common_ancestor(
        files in proptest::collection::vec(absolute_path(), 1..6)
    ) {
        let files: Vec<PathBuf> = files.into_iter().map(|dir| dir.join("index.d.ts")).collect();
        let public = query_public_path(&files);

        for file in &files {
            prop_assert!(file.parent().unwrap().starts_with(&public));
        }
    }
}
