//! Built-in Resolvers
//!
//! These implement the Resolver port for source formats the compiler does
//! not emit declarations for on its own.

pub mod json;
pub mod svelte;
pub mod vue;

pub use json::JsonResolver;
pub use svelte::SvelteResolver;
pub use vue::VueResolver;

use crate::domain::ports::Resolver;

/// Non-script extensions the built-in resolvers turn into declarations
pub const RESOLVED_EXTENSIONS: &[&str] = &["json", "vue", "svelte"];

/// Built-in resolvers, in registration order
pub fn builtin_resolvers() -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(JsonResolver::new()),
        Box::new(VueResolver::new()),
        Box::new(SvelteResolver::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn builtin_resolvers_are_named_uniquely() {
        let names: Vec<_> = builtin_resolvers()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["json", "vue", "svelte"]);
    }

    #[test]
    fn resolved_extensions_have_a_resolver() {
        let resolvers = builtin_resolvers();
        for ext in RESOLVED_EXTENSIONS {
            let id = format!("/p/src/file.{}", ext);
            assert!(
                resolvers.iter().any(|r| r.supports(Path::new(&id))),
                "no resolver for .{}",
                ext
            );
        }
    }

    #[test]
    fn typescript_sources_use_default_emission() {
        assert!(builtin_resolvers()
            .iter()
            .all(|r| !r.supports(Path::new("/p/src/index.ts"))));
    }
}
