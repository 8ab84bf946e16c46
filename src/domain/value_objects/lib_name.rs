//! Library binding name used for synthesized default re-exports

use std::fmt;

/// Fallback when no library name is configured
pub const DEFAULT_LIB_NAME: &str = "_default";

/// A capitalized, identifier-safe library name (`my-lib` → `MyLib`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibName(String);

impl LibName {
    pub fn new(raw: &str) -> Self {
        let raw = if raw.trim().is_empty() {
            DEFAULT_LIB_NAME
        } else {
            raw
        };
        Self(to_capital_case(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LibName {
    fn default() -> Self {
        Self::new(DEFAULT_LIB_NAME)
    }
}

impl fmt::Display for LibName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whitespace runs become hyphens, a hyphen run followed by a word char
/// becomes that char upper-cased, the first char is upper-cased and any
/// remaining non-word chars are dropped.
pub fn to_capital_case(value: &str) -> String {
    let hyphenated = value.split_whitespace().collect::<Vec<_>>().join("-");

    let mut camel = String::with_capacity(hyphenated.len());
    let mut chars = hyphenated.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '-' {
            camel.push(c);
            continue;
        }
        let mut run_end = None;
        while let Some(&next) = chars.peek() {
            if next == '-' {
                chars.next();
            } else {
                run_end = Some(next);
                break;
            }
        }
        match run_end {
            Some(next) if is_word(next) => {
                chars.next();
                camel.extend(next.to_uppercase());
            }
            _ => camel.push('-'),
        }
    }

    let mut out = String::with_capacity(camel.len());
    let mut chars = camel.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    out.extend(chars);
    out.retain(is_word);
    out
}
