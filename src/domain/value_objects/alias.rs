//! Import alias rules
//!
//! An alias maps an import specifier prefix (or a regex) to a real path.
//! Rules are kept in registration order and the first matching rule wins;
//! later, more specific rules are never re-ranked ahead of earlier ones.

use std::fmt;

use regex::Regex;

use crate::error::{DeclError, DeclResult};

/// How an alias recognizes specifiers
#[derive(Debug, Clone)]
pub enum AliasFind {
    /// Prefix match on a path-segment boundary (`@` matches `@/x`, not `@x`)
    Literal(String),
    /// Regex match anywhere in the specifier
    Pattern(Regex),
}

impl AliasFind {
    pub fn pattern(source: &str) -> DeclResult<Self> {
        Regex::new(source)
            .map(AliasFind::Pattern)
            .map_err(|e| DeclError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, AliasFind::Literal(_))
    }
}

impl fmt::Display for AliasFind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasFind::Literal(s) => write!(f, "{}", s),
            AliasFind::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl PartialEq for AliasFind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AliasFind::Literal(a), AliasFind::Literal(b)) => a == b,
            (AliasFind::Pattern(a), AliasFind::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// A single alias: `find` → `replacement`
#[derive(Debug, Clone, PartialEq)]
pub struct AliasRule {
    pub find: AliasFind,
    /// Absolute target path, or a path kept relative as written.
    /// May contain `$n` capture references for pattern rules.
    pub replacement: String,
}

impl AliasRule {
    pub fn literal(find: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            find: AliasFind::Literal(find.into()),
            replacement: replacement.into(),
        }
    }

    pub fn pattern(find: &str, replacement: impl Into<String>) -> DeclResult<Self> {
        Ok(Self {
            find: AliasFind::pattern(find)?,
            replacement: replacement.into(),
        })
    }

    /// Does this rule apply to `specifier`?
    pub fn matches(&self, specifier: &str) -> bool {
        match &self.find {
            AliasFind::Pattern(re) => re.is_match(specifier),
            AliasFind::Literal(find) => {
                if specifier.len() < find.len() {
                    return false;
                }
                if specifier == find {
                    return true;
                }
                specifier.starts_with(find.as_str())
                    && (find.ends_with('/') || specifier[find.len()..].starts_with('/'))
            }
        }
    }

    /// Replace the matched part of `specifier` with `target`.
    ///
    /// A literal `find` ending in `/` keeps the separator after the target.
    pub fn apply(&self, specifier: &str, target: &str) -> String {
        match &self.find {
            AliasFind::Pattern(re) => re.replace(specifier, target).into_owned(),
            AliasFind::Literal(find) => {
                let rest = &specifier[find.len()..];
                if find.ends_with('/') {
                    format!("{}/{}", target, rest)
                } else {
                    format!("{}{}", target, rest)
                }
            }
        }
    }
}

/// Alias exclusion, by exact value or by regex
#[derive(Debug, Clone)]
pub enum AliasExclude {
    Literal(String),
    Pattern(Regex),
}

impl AliasExclude {
    pub fn pattern(source: &str) -> DeclResult<Self> {
        Regex::new(source)
            .map(AliasExclude::Pattern)
            .map_err(|e| DeclError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })
    }

    /// Does this exclusion remove `rule` from the set altogether?
    ///
    /// Regex rules are only removed by an exclusion with the same source
    /// text; literal rules by an equal literal or a non-empty regex match.
    pub fn excludes_rule(&self, rule: &AliasRule) -> bool {
        match (&rule.find, self) {
            (AliasFind::Pattern(find), AliasExclude::Pattern(ex)) => find.as_str() == ex.as_str(),
            (AliasFind::Pattern(find), AliasExclude::Literal(ex)) => find.as_str() == ex,
            (AliasFind::Literal(find), AliasExclude::Pattern(ex)) => {
                ex.find(find).is_some_and(|m| !m.as_str().is_empty())
            }
            (AliasFind::Literal(find), AliasExclude::Literal(ex)) => !ex.is_empty() && find == ex,
        }
    }

    /// Does this exclusion protect a concrete specifier from rewriting?
    pub fn excludes_specifier(&self, specifier: &str) -> bool {
        match self {
            AliasExclude::Pattern(ex) => ex.is_match(specifier),
            AliasExclude::Literal(ex) => ex == specifier,
        }
    }
}

/// Ordered alias rules plus the exclusions that guard them
#[derive(Debug, Clone, Default)]
pub struct AliasSet {
    rules: Vec<AliasRule>,
    excludes: Vec<AliasExclude>,
}

impl AliasSet {
    /// Build a set, dropping rules named by an exclusion.
    pub fn new(rules: Vec<AliasRule>, excludes: Vec<AliasExclude>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|rule| !excludes.iter().any(|ex| ex.excludes_rule(rule)))
            .collect();
        Self { rules, excludes }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[AliasRule] {
        &self.rules
    }

    /// Append a rule unless a literal rule with the same `find` exists.
    ///
    /// Returns whether the rule was added.
    pub fn push_if_absent(&mut self, rule: AliasRule) -> bool {
        if rule.find.is_literal() && self.rules.iter().any(|r| r.find == rule.find) {
            return false;
        }
        if self.excludes.iter().any(|ex| ex.excludes_rule(&rule)) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// First registered rule matching `specifier`, unless the specifier
    /// itself is excluded.
    pub fn resolve(&self, specifier: &str) -> Option<&AliasRule> {
        let rule = self.rules.iter().find(|rule| rule.matches(specifier))?;
        if self
            .excludes
            .iter()
            .any(|ex| ex.excludes_specifier(specifier))
        {
            return None;
        }
        Some(rule)
    }
}
