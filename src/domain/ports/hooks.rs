//! Build hooks port
//!
//! User extension points around the write phase. `before_write_file` runs
//! on worker threads, so implementations must be `Send + Sync`.

use std::path::{Path, PathBuf};

use crate::error::DeclResult;

use super::program::Diagnostic;

/// Outcome of `before_write_file`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WriteDecision {
    /// Write as planned
    #[default]
    Keep,
    /// Do not write this file
    Skip,
    /// Write with a different path and/or content
    Rewrite {
        path: Option<PathBuf>,
        content: Option<String>,
    },
}

pub trait BuildHooks: Send + Sync {
    /// Veto or rewrite a single write
    fn before_write_file(&self, _path: &Path, _content: &str) -> WriteDecision {
        WriteDecision::Keep
    }

    /// Called once per start-up with the raw declaration diagnostics
    fn after_diagnostic(&self, _diagnostics: &[Diagnostic]) -> DeclResult<()> {
        Ok(())
    }

    /// Called once after every write of a flush completed
    fn after_build(&self) -> DeclResult<()> {
        Ok(())
    }
}

/// Hooks that never interfere
pub struct NoopHooks;

impl BuildHooks for NoopHooks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_hooks_keep_every_write() {
        let hooks = NoopHooks;
        assert_eq!(
            hooks.before_write_file(Path::new("/p/dist/a.d.ts"), "export {};"),
            WriteDecision::Keep
        );
        assert!(hooks.after_diagnostic(&[]).is_ok());
        assert!(hooks.after_build().is_ok());
    }
}
