//! Error types for declpack
//!
//! Library code returns `DeclResult`; the binary wraps it in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for declpack operations
pub type DeclResult<T> = Result<T, DeclError>;

/// Main error type for declpack operations
#[derive(Error, Debug)]
pub enum DeclError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Alias or glob pattern failed to compile
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The external compiler could not run or emitted nothing usable
    #[error("compiler failed: {message}")]
    Compiler { message: String },

    /// The rollup engine could not be prepared or spawned
    #[error("failed to prepare declaration rollup for {entry}: {message}")]
    RollupPrepare { entry: PathBuf, message: String },

    /// The rollup engine ran but reported failure
    #[error("declaration rollup failed for {entry}")]
    RollupFailed { entry: PathBuf },

    /// A flush or transform was requested before `start`
    #[error("build session has not been started")]
    SessionNotStarted,
}

impl From<crate::domain::ports::FsError> for DeclError {
    fn from(err: crate::domain::ports::FsError) -> Self {
        match err {
            crate::domain::ports::FsError::Io(e) => DeclError::Io(e),
            other => DeclError::Io(std::io::Error::other(other.to_string())),
        }
    }
}
