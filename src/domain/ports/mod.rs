//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure provides concrete implementations; tests provide fakes.

pub mod bundle_events;
pub mod file_system;
pub mod hooks;
pub mod program;
pub mod resolver;
pub mod rollup;

pub use bundle_events::{BundleEvent, BundleEventSink, NoopEventSink};
pub use file_system::{DirEntry, FileSystem, FsError, FsResult};
pub use hooks::{BuildHooks, NoopHooks, WriteDecision};
pub use program::{
    format_diagnostics, CompilerOptions, Diagnostic, DiagnosticCategory, EmitOutput, EmittedFile,
    LanguageService, Program, SourceFile,
};
pub use resolver::{Resolver, TransformContext};
pub use rollup::{RollupEngine, RollupRequest};
