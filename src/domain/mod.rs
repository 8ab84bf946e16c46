//! Domain Layer
//!
//! The declaration pipeline's pure core: no I/O happens here.
//!
//! ## Structure
//!
//! - `entities/` - Core domain entities (OutputFile, Entry, SourceMapDocument)
//! - `value_objects/` - Immutable value types (AliasRule, LibName, path helpers)
//! - `services/` - Domain services (Rewriter, ResolverRegistry, entry synthesis)
//! - `ports/` - Interface definitions for the compiler, rollup engine and disk

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
