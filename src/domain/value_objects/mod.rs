//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod alias;
pub mod file_kind;
mod lib_name;
pub mod path;
mod source_filter;

pub use alias::{AliasExclude, AliasFind, AliasRule, AliasSet};
pub use lib_name::{to_capital_case, LibName, DEFAULT_LIB_NAME};
pub use source_filter::{normalize_glob, SourceFilter, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
