//! Rollup Engines
//!
//! Implementations of the `RollupEngine` port.

mod api_extractor;

pub use api_extractor::ApiExtractorRollup;
