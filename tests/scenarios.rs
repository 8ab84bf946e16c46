//! Scenario tests for declpack.
//!
//! Each scenario drives a full `BuildSession` the way a host build does:
//! start, optional transforms, flush. Sessions run against the real disk
//! (in a temp directory) unless the scenario is about pure layout.
//!
//! Run with: `cargo test --test scenarios`

mod common;

#[path = "scenarios/library_build.rs"]
mod library_build;

#[path = "scenarios/config_build.rs"]
mod config_build;

#[path = "scenarios/rollup.rs"]
mod rollup;

#[path = "scenarios/rebuild.rs"]
mod rebuild;
