//! Common test utilities for declpack integration tests.
//!
//! This module provides:
//! - A small library project (`library_program`, `library_options`)
//! - `FakeRollup`: a rollup engine that writes a marker file on disk
//! - `fake_compiler`: a shell script that plays `tsc` with canned output

pub mod fixtures;

pub use fixtures::*;
