//! Property tests for declpack.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "idempotent".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/rewriter.rs"]
mod rewriter;

#[path = "properties/path_handling.rs"]
mod path_handling;
