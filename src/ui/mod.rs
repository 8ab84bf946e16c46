//! Event sinks for the command line
//!
//! - `console` - colored progress lines on stderr
//! - `json` - NDJSON stream on stdout for CI

pub mod console;
pub mod json;
pub mod terminal;
pub mod theme;

pub use console::ConsoleEventSink;
pub use json::{JsonEvent, JsonEventSink};
pub use terminal::{color_enabled, detect_capabilities, TerminalCapabilities};
