//! Compiler Adapters
//!
//! Implementations of the `Program` port.

mod memory;
pub mod tsc;
pub mod tsconfig;

pub use memory::MemoryProgram;
pub use tsc::{TscOptions, TscProgram};
pub use tsconfig::{find_tsconfig, TsConfig, TSCONFIG_FILE};
