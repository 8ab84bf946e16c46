//! declpack CLI - declaration file emitter and bundler
//!
//! Usage: declpack <COMMAND>
//!
//! Commands:
//!   build   Emit declaration files once
//!   watch   Build, then rebuild whenever a source file changes

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Build { out_dir, rollup } => commands::cmd_build(&cli, out_dir, *rollup),
        Commands::Watch { out_dir } => commands::cmd_watch(&cli, out_dir),
    }
}
