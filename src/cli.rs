//! CLI Argument Parsing
//!
//! Global flags (--json, --color, --verbose, --quiet, --config, --root) are
//! inherited by all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// declpack - declaration file emitter and bundler for TypeScript libraries
#[derive(Parser, Debug)]
#[command(name = "declpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to declpack.toml (default: <root>/declpack.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project root (default: current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit declaration files once
    Build {
        /// Output directory, overriding the configuration (repeatable)
        #[arg(short, long)]
        out_dir: Vec<PathBuf>,

        /// Roll declarations up into one file per entry
        #[arg(long)]
        rollup: bool,
    },

    /// Build, then rebuild whenever a source file changes
    Watch {
        /// Output directory, overriding the configuration (repeatable)
        #[arg(short, long)]
        out_dir: Vec<PathBuf>,
    },
}
