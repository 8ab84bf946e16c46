//! Command implementations
//!
//! Both commands share the same setup: load configuration, pick an event
//! sink, and wire a [`BuildSession`] to `tsc` and api-extractor.

mod build;
mod watch;

pub use build::cmd_build;
pub use watch::cmd_watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use declpack::application::BuildSession;
use declpack::config::{self, ColorMode, Config, ConfigWarning, OneOrMany, Verbosity};
use declpack::domain::ports::BundleEventSink;
use declpack::domain::value_objects::{path as paths, SourceFilter};
use declpack::infrastructure::compiler::{find_tsconfig, TsConfig};
use declpack::infrastructure::resolvers::RESOLVED_EXTENSIONS;
use declpack::infrastructure::{ApiExtractorRollup, TscOptions, TscProgram};
use declpack::ui::{color_enabled, detect_capabilities, ConsoleEventSink, JsonEventSink};

use crate::cli::{Cli, ColorWhen};

/// Where build progress goes
pub enum Reporter {
    Console(Arc<ConsoleEventSink>),
    Json(Arc<JsonEventSink>),
}

impl Reporter {
    pub fn new(cli: &Cli, config: &Config) -> Self {
        if cli.json {
            return Reporter::Json(Arc::new(JsonEventSink::new()));
        }

        let caps = detect_capabilities();
        let mode = match cli.color {
            Some(ColorWhen::Always) => ColorMode::Always,
            Some(ColorWhen::Never) => ColorMode::Never,
            Some(ColorWhen::Auto) | None => config.output.color,
        };
        let verbosity = if cli.quiet {
            Verbosity::Quiet
        } else {
            match cli.verbose {
                0 => config.output.verbosity,
                1 => config.output.verbosity.max(Verbosity::Verbose),
                _ => Verbosity::Debug,
            }
        };
        Reporter::Console(Arc::new(ConsoleEventSink::new(
            verbosity,
            color_enabled(mode, &caps),
            caps.supports_unicode,
        )))
    }

    pub fn sink(&self) -> Arc<dyn BundleEventSink> {
        match self {
            Reporter::Console(sink) => sink.clone(),
            Reporter::Json(sink) => sink.clone(),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Reporter::Json(_))
    }

    pub fn error(&self, message: &str) {
        match self {
            Reporter::Console(sink) => sink.error(message),
            Reporter::Json(sink) => sink.error(message),
        }
    }

    pub fn config_warning(&self, warning: &ConfigWarning) {
        let location = match warning.line {
            Some(line) => format!("{}:{}", warning.file.display(), line),
            None => warning.file.display().to_string(),
        };
        let mut message = format!("unknown config key '{}' in {}", warning.key, location);
        if let Some(suggestion) = &warning.suggestion {
            message.push_str(&format!(" (did you mean '{}'?)", suggestion));
        }
        match self {
            Reporter::Console(_) => eprintln!("[declpack] {}", message),
            Reporter::Json(sink) => sink.warning(&message),
        }
    }
}

/// Everything a command needs to run
pub struct Prepared {
    pub session: BuildSession,
    pub reporter: Reporter,
}

/// Load configuration and wire up a session.
///
/// `out_dirs` from the command line replace the configured ones.
pub fn prepare(cli: &Cli, out_dirs: &[PathBuf], rollup: bool) -> Result<Prepared> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let root = cli
        .root
        .as_deref()
        .map(|root| paths::resolve(&cwd, root))
        .unwrap_or_else(|| cwd.clone());
    let config_path = cli
        .config
        .as_deref()
        .map(|path| paths::resolve(&cwd, path))
        .unwrap_or_else(|| root.join(config::CONFIG_FILE));
    let config_dir = paths::parent_dir(&config_path);

    let (mut config, warnings) = Config::load_or_default(&config_path)?;
    config = config.with_env_overrides();
    if !out_dirs.is_empty() {
        config.out_dir = Some(OneOrMany::Many(
            out_dirs
                .iter()
                .map(|dir| paths::to_slash(&paths::resolve(&cwd, dir)))
                .collect(),
        ));
    }
    if rollup {
        config.rollup_types = true;
    }
    if cli.root.is_some() && config.root.is_none() {
        config.root = Some(paths::relative(&config_dir, &root));
    }

    let reporter = Reporter::new(cli, &config);
    for warning in &warnings {
        reporter.config_warning(warning);
    }

    let project_root = config.project_root(&config_dir);
    let tsconfig = load_tsconfig(&config, &project_root)?;
    let options = config::build_options(&config, &config_dir, tsconfig.as_ref())?;

    let filter = SourceFilter::new(&options.root, &options.include, &options.exclude)?;
    let program = TscProgram::create(TscOptions {
        command: config.compiler.command.clone(),
        root: options.root.clone(),
        tsconfig,
        filter,
        extra_roots: options
            .entries()
            .iter()
            .map(|entry| entry.source_path.clone())
            .collect(),
        extensions: RESOLVED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
    })?;

    let session = BuildSession::new(options, Box::new(program))
        .with_events(reporter.sink())
        .with_rollup(Arc::new(ApiExtractorRollup::new(
            config.rollup.command.clone(),
        )));

    Ok(Prepared { session, reporter })
}

fn load_tsconfig(config: &Config, root: &Path) -> Result<Option<TsConfig>> {
    let path = match &config.tsconfig {
        Some(path) => Some(paths::resolve(root, path)),
        None => find_tsconfig(root),
    };
    path.map(|path| {
        TsConfig::load(&path).with_context(|| format!("failed to load {}", path.display()))
    })
    .transpose()
}
