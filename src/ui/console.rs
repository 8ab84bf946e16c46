//! Console event sink
//!
//! Human-readable progress on stderr, gated by verbosity. Warnings show
//! at every level; phases and per-file lines only at verbose and above.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::config::Verbosity;
use crate::domain::ports::{BundleEvent, BundleEventSink};

use super::theme::{colors, paint, Icons};

const PREFIX: &str = "[declpack]";

pub struct ConsoleEventSink {
    verbosity: Verbosity,
    color: bool,
    icons: Icons,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn new(verbosity: Verbosity, color: bool, unicode: bool) -> Self {
        Self::with_writer(verbosity, color, unicode, Box::new(io::stderr()))
    }

    pub fn with_writer(
        verbosity: Verbosity,
        color: bool,
        unicode: bool,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            verbosity,
            color,
            icons: Icons::new(unicode),
            out: Mutex::new(out),
        }
    }

    /// The line printed for `event`, if any at this verbosity
    pub fn render(&self, event: &BundleEvent) -> Option<String> {
        let level = required_level(event);
        if self.verbosity < level {
            return None;
        }

        let prefix = paint(PREFIX, colors::INFO, self.color);
        let body = match event {
            BundleEvent::Started => "generating declaration files...".to_string(),
            BundleEvent::Phase { name } => {
                paint(&format!("{} {}", self.icons.progress, name), colors::DIM, self.color)
            }
            BundleEvent::Diagnostics { count, formatted } => {
                let header = self.warning(&format!("{} declaration diagnostic(s)", count));
                format!("{}\n{}", header, formatted.trim_end())
            }
            BundleEvent::NotALibrary => {
                self.warning("no [lib] entry configured; every source file is a root")
            }
            BundleEvent::FileWritten { path } => paint(
                &format!("{} {}", self.icons.arrow, path.display()),
                colors::DIM,
                self.color,
            ),
            BundleEvent::OutsideOutDir { path } => self.warning(&format!(
                "skipped {}: outside the output directory",
                path.display()
            )),
            BundleEvent::SourceMapFailed { path, reason } => self.warning(&format!(
                "could not relocate {}: {}",
                path.display(),
                reason
            )),
            BundleEvent::RollupStarted => "rolling up declaration files...".to_string(),
            BundleEvent::Finished {
                written,
                duration_ms,
            } => paint(
                &format!(
                    "{} declaration built in {}ms ({} files)",
                    self.icons.success, duration_ms, written
                ),
                colors::SUCCESS,
                self.color,
            ),
        };
        Some(format!("{} {}", prefix, body))
    }

    /// Print an error that ended the build
    pub fn error(&self, message: &str) {
        let line = format!(
            "{} {}",
            paint(PREFIX, colors::INFO, self.color),
            paint(
                &format!("{} {}", self.icons.error, message),
                colors::ERROR,
                self.color
            )
        );
        self.write_line(&line);
    }

    fn warning(&self, message: &str) -> String {
        paint(
            &format!("{} {}", self.icons.warning, message),
            colors::WARNING,
            self.color,
        )
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", line);
            let _ = out.flush();
        }
    }
}

fn required_level(event: &BundleEvent) -> Verbosity {
    if event.is_warning() {
        return Verbosity::Quiet;
    }
    match event {
        BundleEvent::RollupStarted | BundleEvent::Finished { .. } => Verbosity::Normal,
        BundleEvent::Started | BundleEvent::Phase { .. } | BundleEvent::FileWritten { .. } => {
            Verbosity::Verbose
        }
        _ => Verbosity::Normal,
    }
}

impl BundleEventSink for ConsoleEventSink {
    fn on_event(&self, event: BundleEvent) {
        if let Some(line) = self.render(&event) {
            self.write_line(&line);
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbosity >= Verbosity::Verbose
    }
}
