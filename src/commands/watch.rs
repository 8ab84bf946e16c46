use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use declpack::watcher::{watch, WatchEvent, WatchOptions};

use crate::cli::Cli;

use super::prepare;

pub fn cmd_watch(cli: &Cli, out_dirs: &[PathBuf]) -> Result<()> {
    let mut prepared = prepare(cli, out_dirs, false)?;
    let options = prepared.session.options();
    let watch_options =
        WatchOptions::new(options.root.clone()).with_ignored(options.out_dirs.clone());

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let json = prepared.reporter.is_json();
    let root = watch_options.root.display().to_string();
    if !json {
        eprintln!("[declpack] watching {} (Ctrl+C to stop)", root);
    }

    let reporter = &prepared.reporter;
    watch(&mut prepared.session, watch_options, running, |event| {
        if json {
            println!("{}", event.to_json());
            return;
        }
        match event {
            WatchEvent::FileChanged { path } => eprintln!("[declpack] changed {}", path),
            WatchEvent::Error { message } => reporter.error(&message),
            WatchEvent::Shutdown => eprintln!("[declpack] stopped watching"),
            _ => {}
        }
    })?;
    Ok(())
}
