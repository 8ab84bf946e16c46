//! Watch loop driving a build session

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::application::BuildSession;
use crate::error::{DeclError, DeclResult};

use super::event::{ContentTracker, WatchEvent, WatchOptions, WatcherState};

/// Build once, then rebuild on every debounced source change until
/// `running` is cleared.
pub fn watch(
    session: &mut BuildSession,
    options: WatchOptions,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> DeclResult<()> {
    event_callback(WatchEvent::WatchStarted {
        root: options.root.display().to_string(),
    });

    session.start()?;
    session.transform_sources()?;
    rebuild(session, &event_callback);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                if matches!(event.kind, EventKind::Access(_)) {
                    return;
                }
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        Config::default(),
    )
    .map_err(|e| DeclError::Io(std::io::Error::other(e.to_string())))?;

    watcher
        .watch(&options.root, RecursiveMode::Recursive)
        .map_err(|e| DeclError::Io(std::io::Error::other(e.to_string())))?;

    // notify sometimes reports existing files right after registration
    let cooldown_end = Instant::now() + Duration::from_millis(500);
    while Instant::now() < cooldown_end && running.load(Ordering::SeqCst) {
        let _ = rx.recv_timeout(Duration::from_millis(50));
    }

    let mut state = WatcherState::new();
    let mut tracker = ContentTracker::default();

    while running.load(Ordering::SeqCst) {
        if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
            if options.is_ignored(&path) || !session.handles(&path) {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    if tracker.changed(&path, content) {
                        state.add_change(path);
                    }
                }
                Err(_) if !path.exists() => {
                    tracker.forget(&path);
                    state.add_change(path);
                }
                Err(_) => {}
            }
        }

        if state.should_sync() {
            let changes = state.take_changes();
            apply_changes(session, &changes, &event_callback);
        }
    }

    event_callback(WatchEvent::Shutdown);
    Ok(())
}

/// Invalidate each changed file, transform it again and flush if any was
/// accepted. Returns whether a rebuild ran.
pub fn apply_changes(
    session: &mut BuildSession,
    changes: &[PathBuf],
    event_callback: &impl Fn(WatchEvent),
) -> bool {
    let mut accepted = false;
    for path in changes {
        match session.invalidate(path) {
            Ok(true) => {
                event_callback(WatchEvent::FileChanged {
                    path: path.display().to_string(),
                });
                accepted = true;
                if let Err(e) = session.transform_source(path) {
                    event_callback(WatchEvent::Error {
                        message: e.to_string(),
                    });
                }
            }
            Ok(false) => {}
            Err(e) => event_callback(WatchEvent::Error {
                message: e.to_string(),
            }),
        }
    }

    if accepted {
        rebuild(session, event_callback);
    }
    accepted
}

fn rebuild(session: &mut BuildSession, event_callback: &impl Fn(WatchEvent)) {
    event_callback(WatchEvent::RebuildStarted);
    match session.write_bundle() {
        Ok(Some(report)) => event_callback(WatchEvent::RebuildComplete {
            written: report.file_count(),
            duration_ms: report.duration_ms,
        }),
        Ok(None) => event_callback(WatchEvent::RebuildComplete {
            written: 0,
            duration_ms: 0,
        }),
        Err(e) => event_callback(WatchEvent::Error {
            message: e.to_string(),
        }),
    }
}
