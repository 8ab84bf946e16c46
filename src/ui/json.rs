//! NDJSON event sink for CI
//!
//! One JSON object per line, tagged by `event`.

use std::io::{self, Write};
use std::sync::Mutex;

use serde::Serialize;

use crate::domain::ports::{BundleEvent, BundleEventSink};

/// Wire form of a [`BundleEvent`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JsonEvent<'a> {
    Started,
    Phase { name: &'a str },
    Diagnostics { count: usize, formatted: &'a str },
    NotALibrary,
    FileWritten { path: String },
    OutsideOutDir { path: String },
    SourceMapFailed { path: String, reason: &'a str },
    RollupStarted,
    Finished { written: usize, duration_ms: u64 },
    Warning { message: &'a str },
    Error { message: &'a str },
}

impl<'a> From<&'a BundleEvent> for JsonEvent<'a> {
    fn from(event: &'a BundleEvent) -> Self {
        match event {
            BundleEvent::Started => JsonEvent::Started,
            BundleEvent::Phase { name } => JsonEvent::Phase { name },
            BundleEvent::Diagnostics { count, formatted } => JsonEvent::Diagnostics {
                count: *count,
                formatted,
            },
            BundleEvent::NotALibrary => JsonEvent::NotALibrary,
            BundleEvent::FileWritten { path } => JsonEvent::FileWritten {
                path: path.display().to_string(),
            },
            BundleEvent::OutsideOutDir { path } => JsonEvent::OutsideOutDir {
                path: path.display().to_string(),
            },
            BundleEvent::SourceMapFailed { path, reason } => JsonEvent::SourceMapFailed {
                path: path.display().to_string(),
                reason,
            },
            BundleEvent::RollupStarted => JsonEvent::RollupStarted,
            BundleEvent::Finished {
                written,
                duration_ms,
            } => JsonEvent::Finished {
                written: *written,
                duration_ms: *duration_ms,
            },
        }
    }
}

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event<T: Serialize>(out: &mut impl Write, event: &T) -> io::Result<()> {
    let line =
        serde_json::to_string(event).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

pub struct JsonEventSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn warning(&self, message: &str) {
        self.emit(&JsonEvent::Warning { message });
    }

    /// Report an error that ended the build
    pub fn error(&self, message: &str) {
        self.emit(&JsonEvent::Error { message });
    }

    fn emit(&self, event: &JsonEvent<'_>) {
        if let Ok(mut out) = self.out.lock() {
            let _ = write_event(&mut *out, event);
            let _ = out.flush();
        }
    }
}

impl Default for JsonEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleEventSink for JsonEventSink {
    fn on_event(&self, event: BundleEvent) {
        self.emit(&JsonEvent::from(&event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(buffer: &SharedBuffer) -> Vec<serde_json::Value> {
        String::from_utf8(buffer.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn events_are_tagged_ndjson() {
        let buffer = SharedBuffer::default();
        let sink = JsonEventSink::with_writer(Box::new(buffer.clone()));

        sink.on_event(BundleEvent::Started);
        sink.on_event(BundleEvent::FileWritten {
            path: PathBuf::from("/p/dist/index.d.ts"),
        });
        sink.on_event(BundleEvent::Finished {
            written: 1,
            duration_ms: 7,
        });

        let events = lines(&buffer);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["event"], "started");
        assert_eq!(events[1]["event"], "file_written");
        assert_eq!(events[1]["path"], "/p/dist/index.d.ts");
        assert_eq!(events[2]["written"], 1);
        assert_eq!(events[2]["duration_ms"], 7);
    }

    #[test]
    fn errors_carry_message() {
        let buffer = SharedBuffer::default();
        let sink = JsonEventSink::with_writer(Box::new(buffer.clone()));

        sink.error("declaration rollup failed for \"x\"");

        let events = lines(&buffer);
        assert_eq!(events[0]["event"], "error");
        assert_eq!(events[0]["message"], "declaration rollup failed for \"x\"");
    }
}
