//! Captures `tracing` output as JSON records so tests can assert on it.

use std::io;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink.
///
/// ```rust,ignore
/// let logs = LogCapture::new();
/// let _guard = logs.install();
///
/// tracing::info!(status_code = 200, "done");
///
/// let records = logs.records_with_message("done");
/// assert_eq!(records[0]["level"], "INFO");
/// ```
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route events of the current thread into this capture until the guard
    /// is dropped. Tests on the current-thread runtime see events from every
    /// spawned task.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_ansi(false)
            .with_max_level(Level::TRACE)
            .with_writer(self.clone())
            .finish();

        tracing::subscriber::set_default(subscriber)
    }

    /// Every captured event, one JSON object per event.
    pub fn records(&self) -> Vec<Value> {
        let buffer = self.buffer.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn records_with_message(&self, message: &str) -> Vec<Value> {
        self.records()
            .into_iter()
            .filter(|record| record["message"] == message)
            .collect()
    }

    /// Records that carry a `protocol` field, i.e. request log records.
    pub fn request_records(&self) -> Vec<Value> {
        self.records()
            .into_iter()
            .filter(|record| record.get("protocol").is_some())
            .collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().expect("log buffer poisoned").clear();
    }
}

pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}
