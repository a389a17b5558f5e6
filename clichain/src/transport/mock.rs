//! Scripted in-memory transport and log capture for session tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use log::{Level, LevelFilter, Log, Metadata, Record};

use super::CliTransport;
use crate::error::TransportError;

pub(crate) const PROMPT: &str = "switch:1#";

enum Reply {
    Output(String),
    Failure(TransportError),
}

/// Transport that answers from a table of canned replies.
///
/// Commands without a canned reply echo back with an empty body and a
/// prompt, which classifies as success.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Vec<(String, Reply)>,
    pub sent: Vec<(String, bool)>,
    snapshot_dir: Option<PathBuf>,
    pub snapshots: Vec<BTreeMap<String, String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `body` (echo and prompt added) to commands starting with `prefix`.
    pub fn respond(mut self, prefix: &str, body: &str) -> Self {
        self.replies
            .push((prefix.to_string(), Reply::Output(body.to_string())));
        self
    }

    /// Fail at the transport layer for commands starting with `prefix`.
    pub fn fail(mut self, prefix: &str, message: &str) -> Self {
        let error = TransportError::Failed {
            message: message.to_string(),
        };
        self.replies.push((prefix.to_string(), Reply::Failure(error)));
        self
    }

    /// Drop the connection on commands starting with `prefix`.
    pub fn disconnect(mut self, prefix: &str) -> Self {
        self.replies
            .push((prefix.to_string(), Reply::Failure(TransportError::Disconnected)));
        self
    }

    /// Give up after `after` on commands starting with `prefix`.
    pub fn time_out(mut self, prefix: &str, after: Duration) -> Self {
        self.replies
            .push((prefix.to_string(), Reply::Failure(TransportError::Timeout(after))));
        self
    }

    /// Record the files of `dir` every time a command is sent.
    pub fn snapshot(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    pub fn commands(&self) -> Vec<&str> {
        self.sent.iter().map(|(c, _)| c.as_str()).collect()
    }

    fn take_snapshot(&mut self) {
        let Some(dir) = &self.snapshot_dir else {
            return;
        };
        let mut files = BTreeMap::new();
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                let content = fs::read_to_string(entry.path()).unwrap_or_default();
                files.insert(name, content);
            }
        }
        self.snapshots.push(files);
    }
}

impl CliTransport for MockTransport {
    async fn send(&mut self, command: &str, wait_for_prompt: bool) -> Result<String, TransportError> {
        self.sent.push((command.to_string(), wait_for_prompt));
        self.take_snapshot();

        let reply = self
            .replies
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply);

        match reply {
            Some(Reply::Failure(error)) => Err(error.clone()),
            Some(Reply::Output(body)) if body.is_empty() => Ok(format!("{command}\n{PROMPT}")),
            Some(Reply::Output(body)) => Ok(format!("{command}\n{body}\n{PROMPT}")),
            None => Ok(format!("{command}\n{PROMPT}")),
        }
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Logger that keeps records per thread, so parallel tests stay apart.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        CAPTURED.with(|captured| {
            captured
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Start capturing log records emitted on the current thread.
///
/// `#[tokio::test]` runs on a current-thread runtime, so everything the
/// session logs lands on the test's own thread.
pub(crate) fn capture_logs() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

/// Records captured on the current thread since [`capture_logs`].
pub(crate) fn captured_logs() -> Vec<(Level, String)> {
    CAPTURED.with(|captured| captured.borrow().clone())
}
