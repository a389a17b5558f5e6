//! Collaborators injected by the host environment.
//!
//! The host owns the variable map of the running script and the results
//! channel that reports its terminal outcome. Both are narrow traits so a
//! session can run against the real orchestrator or plain in-memory maps.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

/// Results key carrying the message of a fatal error.
pub const RETURN_MESSAGE_KEY: &str = "returnMessage";

/// Read access to the script's variables.
pub trait VariableStore {
    /// Get a variable.
    fn get(&self, key: &str) -> Option<String>;

    /// Get a variable, falling back to `default`.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

impl<S: BuildHasher> VariableStore for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl VariableStore for IndexMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        IndexMap::get(self, key).cloned()
    }
}

/// Terminal status of a script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    Success,
    Failure,
}

impl ScriptStatus {
    /// Status string understood by the orchestrator.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptStatus::Success => "SUCCESS",
            ScriptStatus::Failure => "FAILURE",
        }
    }
}

/// Channel reporting the script outcome to the orchestrator.
pub trait ResultsSink: Send {
    /// Publish a result value.
    fn put(&mut self, key: &str, value: &str);

    /// Set the terminal status.
    fn set_status(&mut self, status: ScriptStatus);

    /// Publish a fatal error message and mark the run failed.
    fn fail(&mut self, message: &str) {
        self.put(RETURN_MESSAGE_KEY, message);
        self.set_status(ScriptStatus::Failure);
    }
}

/// In-memory results sink.
#[derive(Debug, Default, Clone)]
pub struct MemoryResults {
    pub values: IndexMap<String, String>,
    pub status: Option<ScriptStatus>,
}

impl MemoryResults {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultsSink for MemoryResults {
    fn put(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn set_status(&mut self, status: ScriptStatus) {
        self.status = Some(status);
    }
}

/// A sink shared with the orchestrator that reads it back.
impl<R: ResultsSink> ResultsSink for Arc<Mutex<R>> {
    fn put(&mut self, key: &str, value: &str) {
        if let Ok(mut sink) = self.lock() {
            sink.put(key, value);
        }
    }

    fn set_status(&mut self, status: ScriptStatus) {
        if let Ok(mut sink) = self.lock() {
            sink.set_status(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_default() {
        let mut vars = HashMap::new();
        vars.insert("deviceIP".to_string(), "10.1.1.1".to_string());

        assert_eq!(vars.get_or("deviceIP", "0.0.0.0"), "10.1.1.1");
        assert_eq!(vars.get_or("serverIP", "0.0.0.0"), "0.0.0.0");
    }

    #[test]
    fn test_memory_results() {
        let mut results = MemoryResults::new();
        results.fail("boom");

        assert_eq!(results.values.get(RETURN_MESSAGE_KEY).map(String::as_str), Some("boom"));
        assert_eq!(results.status.map(|s| s.as_str()), Some("FAILURE"));
    }

    #[test]
    fn test_shared_results() {
        let shared = Arc::new(Mutex::new(MemoryResults::new()));
        let mut sink = shared.clone();
        sink.fail("transfer failed");

        let results = shared.lock().unwrap();
        assert_eq!(results.status, Some(ScriptStatus::Failure));
        assert_eq!(
            results.values.get(RETURN_MESSAGE_KEY).map(String::as_str),
            Some("transfer failed")
        );
    }
}
