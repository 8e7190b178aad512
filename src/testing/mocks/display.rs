//! Display capturing notices for assertions

use crate::interaction::ProgressDisplay;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct RecordingDisplay {
    messages: Arc<Mutex<Vec<String>>>,
    tables: Arc<Mutex<Vec<Vec<(String, String)>>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages prefixed with `INFO:`, `WARN:`, `ERROR:` or `SUCCESS:`
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn tables(&self) -> Vec<Vec<(String, String)>> {
        self.tables.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }

    fn push(&self, level: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("{level}: {message}"));
    }
}

impl ProgressDisplay for RecordingDisplay {
    fn info(&self, message: &str) {
        self.push("INFO", message);
    }

    fn warning(&self, message: &str) {
        self.push("WARN", message);
    }

    fn error(&self, message: &str) {
        self.push("ERROR", message);
    }

    fn success(&self, message: &str) {
        self.push("SUCCESS", message);
    }

    fn table(&self, rows: &[(&str, String)]) {
        self.tables.lock().unwrap().push(
            rows.iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        );
    }
}
