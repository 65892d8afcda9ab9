use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

/// Bounded, shared log of pipeline and API activity. Every entry is also
/// emitted as a tracing event.
#[derive(Clone)]
pub struct ActivityLog {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    max_entries: usize,
}

impl ActivityLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(max_entries.min(1024)))),
            max_entries: max_entries.max(1),
        }
    }

    pub fn info(&self, source: &str, message: &str) {
        tracing::info!(source, "{}", message);
        self.push("INFO", source, message);
    }

    pub fn warn(&self, source: &str, message: &str) {
        tracing::warn!(source, "{}", message);
        self.push("WARN", source, message);
    }

    pub fn error(&self, source: &str, message: &str) {
        tracing::error!(source, "{}", message);
        self.push("ERROR", source, message);
    }

    /// Oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn entries_by_level(&self, level: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level.eq_ignore_ascii_case(level))
            .collect()
    }

    fn push(&self, level: &str, source: &str, message: &str) {
        let entry = LogEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            level: level.to_string(),
            source: source.to_string(),
            message: message.to_string(),
        };
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push_back(entry);
        while entries.len() > self.max_entries {
            entries.pop_front();
        }
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_oldest_when_full() {
        let log = ActivityLog::new(2);
        log.info("Test", "one");
        log.warn("Test", "two");
        log.error("Test", "three");

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "two");
        assert_eq!(entries[1].message, "three");
    }

    #[test]
    fn test_filter_by_level() {
        let log = ActivityLog::new(10);
        log.info("Ingest", "loaded");
        log.warn("Ingest", "skipped row");
        assert_eq!(log.entries_by_level("warn").len(), 1);
        assert_eq!(log.entries_by_level("INFO")[0].source, "Ingest");
    }

    #[test]
    fn test_clones_share_entries() {
        let log = ActivityLog::new(10);
        let handle = log.clone();
        handle.info("Webhook", "received");
        assert_eq!(log.entries().len(), 1);
    }
}
