//! Pipeline log sink.
//!
//! Every step of a run reports through the `log_*` helpers. Entries are
//! printed to stderr and kept in a bounded history that ends up in the
//! run report.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::MAX_LOG_ENTRIES;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting level for sub-steps
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// Global log sink
pub static LOG_SINK: Lazy<LogSink> = Lazy::new(LogSink::new);

/// Prints log entries and remembers the most recent ones.
pub struct LogSink {
    history: Mutex<VecDeque<LogEntry>>,
    quiet: AtomicBool,
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES)),
            quiet: AtomicBool::new(false),
        }
    }

    pub fn log(&self, entry: LogEntry) {
        if self.prints(entry.level) {
            let prefix = match entry.level {
                LogLevel::Info => "   ",
                LogLevel::Success => "   ✓",
                LogLevel::Warning => "   ⚠️",
                LogLevel::Error => "   ❌",
            };
            let indent = "   ".repeat(entry.indent as usize);
            eprintln!("{}{} {}", indent, prefix, entry.message);
        }

        // A poisoned lock only loses history
        if let Ok(mut history) = self.history.lock() {
            if history.len() >= MAX_LOG_ENTRIES {
                history.pop_front();
            }
            history.push_back(entry);
        }
    }

    /// Errors print even in quiet mode.
    fn prints(&self, level: LogLevel) -> bool {
        level == LogLevel::Error || !self.quiet.load(Ordering::Relaxed)
    }

    /// Stop printing everything but errors; entries are still recorded.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    /// Take the recorded entries, leaving the history empty.
    pub fn drain(&self) -> Vec<LogEntry> {
        self.history
            .lock()
            .map(|mut history| Vec::from(std::mem::take(&mut *history)))
            .unwrap_or_default()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOG_SINK.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let sink = LogSink::new();
        sink.set_quiet(true);
        for i in 0..MAX_LOG_ENTRIES + 5 {
            sink.log(LogEntry::info(format!("entry {}", i)));
        }

        let history = sink.drain();
        assert_eq!(history.len(), MAX_LOG_ENTRIES);
        assert_eq!(history[0].message, "entry 5");
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn test_quiet_keeps_errors() {
        let sink = LogSink::new();
        sink.set_quiet(true);
        assert!(!sink.prints(LogLevel::Info));
        assert!(!sink.prints(LogLevel::Warning));
        assert!(sink.prints(LogLevel::Error));

        sink.log(LogEntry::error("Input missing"));
        let history = sink.drain();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].level, LogLevel::Error);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = LogEntry::warning("2 rows collide").with_indent(1);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["indent"], 1);
    }
}
