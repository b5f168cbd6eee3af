//! Logger handed to routers and scanners
//!
//! Routers and scanners take an `Arc<dyn RouteLogger>` at construction and
//! default to [`NullLogger`]. [`TracingLogger`] forwards to `tracing`, and
//! [`MemoryLogger`] keeps entries around for assertions.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Log levels understood by [`RouteLogger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Sink for leveled routing messages
pub trait RouteLogger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    /// Lets callers skip formatting messages nobody will read
    fn is_enabled(&self, _level: LogLevel) -> bool {
        true
    }

    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl RouteLogger for NullLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}

    fn is_enabled(&self, _level: LogLevel) -> bool {
        false
    }
}

/// Forwards to the `tracing` macros under the `trellis` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RouteLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "trellis", "{}", message),
            LogLevel::Debug => tracing::debug!(target: "trellis", "{}", message),
            LogLevel::Info => tracing::info!(target: "trellis", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "trellis", "{}", message),
            LogLevel::Error => tracing::error!(target: "trellis", "{}", message),
        }
    }
}

/// A captured log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Keeps every entry in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|entry| entry.message).collect()
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.entries()
            .iter()
            .any(|entry| entry.message.contains(fragment))
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl RouteLogger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                level,
                message: message.to_string(),
            });
    }
}
