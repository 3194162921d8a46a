//! Log sinks
//!
//! The negotiator reports every outcome to a [`LogSink`] it holds as a plain
//! field. Production code uses [`TracingSink`]; tests use [`MemorySink`] to
//! assert on what was reported.

use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::config::LogLevel;

/// Tracing target for negotiation events.
pub const LOG_TARGET: &str = "langneg";

/// Leveled, structured log destination.
pub trait LogSink: Send + Sync {
    /// Record `message` with a JSON object of context fields.
    fn log(&self, level: LogLevel, message: &str, context: &Value);
}

/// Forwards records to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str, context: &Value) {
        // tracing needs the level at compile time
        match level {
            LogLevel::Trace => tracing::trace!(target: LOG_TARGET, context = %context, "{}", message),
            LogLevel::Debug => tracing::debug!(target: LOG_TARGET, context = %context, "{}", message),
            LogLevel::Info => tracing::info!(target: LOG_TARGET, context = %context, "{}", message),
            LogLevel::Warn => tracing::warn!(target: LOG_TARGET, context = %context, "{}", message),
            LogLevel::Error => tracing::error!(target: LOG_TARGET, context = %context, "{}", message),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: LogLevel, _message: &str, _context: &Value) {}
}

/// A record captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub context: Value,
}

/// Keeps records in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Records at exactly `level`.
    pub fn at_level(&self, level: LogLevel) -> Vec<LogRecord> {
        self.lock()
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogRecord>> {
        // A poisoned buffer still holds valid records
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: LogLevel, message: &str, context: &Value) {
        self.lock().push(LogRecord {
            level,
            message: message.to_string(),
            context: context.clone(),
        });
    }
}
