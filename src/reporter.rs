//! Error reporting sinks
//!
//! Components that need to surface failures take an `Arc<dyn ErrorSink>`
//! instead of writing to a shared global log.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

/// Receives `(message, context)` pairs for display or logging
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str, context: &str);
}

/// Sink that forwards every report to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, message: &str, context: &str) {
        tracing::error!(context = %context, "{}", message);
    }
}

/// One reported error
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub at: SystemTime,
    pub message: String,
    pub context: String,
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\nContext: {}", self.message, self.context)
    }
}

/// In-memory error log backing a visible log window
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Mutex<Vec<ErrorReport>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all reports, oldest first
    pub fn entries(&self) -> Vec<ErrorReport> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ErrorReport>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ErrorSink for ErrorLog {
    fn report(&self, message: &str, context: &str) {
        self.lock().push(ErrorReport {
            at: SystemTime::now(),
            message: message.to_string(),
            context: context.to_string(),
        });
    }
}
