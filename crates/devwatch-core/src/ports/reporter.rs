//! Reporter port for console output.
//!
//! This port abstracts where classified lines and summary blocks end up,
//! allowing a colored terminal implementation for the CLI and capturing
//! implementations for tests.

use std::sync::{Mutex, PoisonError};

use crate::domain::LogLevel;

/// Port for emitting monitor output.
///
/// Implementations must be thread-safe; lines arrive from many tasks.
pub trait ReporterPort: Send + Sync {
    /// Emit one classified line.
    fn line(&self, level: LogLevel, message: &str);

    /// Emit a preformatted multi-line block (the summary).
    fn block(&self, text: &str);
}

/// A reporter that discards everything.
#[derive(Debug, Clone, Default)]
pub struct NoopReporter;

impl ReporterPort for NoopReporter {
    fn line(&self, _level: LogLevel, _message: &str) {}

    fn block(&self, _text: &str) {}
}

/// A reporter that keeps everything in memory.
#[derive(Debug, Default)]
pub struct CapturingReporter {
    lines: Mutex<Vec<(LogLevel, String)>>,
    blocks: Mutex<Vec<String>>,
}

impl CapturingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines emitted so far.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages emitted at the given level.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    /// All blocks emitted so far.
    pub fn blocks(&self) -> Vec<String> {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReporterPort for CapturingReporter {
    fn line(&self, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }

    fn block(&self, text: &str) {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}
