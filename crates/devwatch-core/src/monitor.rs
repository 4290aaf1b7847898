//! The error monitor: bounded histories plus classified console output.
//!
//! One `ErrorMonitor` is shared (via `Arc`) by every handler the supervisor
//! runs. Each track call takes the history lock once, so an append and its
//! eviction are never observed halfway.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::classify::Classification;
use crate::domain::{EntrySource, Issue, LogEntry, LogLevel};
use crate::history::{DEFAULT_HISTORY_CAPACITY, IssueHistory};
use crate::ports::ReporterPort;
use crate::summary::{SUMMARY_RECENT_COUNT, Summary};

pub struct ErrorMonitor {
    history: Mutex<IssueHistory>,
    reporter: Arc<dyn ReporterPort>,
    monitoring: AtomicBool,
    summary_recent: usize,
}

impl ErrorMonitor {
    /// Create a monitor with default capacity and summary size.
    pub fn new(reporter: Arc<dyn ReporterPort>) -> Self {
        Self::with_limits(reporter, DEFAULT_HISTORY_CAPACITY, SUMMARY_RECENT_COUNT)
    }

    pub fn with_limits(
        reporter: Arc<dyn ReporterPort>,
        history_capacity: usize,
        summary_recent: usize,
    ) -> Self {
        Self {
            history: Mutex::new(IssueHistory::with_capacity(history_capacity)),
            reporter,
            monitoring: AtomicBool::new(false),
            summary_recent,
        }
    }

    fn history(&self) -> MutexGuard<'_, IssueHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emit a classified console line without tracking anything.
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.reporter.line(level, message.as_ref());
    }

    /// Record an error and print it.
    pub fn track_error(&self, error: impl Into<Issue>, source: EntrySource) {
        let entry = LogEntry::error(error.into(), source);
        let line = format!("ERROR in {}: {}", entry.source, entry.message);
        if let Some(evicted) = self.history().errors.push(entry) {
            debug!(id = evicted.id, "evicted oldest error entry");
        }
        self.log(LogLevel::Error, line);
    }

    /// Record a warning and print it.
    pub fn track_warning(&self, warning: impl Into<Issue>, source: EntrySource) {
        let entry = LogEntry::warning(warning.into(), source);
        let line = format!("WARNING in {}: {}", entry.source, entry.message);
        if let Some(evicted) = self.history().warnings.push(entry) {
            debug!(id = evicted.id, "evicted oldest warning entry");
        }
        self.log(LogLevel::Warn, line);
    }

    /// Act on a classified chunk of output from `origin`.
    ///
    /// Tracked chunks are stored verbatim; printed-only chunks are trimmed
    /// and prefixed with the origin label.
    pub fn record(&self, origin: EntrySource, chunk: &str, classification: Classification) {
        match classification {
            Classification::Error(source) => self.track_error(chunk, source),
            Classification::Warning(source) => self.track_warning(chunk, source),
            Classification::Success => {
                self.log(LogLevel::Success, format!("{origin}: {}", chunk.trim()));
            }
            Classification::Info => {
                self.log(LogLevel::Info, format!("{origin}: {}", chunk.trim()));
            }
            Classification::Blank => {}
        }
    }

    /// Totals and most recent entries.
    pub fn summary(&self) -> Summary {
        Summary::from_history(&self.history(), self.summary_recent)
    }

    /// Print the bordered summary block.
    pub fn print_summary(&self) {
        let summary = self.summary();
        self.reporter.block(&summary.render());
    }

    /// Whether at least one error or warning has been tracked.
    pub fn has_issues(&self) -> bool {
        !self.history().is_empty()
    }

    pub fn set_monitoring(&self, active: bool) {
        self.monitoring.store(active, Ordering::SeqCst);
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }
}
