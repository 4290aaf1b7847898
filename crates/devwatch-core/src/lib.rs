//! Core domain for devwatch.
//!
//! Holds everything that does not touch processes, the filesystem or the
//! terminal: log entries and their bounded history, the substring rules that
//! classify tool output, summary rendering, settings, and the ports that the
//! runtime implements.

#![deny(unused_crate_dependencies)]

pub mod classify;
pub mod domain;
pub mod history;
pub mod monitor;
pub mod ports;
pub mod settings;
pub mod summary;

// Re-export commonly used types for convenience
pub use classify::{
    Classification, PORT_IN_USE_MESSAGE, classify_dev_server_stdout, classify_lint_stdout,
    dev_server_stderr_message,
};
pub use domain::{EntryKind, EntrySource, Issue, LogEntry, LogLevel};
pub use history::{BoundedHistory, DEFAULT_HISTORY_CAPACITY, IssueHistory};
pub use monitor::ErrorMonitor;
pub use ports::{CapturingReporter, MonitorError, NoopReporter, ReporterPort};
pub use settings::{
    CommandSpec, DEFAULT_RELINT_DELAY_MS, DEFAULT_SUMMARY_INTERVAL_SECS, DEFAULT_WATCH_EXTENSIONS,
    DEFAULT_WATCH_PATHS, MonitorSettings, SettingsError, validate_settings,
};
pub use summary::{MESSAGE_PREVIEW_CHARS, SUMMARY_RECENT_COUNT, Summary};
