//! Port definitions (trait abstractions) for external systems.
//!
//! The core never writes to the terminal directly; it talks to a
//! [`ReporterPort`]. Errors raised by adapters are expressed as
//! [`MonitorError`] so the CLI can map them to exit codes.

pub mod reporter;

use thiserror::Error;

pub use reporter::{CapturingReporter, NoopReporter, ReporterPort};

/// Errors raised while setting up or running the supervisor.
///
/// Only [`MonitorError::Settings`], [`MonitorError::AlreadyStarted`] and
/// [`MonitorError::Signal`] ever reach the caller of the supervisor; the
/// rest are recorded as tracked errors or warnings and monitoring continues.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A child process could not be started.
    #[error("Failed to spawn `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A path could not be registered with the file watcher.
    #[error("Failed to watch {target}: {reason}")]
    WatchFailed { target: String, reason: String },

    /// The supervisor was asked to run again after it had already started.
    #[error("Supervisor has already been started")]
    AlreadyStarted,

    /// Signal handlers could not be installed.
    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),
}
