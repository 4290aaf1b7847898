//! File watching for change-triggered lint runs.
//!
//! Each configured path is registered separately so one missing path does
//! not stop the others from being watched. Raw change events are forwarded
//! to the supervisor; filtering by extension happens there.

use std::path::PathBuf;

use devwatch_core::{ErrorMonitor, LogLevel, MonitorError, MonitorSettings};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

/// A filesystem path reported as changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
}

/// Keeps the underlying watcher alive. Watching stops when this is dropped.
pub struct FileWatcher {
    watcher: Option<RecommendedWatcher>,
    watched: Vec<PathBuf>,
}

impl FileWatcher {
    /// Register every watch target from `settings`.
    ///
    /// Failures are logged as warnings on the monitor and skipped.
    pub fn start(
        monitor: &ErrorMonitor,
        settings: &MonitorSettings,
        tx: UnboundedSender<FileChange>,
    ) -> Self {
        monitor.log(LogLevel::Info, "Setting up file watchers...");

        let targets = settings.watch_targets();
        let mut watcher = match notify::recommended_watcher(move |res: notify::Result<Event>| {
            forward_event(res, &tx);
        }) {
            Ok(watcher) => watcher,
            Err(e) => {
                for (target, _) in targets {
                    let err = MonitorError::WatchFailed {
                        target,
                        reason: e.to_string(),
                    };
                    monitor.log(LogLevel::Warn, err.to_string());
                }
                return Self {
                    watcher: None,
                    watched: Vec::new(),
                };
            }
        };

        let mut watched = Vec::new();
        for (label, path) in targets {
            match watcher.watch(&path, RecursiveMode::Recursive) {
                Ok(()) => {
                    monitor.log(LogLevel::Info, format!("Watching: {label}"));
                    watched.push(path);
                }
                Err(e) => {
                    let err = MonitorError::WatchFailed {
                        target: label,
                        reason: e.to_string(),
                    };
                    monitor.log(LogLevel::Warn, err.to_string());
                }
            }
        }

        Self {
            watcher: Some(watcher),
            watched,
        }
    }

    /// Paths that were registered successfully.
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }

    pub fn is_active(&self) -> bool {
        self.watcher.is_some() && !self.watched.is_empty()
    }
}

fn forward_event(res: notify::Result<Event>, tx: &UnboundedSender<FileChange>) {
    match res {
        Ok(event) => {
            if matches!(event.kind, EventKind::Access(_)) {
                return;
            }
            for path in event.paths {
                if tx.send(FileChange { path }).is_err() {
                    debug!("file change receiver closed");
                    return;
                }
            }
        }
        Err(e) => error!("watch error: {:?}", e),
    }
}
