//! The supervisor: one dispatcher loop owning every moving part.
//!
//! Stream readers, the file watcher and delayed lint runs feed the loop
//! through channels; the loop owns the dev server handle, the in-flight lint
//! runs, the summary ticker and the shutdown future. Shared history lives in
//! the [`ErrorMonitor`], which every handler receives explicitly.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use devwatch_core::{
    EntrySource, ErrorMonitor, Issue, LogLevel, MonitorError, MonitorSettings, ReporterPort,
    validate_settings,
};
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::process::{DevServer, LintOutcome, run_lint_check};
use crate::relint::RelintScheduler;
use crate::signal::{ShutdownListener, ShutdownSignal};
use crate::watcher::{FileChange, FileWatcher};

/// Lifecycle of a supervisor. There is no way back from `ShuttingDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Monitoring,
    ShuttingDown,
}

pub struct Supervisor {
    settings: MonitorSettings,
    monitor: Arc<ErrorMonitor>,
    state: SupervisorState,
}

impl Supervisor {
    /// Validate `settings` and create an idle supervisor.
    pub fn new(
        settings: MonitorSettings,
        reporter: Arc<dyn ReporterPort>,
    ) -> Result<Self, MonitorError> {
        validate_settings(&settings)?;
        let monitor = Arc::new(ErrorMonitor::with_limits(
            reporter,
            settings.history_capacity,
            settings.summary_recent,
        ));
        Ok(Self {
            settings,
            monitor,
            state: SupervisorState::Idle,
        })
    }

    pub fn monitor(&self) -> &Arc<ErrorMonitor> {
        &self.monitor
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Monitor until SIGINT or SIGTERM.
    ///
    /// Signal handlers are installed before anything is spawned.
    pub async fn run(&mut self) -> Result<ShutdownSignal, MonitorError> {
        self.ensure_idle()?;
        let mut listener = ShutdownListener::install()?;
        self.run_until(async move { listener.recv().await }).await
    }

    /// Monitor until `shutdown` resolves, then flush the summary and stop
    /// the dev server.
    ///
    /// A supervisor runs once. Calling this after it has started fails with
    /// [`MonitorError::AlreadyStarted`] and spawns nothing.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<ShutdownSignal, MonitorError>
    where
        F: Future<Output = ShutdownSignal>,
    {
        self.ensure_idle()?;

        self.monitor
            .log(LogLevel::Info, "Starting comprehensive error monitoring...");
        self.monitor.set_monitoring(true);
        self.state = SupervisorState::Monitoring;
        info!(project_dir = %self.settings.project_dir.display(), "monitoring started");

        let (relint_tx, mut relint_rx) = unbounded_channel();
        let (change_tx, mut change_rx) = unbounded_channel();
        let scheduler = RelintScheduler::new(self.settings.relint_delay, relint_tx);
        let mut lint_runs: JoinSet<LintOutcome> = JoinSet::new();

        self.spawn_lint(&mut lint_runs);
        let dev_server = self.start_dev_server();
        let watcher = FileWatcher::start(&self.monitor, &self.settings, change_tx);
        debug!(watched = watcher.watched().len(), "file watchers registered");

        let period = self.settings.summary_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);

        let signal = loop {
            tokio::select! {
                signal = &mut shutdown => break signal,
                Some(change) = change_rx.recv() => {
                    handle_file_change(&self.monitor, &self.settings, &scheduler, &change);
                }
                Some(request) = relint_rx.recv() => {
                    debug!(sequence = request.sequence, "relint due");
                    self.spawn_lint(&mut lint_runs);
                }
                Some(joined) = lint_runs.join_next(), if !lint_runs.is_empty() => {
                    match joined {
                        Ok(outcome) => debug!(?outcome, "lint run finished"),
                        Err(e) => warn!(error = %e, "lint run task failed"),
                    }
                }
                _ = ticker.tick() => {
                    if self.monitor.has_issues() {
                        self.monitor.print_summary();
                    }
                }
            }
        };

        self.state = SupervisorState::ShuttingDown;
        self.monitor.set_monitoring(false);
        info!(%signal, "shutdown requested");

        self.monitor
            .log(LogLevel::Info, "Shutting down error monitor...");
        self.monitor.print_summary();

        scheduler.cancel_all();
        lint_runs.abort_all();
        while lint_runs.join_next().await.is_some() {}
        drop(watcher);

        if let Some(server) = dev_server {
            server.stop().await;
        }

        Ok(signal)
    }

    fn ensure_idle(&self) -> Result<(), MonitorError> {
        if self.state == SupervisorState::Idle {
            Ok(())
        } else {
            warn!(state = ?self.state, "supervisor already started");
            Err(MonitorError::AlreadyStarted)
        }
    }

    fn spawn_lint(&self, runs: &mut JoinSet<LintOutcome>) {
        let monitor = Arc::clone(&self.monitor);
        let command = self.settings.lint_command.clone();
        let project_dir = self.settings.project_dir.clone();
        runs.spawn(async move { run_lint_check(&monitor, &command, &project_dir).await });
    }

    fn start_dev_server(&self) -> Option<DevServer> {
        match DevServer::start(
            Arc::clone(&self.monitor),
            &self.settings.dev_command,
            &self.settings.project_dir,
        ) {
            Ok(server) => Some(server),
            Err(e) => {
                self.monitor
                    .track_error(Issue::from_error(&e), EntrySource::DevServer);
                None
            }
        }
    }
}

/// React to one changed path: log it and schedule a lint run if its
/// extension is watched. Returns whether a run was scheduled.
pub fn handle_file_change(
    monitor: &ErrorMonitor,
    settings: &MonitorSettings,
    scheduler: &RelintScheduler,
    change: &FileChange,
) -> bool {
    if !settings.is_watched_file(&change.path) {
        return false;
    }

    let shown = changed_name(settings, &change.path);
    monitor.log(LogLevel::Info, format!("File changed: {}", shown.display()));
    let sequence = scheduler.schedule();
    debug!(sequence, path = %change.path.display(), "relint scheduled");
    true
}

/// Name of `path` relative to the watch target it falls under. A watched
/// file reports its own file name.
fn changed_name<'a>(settings: &MonitorSettings, path: &'a Path) -> &'a Path {
    let relative = settings
        .watch_targets()
        .into_iter()
        .find_map(|(_, target)| path.strip_prefix(&target).ok());

    match relative {
        Some(rest) if !rest.as_os_str().is_empty() => rest,
        _ => path.file_name().map_or(path, Path::new),
    }
}
