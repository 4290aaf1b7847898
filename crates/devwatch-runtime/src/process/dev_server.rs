//! Long-running dev server supervision.

use std::path::Path;
use std::sync::Arc;

use devwatch_core::{
    CommandSpec, EntrySource, ErrorMonitor, Issue, LogLevel, MonitorError,
    classify_dev_server_stdout, dev_server_stderr_message,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::command::spawn_piped;
use super::shutdown::{TERM_GRACE_PERIOD, shutdown_child};
use super::stream::{Pipe, spawn_stream_reader};

/// Handle to the running dev server.
///
/// The child process is owned by a background task. Dropping this handle
/// without calling [`DevServer::stop`] leaves the task running until the
/// server exits by itself.
pub struct DevServer {
    pid: Option<u32>,
    cancel_token: CancellationToken,
    task: JoinHandle<()>,
}

impl DevServer {
    /// Spawn the dev server and start classifying its output.
    ///
    /// A non-zero exit that happens on its own is recorded as an error.
    /// An exit caused by [`DevServer::stop`] is not.
    pub fn start(
        monitor: Arc<ErrorMonitor>,
        command: &CommandSpec,
        project_dir: &Path,
    ) -> Result<Self, MonitorError> {
        monitor.log(LogLevel::Info, "Starting development server...");

        let mut child = spawn_piped(command, project_dir)?;
        let pid = child.id();

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            let monitor = Arc::clone(&monitor);
            readers.push(spawn_stream_reader(stdout, Pipe::Stdout, move |line| {
                monitor.record(EntrySource::DevServer, &line, classify_dev_server_stdout(&line));
            }));
        }
        if let Some(stderr) = child.stderr.take() {
            let monitor = Arc::clone(&monitor);
            readers.push(spawn_stream_reader(stderr, Pipe::Stderr, move |line| {
                if line.trim().is_empty() {
                    return;
                }
                monitor.track_error(
                    dev_server_stderr_message(&line).into_owned(),
                    EntrySource::DevServer,
                );
            }));
        }

        let cancel_token = CancellationToken::new();
        let cancelled = cancel_token.clone();

        let task = tokio::spawn(async move {
            let exited = tokio::select! {
                status = child.wait() => Some(status),
                () = cancelled.cancelled() => None,
            };

            match exited {
                Some(status) => {
                    for reader in readers {
                        if let Err(e) = reader.await {
                            debug!(error = %e, "dev server stream reader did not finish cleanly");
                        }
                    }
                    match status {
                        Ok(status) if status.success() => {
                            debug!(?pid, "dev server exited cleanly");
                        }
                        Ok(status) => {
                            let code = status
                                .code()
                                .map_or_else(|| "none".to_string(), |code| code.to_string());
                            monitor.track_error(
                                format!("Development server exited with code {code}"),
                                EntrySource::DevServer,
                            );
                        }
                        Err(e) => monitor.track_error(Issue::from_error(&e), EntrySource::DevServer),
                    }
                }
                None => match shutdown_child(child, TERM_GRACE_PERIOD).await {
                    Ok(ended) => debug!(?pid, ?ended, "dev server stopped"),
                    Err(e) => warn!(?pid, error = %e, "failed to stop dev server"),
                },
            }
        });

        Ok(Self {
            pid,
            cancel_token,
            task,
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Whether the server process has already exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Terminate the server (if still running) and wait until it is reaped.
    pub async fn stop(self) {
        self.cancel_token.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "dev server task ended abnormally");
        }
    }
}
