//! Termination signal handling.

use std::fmt;

use devwatch_core::MonitorError;

/// The signal that ended monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => write!(f, "SIGINT"),
            Self::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Listens for SIGINT and SIGTERM.
///
/// Handlers are installed on construction, so signals that arrive before
/// [`recv`](Self::recv) is awaited are not lost.
pub struct ShutdownListener {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownListener {
    #[cfg(unix)]
    pub fn install() -> Result<Self, MonitorError> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt()).map_err(MonitorError::Signal)?,
            terminate: signal(SignalKind::terminate()).map_err(MonitorError::Signal)?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> Result<Self, MonitorError> {
        Ok(Self {})
    }

    /// Wait for the first termination signal.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> ShutdownSignal {
        tokio::select! {
            _ = self.interrupt.recv() => ShutdownSignal::Interrupt,
            _ = self.terminate.recv() => ShutdownSignal::Terminate,
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> ShutdownSignal {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c listener failed, shutting down");
        }
        ShutdownSignal::Interrupt
    }
}
