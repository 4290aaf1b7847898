//! Stopping supervised children: SIGTERM first, SIGKILL if they linger.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tracing::debug;

/// How long the dev server gets to exit after SIGTERM.
pub const TERM_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// How a child ended once [`shutdown_child`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// It had already exited before any signal was sent.
    AlreadyExited(ExitStatus),
    /// It exited within the grace period after SIGTERM.
    Terminated(ExitStatus),
    /// It ignored SIGTERM and was killed.
    Killed(ExitStatus),
}

impl Termination {
    pub fn status(&self) -> ExitStatus {
        match *self {
            Self::AlreadyExited(status) | Self::Terminated(status) | Self::Killed(status) => {
                status
            }
        }
    }
}

/// Stop `child` and reap it.
///
/// On Unix the child receives SIGTERM and has `grace` to exit before it is
/// sent SIGKILL. Elsewhere it is killed straight away.
pub async fn shutdown_child(mut child: Child, grace: Duration) -> io::Result<Termination> {
    if let Some(status) = child.try_wait()? {
        return Ok(Termination::AlreadyExited(status));
    }

    #[cfg(unix)]
    {
        if let Some(ended) = terminate(&mut child, grace).await? {
            return Ok(ended);
        }
    }
    #[cfg(not(unix))]
    let _ = grace;

    child.kill().await?;
    let status = child.wait().await?;
    debug!(%status, "child killed");
    Ok(Termination::Killed(status))
}

/// Send SIGTERM and wait out the grace period. `None` means the child is
/// still running.
#[cfg(unix)]
async fn terminate(child: &mut Child, grace: Duration) -> io::Result<Option<Termination>> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return child.wait().await.map(|s| Some(Termination::AlreadyExited(s)));
    };
    let pid = Pid::from_raw(i32::try_from(pid).map_err(io::Error::other)?);

    match kill(pid, Signal::SIGTERM) {
        Ok(()) => {}
        Err(Errno::ESRCH) => {
            return child.wait().await.map(|s| Some(Termination::AlreadyExited(s)));
        }
        Err(e) => return Err(io::Error::other(e)),
    }

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(status) => status.map(|s| Some(Termination::Terminated(s))),
        Err(_) => {
            debug!(%pid, ?grace, "child ignored SIGTERM, escalating");
            Ok(None)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio::process::Command;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_sigterm_stops_cooperative_child() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let ended = shutdown_child(child, TERM_GRACE_PERIOD).await.unwrap();
        assert!(matches!(ended, Termination::Terminated(_)));
        assert!(!ended.status().success());
    }

    #[tokio::test]
    async fn test_stubborn_child_is_killed() {
        let child = Command::new("sh")
            .args(["-c", "trap '' TERM; while :; do sleep 1; done"])
            .spawn()
            .unwrap();
        // Let the shell install its trap
        sleep(Duration::from_millis(200)).await;

        let ended = shutdown_child(child, Duration::from_millis(200))
            .await
            .unwrap();
        assert!(matches!(ended, Termination::Killed(_)));
    }

    #[tokio::test]
    async fn test_exited_child_is_just_reaped() {
        let mut child = Command::new("true").spawn().unwrap();
        while child.try_wait().unwrap().is_none() {
            sleep(Duration::from_millis(10)).await;
        }

        let ended = shutdown_child(child, TERM_GRACE_PERIOD).await.unwrap();
        assert!(matches!(ended, Termination::AlreadyExited(s) if s.success()));
    }
}
