//! Command builder for supervised child processes.

use std::path::Path;
use std::process::Stdio;

use devwatch_core::{CommandSpec, MonitorError};
use tokio::process::{Child, Command};
use tracing::debug;

/// Spawn `spec` in `project_dir` with stdout/stderr piped.
///
/// The child is killed if its handle is dropped, so an aborted task never
/// leaves a process behind.
pub fn spawn_piped(spec: &CommandSpec, project_dir: &Path) -> Result<Child, MonitorError> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(project_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| MonitorError::SpawnFailed {
        command: spec.to_string(),
        source,
    })?;

    debug!(command = %spec, pid = ?child.id(), "spawned child process");
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let spec = CommandSpec::new("devwatch-definitely-missing-binary", ["run", "lint"]);
        let err = spawn_piped(&spec, Path::new(".")).unwrap_err();
        assert!(matches!(err, MonitorError::SpawnFailed { .. }));
        assert!(
            err.to_string()
                .contains("devwatch-definitely-missing-binary run lint")
        );
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_spawned_child_has_piped_streams() {
        let spec = CommandSpec::new("sh", ["-c", "exit 0"]);
        let mut child = spawn_piped(&spec, Path::new(".")).unwrap();
        assert!(child.stdout.is_some());
        assert!(child.stderr.is_some());
        assert!(child.wait().await.unwrap().success());
    }
}
