//! One-shot lint runs.

use std::path::Path;
use std::sync::Arc;

use devwatch_core::{
    CommandSpec, EntrySource, ErrorMonitor, Issue, LogLevel, classify_lint_stdout,
};
use tracing::debug;

use super::command::spawn_piped;
use super::stream::{Pipe, spawn_stream_reader};

/// How a lint run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintOutcome {
    Passed,
    /// Non-zero exit; `None` when the process was ended by a signal.
    Failed(Option<i32>),
    SpawnFailed,
}

/// Run the lint command once, classifying its output as it arrives.
///
/// Stdout is classified line by line; any non-blank stderr line is an error.
/// The exit is reported only after both streams have been drained.
/// Failures are recorded on the monitor, never returned.
pub async fn run_lint_check(
    monitor: &Arc<ErrorMonitor>,
    command: &CommandSpec,
    project_dir: &Path,
) -> LintOutcome {
    monitor.log(LogLevel::Info, "Running ESLint check...");

    let mut child = match spawn_piped(command, project_dir) {
        Ok(child) => child,
        Err(e) => {
            monitor.track_error(Issue::from_error(&e), EntrySource::Eslint);
            return LintOutcome::SpawnFailed;
        }
    };

    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        let monitor = Arc::clone(monitor);
        readers.push(spawn_stream_reader(stdout, Pipe::Stdout, move |line| {
            monitor.record(EntrySource::Eslint, &line, classify_lint_stdout(&line));
        }));
    }
    if let Some(stderr) = child.stderr.take() {
        let monitor = Arc::clone(monitor);
        readers.push(spawn_stream_reader(stderr, Pipe::Stderr, move |line| {
            if !line.trim().is_empty() {
                monitor.track_error(line, EntrySource::Eslint);
            }
        }));
    }

    let status = child.wait().await;
    for reader in readers {
        if let Err(e) = reader.await {
            debug!(error = %e, "lint stream reader did not finish cleanly");
        }
    }

    match status {
        Ok(status) if status.success() => {
            monitor.log(LogLevel::Success, "ESLint check completed successfully");
            LintOutcome::Passed
        }
        Ok(status) => {
            let code = status
                .code()
                .map_or_else(|| "none".to_string(), |code| code.to_string());
            monitor.track_error(
                format!("ESLint check failed with exit code {code}"),
                EntrySource::Eslint,
            );
            LintOutcome::Failed(status.code())
        }
        Err(e) => {
            monitor.track_error(Issue::from_error(&e), EntrySource::Eslint);
            LintOutcome::Failed(None)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use devwatch_core::CapturingReporter;

    fn monitor() -> (Arc<CapturingReporter>, Arc<ErrorMonitor>) {
        let reporter = Arc::new(CapturingReporter::new());
        let monitor = Arc::new(ErrorMonitor::new(reporter.clone()));
        (reporter, monitor)
    }

    fn script(body: &str) -> CommandSpec {
        CommandSpec::new("sh", ["-c", body])
    }

    #[tokio::test]
    async fn test_clean_exit_logs_one_success_and_tracks_nothing() {
        let (reporter, monitor) = monitor();
        let outcome = run_lint_check(&monitor, &script("exit 0"), Path::new(".")).await;

        assert_eq!(outcome, LintOutcome::Passed);
        assert_eq!(
            reporter.messages(LogLevel::Success),
            ["ESLint check completed successfully"]
        );
        assert_eq!(monitor.summary().errors, 0);
        assert_eq!(monitor.summary().warnings, 0);
    }

    #[tokio::test]
    async fn test_exit_code_two_tracks_one_error() {
        let (reporter, monitor) = monitor();
        let outcome = run_lint_check(&monitor, &script("exit 2"), Path::new(".")).await;

        assert_eq!(outcome, LintOutcome::Failed(Some(2)));
        let summary = monitor.summary();
        assert_eq!(summary.errors, 1);
        assert!(summary.recent_errors[0].message.contains('2'));
        assert!(reporter.messages(LogLevel::Success).is_empty());
    }

    #[tokio::test]
    async fn test_output_is_classified_before_exit_is_reported() {
        let (reporter, monitor) = monitor();
        let body = "echo '> eslint .'; echo '  3:1  warning  no-console'; \
                    echo '  9:5  error  no-undef'; echo 'oops' >&2; exit 1";
        run_lint_check(&monitor, &script(body), Path::new(".")).await;

        let summary = monitor.summary();
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.errors, 3);
        assert_eq!(
            summary.recent_errors.last().map(|e| e.message.as_str()),
            Some("ESLint check failed with exit code 1")
        );
        assert_eq!(reporter.messages(LogLevel::Info)[1], "ESLint: > eslint .");
    }

    #[tokio::test]
    async fn test_spawn_failure_is_tracked() {
        let (_reporter, monitor) = monitor();
        let command = CommandSpec::new("devwatch-missing-linter", Vec::<String>::new());
        let outcome = run_lint_check(&monitor, &command, Path::new(".")).await;

        assert_eq!(outcome, LintOutcome::SpawnFailed);
        let summary = monitor.summary();
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.recent_errors[0].source, EntrySource::Eslint);
        assert!(summary.recent_errors[0].stack.is_some());
    }
}
