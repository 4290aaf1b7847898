//! End-to-end supervisor runs against throwaway shell scripts.

#![cfg(unix)]

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use devwatch_core::{CapturingReporter, CommandSpec, EntrySource, LogLevel, MonitorSettings};
use devwatch_runtime::{ShutdownSignal, Supervisor, SupervisorState};
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::time::{Instant, sleep};

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh", ["-c", script])
}

fn project() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("src")).expect("create src");
    dir
}

async fn wait_for(what: &str, mut check: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !check() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_file_change_triggers_relint_and_shutdown_flushes_summary() {
    let dir = project();
    let mut settings = MonitorSettings::for_project(dir.path().canonicalize().unwrap());
    settings.lint_command = sh("echo '  3:1  warning  Unexpected console statement'");
    settings.dev_command = sh("echo 'App ready at http://localhost:8080'; sleep 30");
    settings.relint_delay = Duration::from_millis(50);
    settings.summary_interval = Duration::from_secs(3600);

    let reporter = Arc::new(CapturingReporter::new());
    let mut supervisor = Supervisor::new(settings, reporter.clone()).unwrap();
    let monitor = Arc::clone(supervisor.monitor());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(async move {
        let signal = supervisor
            .run_until(async move {
                let _ = stop_rx.await;
                ShutdownSignal::Interrupt
            })
            .await;
        (signal, supervisor.state())
    });

    wait_for("initial lint warning", || monitor.summary().warnings == 1).await;
    wait_for("src watcher", || {
        reporter
            .messages(LogLevel::Info)
            .iter()
            .any(|m| m == "Watching: ./src")
    })
    .await;
    wait_for("dev server output", || {
        reporter
            .messages(LogLevel::Success)
            .iter()
            .any(|m| m.contains("App ready"))
    })
    .await;

    fs::write(dir.path().join("src/app.js"), "console.log(1);\n").unwrap();

    wait_for("change-triggered lint", || monitor.summary().warnings >= 2).await;
    assert!(
        reporter
            .messages(LogLevel::Info)
            .iter()
            .any(|m| m == "File changed: app.js")
    );

    stop_tx.send(()).unwrap();
    let (signal, state) = tokio::time::timeout(Duration::from_secs(15), run)
        .await
        .expect("supervisor should stop")
        .expect("supervisor task");

    assert_eq!(signal.unwrap(), ShutdownSignal::Interrupt);
    assert_eq!(state, SupervisorState::ShuttingDown);
    assert!(!monitor.is_monitoring());

    let summary = monitor.summary();
    assert_eq!(summary.errors, 0, "stopping the dev server is not an error");
    assert!(
        summary
            .recent_warnings
            .iter()
            .all(|w| w.source == EntrySource::Eslint)
    );

    let blocks = reporter.blocks();
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].contains("ERROR MONITORING SUMMARY"));
    assert!(blocks[0].contains("Recent Warnings:"));
}

#[tokio::test]
async fn test_crashing_dev_server_is_recorded() {
    let dir = project();
    let mut settings = MonitorSettings::for_project(dir.path());
    settings.lint_command = sh("exit 0");
    settings.dev_command = sh("echo 'listen EADDRINUSE: address already in use :::8080' >&2; exit 1");
    settings.watch_paths.clear();

    let reporter = Arc::new(CapturingReporter::new());
    let mut supervisor = Supervisor::new(settings, reporter.clone()).unwrap();
    let monitor = Arc::clone(supervisor.monitor());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(async move {
        supervisor
            .run_until(async move {
                let _ = stop_rx.await;
                ShutdownSignal::Terminate
            })
            .await
    });

    wait_for("dev server exit", || monitor.summary().errors == 2).await;
    stop_tx.send(()).unwrap();
    assert_eq!(run.await.unwrap().unwrap(), ShutdownSignal::Terminate);

    let errors: Vec<String> = monitor
        .summary()
        .recent_errors
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert!(errors[0].starts_with("Port already in use"));
    assert_eq!(errors[1], "Development server exited with code 1");
    assert!(
        reporter
            .messages(LogLevel::Success)
            .contains(&"ESLint check completed successfully".to_string())
    );
}

/// Run a supervisor with a 100 ms summary interval for a little over
/// five intervals and return what it printed.
async fn run_with_fast_summaries(lint: &str) -> Arc<CapturingReporter> {
    let dir = project();
    let mut settings = MonitorSettings::for_project(dir.path());
    settings.lint_command = sh(lint);
    settings.dev_command = sh("exit 0");
    settings.watch_paths.clear();
    settings.summary_interval = Duration::from_millis(100);

    let reporter = Arc::new(CapturingReporter::new());
    let mut supervisor = Supervisor::new(settings, reporter.clone()).unwrap();
    supervisor
        .run_until(async {
            sleep(Duration::from_millis(550)).await;
            ShutdownSignal::Interrupt
        })
        .await
        .unwrap();
    reporter
}

#[tokio::test]
async fn test_periodic_summary_is_skipped_while_history_is_empty() {
    let reporter = run_with_fast_summaries("exit 0").await;
    assert_eq!(reporter.blocks().len(), 1, "only the shutdown summary");
}

#[tokio::test]
async fn test_periodic_summary_prints_once_issues_exist() {
    let reporter = run_with_fast_summaries("echo '  1:1  warning  no-console'").await;
    let blocks = reporter.blocks();
    assert!(blocks.len() > 1, "expected periodic summaries, got {}", blocks.len());
    assert!(blocks.iter().all(|b| b.contains("Total Warnings: 1")));
}
