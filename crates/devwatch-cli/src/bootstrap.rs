//! CLI bootstrap: the composition root.
//!
//! Turns parsed arguments into validated settings, installs the tracing
//! subscriber and wires the console reporter into a [`Supervisor`].

use std::sync::Arc;
use std::time::Duration;

use devwatch_core::{CommandSpec, MonitorSettings, validate_settings};
use devwatch_runtime::{ConsoleReporter, ShutdownSignal, Supervisor};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::parser::Cli;

/// Build monitor settings from command-line arguments.
///
/// The project directory is resolved to an absolute path so changed files
/// can be shown relative to it.
pub fn settings_from_cli(cli: &Cli) -> Result<MonitorSettings, CliError> {
    let project_dir = cli.project_dir.canonicalize().map_err(|e| {
        CliError::Config(format!(
            "project directory {}: {e}",
            cli.project_dir.display()
        ))
    })?;
    if !project_dir.is_dir() {
        return Err(CliError::Config(format!(
            "project directory {} is not a directory",
            project_dir.display()
        )));
    }

    let mut settings = MonitorSettings::for_project(project_dir);
    settings.lint_command = CommandSpec::npm_script(&cli.lint_script);
    settings.dev_command = CommandSpec::npm_script(&cli.dev_script);
    settings.relint_delay = Duration::from_millis(cli.relint_delay_ms);
    settings.summary_interval = Duration::from_secs(cli.summary_interval_secs);

    validate_settings(&settings).map_err(|e| CliError::Config(e.to_string()))?;
    Ok(settings)
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` is honored unless `verbose` forces `debug`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the supervisor until SIGINT or SIGTERM.
pub async fn run(cli: &Cli) -> Result<ShutdownSignal, CliError> {
    let settings = settings_from_cli(cli)?;
    let mut supervisor = Supervisor::new(settings, Arc::new(ConsoleReporter::new()))?;
    Ok(supervisor.run().await?)
}
