//! Monitor settings and validation.
//!
//! These are pure domain types with no infrastructure dependencies. The CLI
//! builds them from flags; everything defaults to the values a front-end
//! project run through npm expects.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::summary::SUMMARY_RECENT_COUNT;

/// Delay before a change-triggered lint run starts.
pub const DEFAULT_RELINT_DELAY_MS: u64 = 1000;

/// How often the summary is printed while issues exist.
pub const DEFAULT_SUMMARY_INTERVAL_SECS: u64 = 30;

/// Paths watched for changes, relative to the project directory.
pub const DEFAULT_WATCH_PATHS: [&str; 5] = [
    "./src",
    "./src-pwa",
    "./src-capacitor",
    "./quasar.config.js",
    "./package.json",
];

/// File name suffixes that trigger a lint run.
pub const DEFAULT_WATCH_EXTENSIONS: [&str; 3] = [".vue", ".js", ".ts"];

/// A program plus arguments, run from the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `npm run <script>`.
    pub fn npm_script(script: &str) -> Self {
        let program = if cfg!(windows) { "npm.cmd" } else { "npm" };
        Self::new(program, ["run", script])
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Everything the supervisor needs to know.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Working directory for child processes and base for watch paths.
    pub project_dir: PathBuf,
    pub lint_command: CommandSpec,
    pub dev_command: CommandSpec,
    pub watch_paths: Vec<String>,
    pub watch_extensions: Vec<String>,
    pub relint_delay: Duration,
    pub summary_interval: Duration,
    pub history_capacity: usize,
    pub summary_recent: usize,
}

impl MonitorSettings {
    /// Defaults rooted at the current directory.
    pub fn with_defaults() -> Self {
        Self::for_project(".")
    }

    /// Defaults rooted at `project_dir`.
    pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            lint_command: CommandSpec::npm_script("lint"),
            dev_command: CommandSpec::npm_script("dev"),
            watch_paths: DEFAULT_WATCH_PATHS.iter().map(ToString::to_string).collect(),
            watch_extensions: DEFAULT_WATCH_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            relint_delay: Duration::from_millis(DEFAULT_RELINT_DELAY_MS),
            summary_interval: Duration::from_secs(DEFAULT_SUMMARY_INTERVAL_SECS),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            summary_recent: SUMMARY_RECENT_COUNT,
        }
    }

    /// Watch paths paired with their location under the project directory.
    pub fn watch_targets(&self) -> Vec<(String, PathBuf)> {
        self.watch_paths
            .iter()
            .map(|label| (label.clone(), self.project_dir.join(label)))
            .collect()
    }

    /// Whether a changed file should trigger a lint run.
    pub fn is_watched_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                self.watch_extensions
                    .iter()
                    .any(|ext| name.ends_with(ext.as_str()))
            })
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{0} command cannot be empty")]
    EmptyCommand(&'static str),

    #[error("At least one watched file extension is required")]
    NoWatchExtensions,

    #[error("History capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error("Summary cannot show {recent} recent entries with a history capacity of {capacity}")]
    RecentExceedsCapacity { recent: usize, capacity: usize },

    #[error("Summary interval must be greater than zero")]
    ZeroSummaryInterval,
}

/// Validate settings values.
pub fn validate_settings(settings: &MonitorSettings) -> Result<(), SettingsError> {
    if settings.lint_command.program.trim().is_empty() {
        return Err(SettingsError::EmptyCommand("Lint"));
    }

    if settings.dev_command.program.trim().is_empty() {
        return Err(SettingsError::EmptyCommand("Dev server"));
    }

    if settings.watch_extensions.is_empty() {
        return Err(SettingsError::NoWatchExtensions);
    }

    if settings.history_capacity == 0 {
        return Err(SettingsError::ZeroHistoryCapacity);
    }

    if settings.summary_recent > settings.history_capacity {
        return Err(SettingsError::RecentExceedsCapacity {
            recent: settings.summary_recent,
            capacity: settings.history_capacity,
        });
    }

    if settings.summary_interval.is_zero() {
        return Err(SettingsError::ZeroSummaryInterval);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = MonitorSettings::with_defaults();
        assert_eq!(settings.lint_command.args, ["run", "lint"]);
        assert_eq!(settings.dev_command.args, ["run", "dev"]);
        assert_eq!(settings.watch_paths.len(), 5);
        assert_eq!(settings.relint_delay, Duration::from_millis(1000));
        assert_eq!(settings.summary_interval, Duration::from_secs(30));
        assert_eq!(settings.history_capacity, 50);
        assert_eq!(settings.summary_recent, 5);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_command_display() {
        let cmd = CommandSpec::new("npm", ["run", "lint"]);
        assert_eq!(cmd.to_string(), "npm run lint");
    }

    #[test]
    fn test_watched_extensions() {
        let settings = MonitorSettings::with_defaults();
        assert!(settings.is_watched_file(Path::new("src/App.vue")));
        assert!(settings.is_watched_file(Path::new("src/boot/app.js")));
        assert!(settings.is_watched_file(Path::new("src/router/routes.ts")));
        assert!(!settings.is_watched_file(Path::new("src/css/app.scss")));
        assert!(!settings.is_watched_file(Path::new("README.md")));
    }

    #[test]
    fn test_watch_targets_are_rooted_at_project() {
        let settings = MonitorSettings::for_project("/work/app");
        let targets = settings.watch_targets();
        assert_eq!(targets[0].0, "./src");
        assert_eq!(targets[0].1, Path::new("/work/app").join("./src"));
    }

    #[test]
    fn test_validate_rejects_empty_command() {
        let mut settings = MonitorSettings::with_defaults();
        settings.lint_command = CommandSpec::new("  ", Vec::<String>::new());
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyCommand("Lint"))
        );
    }

    #[test]
    fn test_validate_rejects_recent_over_capacity() {
        let mut settings = MonitorSettings::with_defaults();
        settings.history_capacity = 3;
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::RecentExceedsCapacity { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut settings = MonitorSettings::with_defaults();
        settings.summary_interval = Duration::ZERO;
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::ZeroSummaryInterval)
        );
    }
}
