//! CLI-specific error types and exit codes.

use devwatch_core::MonitorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid settings or project directory.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Process or signal setup error.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to a sysexits-style exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 78,  // EX_CONFIG
            CliError::Process(_) => 71, // EX_OSERR
        }
    }
}

impl From<MonitorError> for CliError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::Settings(e) => CliError::Config(e.to_string()),
            MonitorError::SpawnFailed { .. }
            | MonitorError::WatchFailed { .. }
            | MonitorError::AlreadyStarted
            | MonitorError::Signal(_) => CliError::Process(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devwatch_core::SettingsError;

    #[test]
    fn test_settings_errors_map_to_config_exit_code() {
        let err = CliError::from(MonitorError::Settings(SettingsError::ZeroSummaryInterval));
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_signal_errors_map_to_process_exit_code() {
        let err = CliError::from(MonitorError::Signal(std::io::Error::other("no signals")));
        assert_eq!(err.exit_code(), 71);
        assert!(err.to_string().contains("no signals"));
    }

    #[test]
    fn test_restarting_supervisor_is_a_process_error() {
        let err = CliError::from(MonitorError::AlreadyStarted);
        assert_eq!(err.exit_code(), 71);
    }
}
