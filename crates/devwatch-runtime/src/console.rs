//! Colored terminal reporter.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use console::Style;
use devwatch_core::{LogLevel, ReporterPort};

/// Format a line as `[<timestamp>] <TAG>: <message>`.
pub fn format_line(level: LogLevel, message: &str, at: DateTime<Utc>) -> String {
    format!(
        "[{}] {}: {}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        level.tag(),
        message
    )
}

fn style_for(level: LogLevel) -> Style {
    let style = Style::new().force_styling(true);
    match level {
        LogLevel::Error => style.red(),
        LogLevel::Warn => style.yellow(),
        LogLevel::Info => style.cyan(),
        LogLevel::Success => style.green(),
    }
}

/// Wrap a whole line in the color for its level.
pub fn colorize(level: LogLevel, line: &str) -> String {
    style_for(level).apply_to(line).to_string()
}

/// Writes lines and summary blocks to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ReporterPort for ConsoleReporter {
    fn line(&self, level: LogLevel, message: &str) {
        let line = colorize(level, &format_line(level, message, Utc::now()));
        // A closed stdout is not worth crashing the supervisor over.
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }

    fn block(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}
