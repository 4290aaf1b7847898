//! Point-in-time summary of tracked errors and warnings.

use std::fmt::Write as _;

use serde::Serialize;

use crate::domain::LogEntry;
use crate::history::IssueHistory;

/// Number of recent entries shown per kind.
pub const SUMMARY_RECENT_COUNT: usize = 5;

/// Messages are cut to this many characters in the rendered block.
pub const MESSAGE_PREVIEW_CHARS: usize = 100;

const RULE_WIDTH: usize = 60;

/// Totals plus the most recent entries of each kind.
///
/// Owned copies; later tracking does not change an existing summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub recent_errors: Vec<LogEntry>,
    pub recent_warnings: Vec<LogEntry>,
}

impl Summary {
    pub fn from_history(history: &IssueHistory, recent: usize) -> Self {
        Self {
            errors: history.errors.len(),
            warnings: history.warnings.len(),
            recent_errors: history.errors.recent(recent),
            recent_warnings: history.warnings.recent(recent),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }

    /// Render the bordered text block.
    ///
    /// Every listed message is followed by `...`, including messages shorter
    /// than the preview length.
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "ERROR MONITORING SUMMARY");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Total Errors: {}", self.errors);
        let _ = writeln!(out, "Total Warnings: {}", self.warnings);

        render_section(&mut out, "Recent Errors:", &self.recent_errors);
        render_section(&mut out, "Recent Warnings:", &self.recent_warnings);

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out);
        out
    }
}

fn render_section(out: &mut String, title: &str, entries: &[LogEntry]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    for entry in entries {
        let _ = writeln!(out, "  - [{}] {}...", entry.source, preview(&entry.message));
    }
}

fn preview(message: &str) -> &str {
    match message.char_indices().nth(MESSAGE_PREVIEW_CHARS) {
        Some((cut, _)) => &message[..cut],
        None => message,
    }
}
