//! Substring rules that turn captured tool output into classifications.
//!
//! Rules are evaluated top to bottom and the first match wins. Matching is
//! case-sensitive.

use std::borrow::Cow;

use crate::domain::EntrySource;

/// Message recorded in place of raw `EADDRINUSE` output.
pub const PORT_IN_USE_MESSAGE: &str =
    "Port already in use. Please stop other instances or use a different port.";

/// What to do with one captured chunk of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Track as an error attributed to the given source.
    Error(EntrySource),
    /// Track as a warning attributed to the given source.
    Warning(EntrySource),
    /// Print a success line, do not track.
    Success,
    /// Print an info line, do not track.
    Info,
    /// Whitespace only; ignore.
    Blank,
}

struct Rule {
    markers: &'static [&'static str],
    verdict: Classification,
}

const LINT_RULES: &[Rule] = &[
    Rule {
        markers: &["error", "Error"],
        verdict: Classification::Error(EntrySource::Eslint),
    },
    Rule {
        markers: &["warning", "Warning"],
        verdict: Classification::Warning(EntrySource::Eslint),
    },
];

const DEV_SERVER_RULES: &[Rule] = &[
    Rule {
        markers: &["[ERROR]", "ERROR:"],
        verdict: Classification::Error(EntrySource::DevServer),
    },
    Rule {
        markers: &["[WARN]", "WARNING:"],
        verdict: Classification::Warning(EntrySource::DevServer),
    },
    Rule {
        markers: &["Error:", "error:"],
        verdict: Classification::Error(EntrySource::DevServer),
    },
    Rule {
        markers: &["Failed to compile"],
        verdict: Classification::Error(EntrySource::Compilation),
    },
    Rule {
        markers: &["compiled with warnings"],
        verdict: Classification::Warning(EntrySource::Compilation),
    },
    Rule {
        markers: &["\u{2713}", "ready"],
        verdict: Classification::Success,
    },
];

fn first_match(rules: &[Rule], chunk: &str) -> Classification {
    rules
        .iter()
        .find(|rule| rule.markers.iter().any(|marker| chunk.contains(marker)))
        .map_or_else(
            || {
                if chunk.trim().is_empty() {
                    Classification::Blank
                } else {
                    Classification::Info
                }
            },
            |rule| rule.verdict,
        )
}

/// Classify a chunk from the lint command's stdout.
pub fn classify_lint_stdout(chunk: &str) -> Classification {
    first_match(LINT_RULES, chunk)
}

/// Classify a chunk from the dev server's stdout.
pub fn classify_dev_server_stdout(chunk: &str) -> Classification {
    first_match(DEV_SERVER_RULES, chunk)
}

/// Message to record for a chunk from the dev server's stderr.
///
/// Everything on stderr is an error; a port conflict is rewritten to a fixed
/// readable message.
pub fn dev_server_stderr_message(chunk: &str) -> Cow<'_, str> {
    if chunk.contains("EADDRINUSE") {
        Cow::Borrowed(PORT_IN_USE_MESSAGE)
    } else {
        Cow::Borrowed(chunk)
    }
}
