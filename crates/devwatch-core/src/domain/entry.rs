use std::error::Error as StdError;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Origin of a tracked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntrySource {
    #[serde(rename = "ESLint")]
    Eslint,
    #[serde(rename = "Dev Server")]
    DevServer,
    /// Bundler compile results reported by the dev server.
    #[serde(rename = "Compilation")]
    Compilation,
}

impl EntrySource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eslint => "ESLint",
            Self::DevServer => "Dev Server",
            Self::Compilation => "Compilation",
        }
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which history an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Error,
    Warning,
}

/// Something worth tracking: either raw tool output or a Rust error.
///
/// Text converts directly; errors go through [`Issue::from_error`] so the
/// `source()` chain is kept as the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub message: String,
    pub stack: Option<String>,
}

impl Issue {
    /// Build an issue from an error value, rendering its cause chain as the stack.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut current = err.source();
        while let Some(cause) = current {
            causes.push(format!("caused by: {cause}"));
            current = cause.source();
        }

        Self {
            message: err.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }
}

impl From<String> for Issue {
    fn from(message: String) -> Self {
        Self {
            message,
            stack: None,
        }
    }
}

impl From<&str> for Issue {
    fn from(message: &str) -> Self {
        Self::from(message.to_string())
    }
}

/// A recorded error or warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub source: EntrySource,
    pub kind: EntryKind,
    pub message: String,
    /// Only error entries carry a stack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Creation instant in Unix milliseconds.
    pub id: i64,
}

impl LogEntry {
    /// Create an error entry stamped with the current time.
    pub fn error(issue: Issue, source: EntrySource) -> Self {
        Self::stamped(EntryKind::Error, issue.message, issue.stack, source)
    }

    /// Create a warning entry stamped with the current time. Any stack is dropped.
    pub fn warning(issue: Issue, source: EntrySource) -> Self {
        Self::stamped(EntryKind::Warning, issue.message, None, source)
    }

    fn stamped(
        kind: EntryKind,
        message: String,
        stack: Option<String>,
        source: EntrySource,
    ) -> Self {
        let timestamp = Utc::now();
        Self {
            timestamp,
            source,
            kind,
            message,
            stack,
            id: timestamp.timestamp_millis(),
        }
    }
}
