//! Bounded error and warning histories.

use std::collections::VecDeque;

use crate::domain::LogEntry;

/// Maximum number of entries kept per history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Ring buffer of entries, oldest evicted first.
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl BoundedHistory {
    /// Create an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, returning the evicted one if the history was full.
    pub fn push(&mut self, entry: LogEntry) -> Option<LogEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The last `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> Vec<LogEntry> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}

impl Default for BoundedHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// The pair of histories owned by the monitor.
#[derive(Debug, Clone, Default)]
pub struct IssueHistory {
    pub errors: BoundedHistory,
    pub warnings: BoundedHistory,
}

impl IssueHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            errors: BoundedHistory::new(capacity),
            warnings: BoundedHistory::new(capacity),
        }
    }

    /// True when nothing has been tracked yet.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
