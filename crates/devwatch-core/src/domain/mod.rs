//! Domain types shared by every devwatch crate.

mod entry;
mod level;

pub use entry::{EntryKind, EntrySource, Issue, LogEntry};
pub use level::LogLevel;
