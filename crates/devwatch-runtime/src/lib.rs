//! Runtime adapters for devwatch.
//!
//! Spawns and supervises the lint and dev server processes, watches source
//! directories, renders monitor output to the terminal and drives the whole
//! thing from a single [`Supervisor`] loop.

#![deny(unsafe_code)]

pub mod console;
pub mod process;
pub mod relint;
pub mod signal;
pub mod supervisor;
pub mod watcher;

pub use console::ConsoleReporter;
pub use process::{
    DevServer, LintOutcome, TERM_GRACE_PERIOD, Termination, run_lint_check, shutdown_child,
    spawn_piped,
};
pub use relint::{RelintRequest, RelintScheduler};
pub use signal::{ShutdownListener, ShutdownSignal};
pub use supervisor::{Supervisor, SupervisorState, handle_file_change};
pub use watcher::{FileChange, FileWatcher};
