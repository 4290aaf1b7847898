//! Child process management for the lint check and the dev server.
//!
//! # Structure
//!
//! - `spawn_piped` - Command building with piped stdio
//! - `spawn_stream_reader` - Lossy line reader feeding a callback
//! - `run_lint_check` - One-shot lint run with exit reporting
//! - `DevServer` - Long-running server owned until shutdown
//! - `shutdown_child` - SIGTERM then SIGKILL termination

mod command;
mod dev_server;
mod lint;
mod shutdown;
mod stream;

pub use command::spawn_piped;
pub use dev_server::DevServer;
pub use lint::{LintOutcome, run_lint_check};
pub use shutdown::{TERM_GRACE_PERIOD, Termination, shutdown_child};
