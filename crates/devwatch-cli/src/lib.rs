//! Command-line adapter for devwatch.
//!
//! Parses arguments, turns them into [`MonitorSettings`](devwatch_core::MonitorSettings)
//! and runs the supervisor until a termination signal arrives.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary target only
use anyhow as _;
use dotenvy as _;
use tokio as _;
use tracing as _;

pub mod bootstrap;
pub mod error;
pub mod parser;

pub use bootstrap::{init_tracing, run, settings_from_cli};
pub use error::CliError;
pub use parser::Cli;
