//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use devwatch_core::{DEFAULT_RELINT_DELAY_MS, DEFAULT_SUMMARY_INTERVAL_SECS};

/// Watch a front-end project: lint on change, run the dev server and
/// summarize every error and warning they report.
#[derive(Debug, Parser)]
#[command(name = "devwatch")]
#[command(about = "Supervise lint and dev server runs and summarize their errors")]
#[command(version)]
pub struct Cli {
    /// Project directory containing package.json
    #[arg(long = "project-dir", env = "DEVWATCH_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// npm script that runs the linter
    #[arg(long = "lint-script", default_value = "lint")]
    pub lint_script: String,

    /// npm script that starts the development server
    #[arg(long = "dev-script", default_value = "dev")]
    pub dev_script: String,

    /// Delay between a file change and the lint run it triggers
    #[arg(long = "relint-delay-ms", default_value_t = DEFAULT_RELINT_DELAY_MS)]
    pub relint_delay_ms: u64,

    /// How often to print a summary while issues exist
    #[arg(long = "summary-interval-secs", default_value_t = DEFAULT_SUMMARY_INTERVAL_SECS)]
    pub summary_interval_secs: u64,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
