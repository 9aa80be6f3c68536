//! cli
//!
//! Argument parsing and the top-level entry point.

mod args;
mod submit;

pub use args::Cli;

use anyhow::Result;

use crate::ui::output::Verbosity;

/// Parse arguments and run the submit flow.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    submit::submit(&cli, verbosity)
}
