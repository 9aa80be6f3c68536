//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! `em` takes no subcommands: every invocation submits the current
//! branch as a merge request.

use clap::Parser;

/// Easy Merge - create a merge request from the current branch
#[derive(Parser, Debug)]
#[command(name = "em")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Open a merge request for the latest commit, named after its title
    em

    # Open and immediately merge by squash
    em --merge --squash

    # Pick the branches yourself
    em --source feature-login --dest release/2.0")]
pub struct Cli {
    /// Source branch; derived from the commit message when omitted
    #[arg(short, long)]
    pub source: Option<String>,

    /// Destination branch; the remote's default branch when omitted
    #[arg(short, long)]
    pub dest: Option<String>,

    /// Request title; the commit title when omitted
    #[arg(short, long)]
    pub title: Option<String>,

    /// Request description; the commit body when omitted
    #[arg(long)]
    pub description: Option<String>,

    /// Merge by squash instead of a merge commit
    #[arg(short = 'u', long)]
    pub squash: bool,

    /// Merge the request after creating it
    #[arg(short = 'e', long)]
    pub merge: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
