//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: poll once and notify
//! - status: last run and attention queue
//! - ack: silence a PR until it changes
//! - clear: reset all state

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pr-attention - desktop notifications for pull requests that need you
#[derive(Parser, Debug)]
#[command(name = "pr-attention")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Organization to monitor (repeatable, overrides config and environment)
    #[arg(long = "org", global = true, value_name = "ORG")]
    pub orgs: Vec<String>,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Poll for PRs needing attention and notify
    Run {
        /// Include draft PRs in results
        #[arg(long)]
        include_drafts: bool,
    },

    /// Show the last run and the current attention queue
    Status,

    /// Suppress notifications for a PR until it is updated
    Ack {
        /// PR URL, org/repo#N, or PR ID
        reference: String,
    },

    /// Delete all state and start fresh
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
