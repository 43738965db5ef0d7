//! CLI module for pr-attention - command-line interface and subcommands.

pub mod commands;

pub use commands::{Cli, Commands};
