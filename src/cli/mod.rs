//! Command-line interface for docsync.

pub mod args;
mod commands;
mod prompt;

use clap::{Parser, Subcommand};
use thiserror::Error;

pub use args::{GlobalArgs, OutputSink};
pub use prompt::ConsolePrompt;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during CLI execution.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument processing error.
    #[error("{0}")]
    Args(#[from] args::ArgsError),

    /// Configuration error.
    #[error("{0}")]
    Config(#[from] crate::config::ConfigError),

    /// Option value error.
    #[error("{0}")]
    Value(#[from] crate::config::ParseValueError),

    /// Merge command error.
    #[error("{0}")]
    Merge(#[from] crate::commands::MergeTreesError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

// =============================================================================
// CLI Definition
// =============================================================================

/// docsync - reconciles two directory trees into one.
#[derive(Parser, Debug)]
#[command(name = "docsync", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge two directory trees into a target directory.
    Merge(commands::merge::MergeArgs),
}

// =============================================================================
// CLI Execution
// =============================================================================

impl Cli {
    /// Parse command-line arguments and return the CLI instance.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Merge(args) => args.run(&self.global).await,
        }
    }
}

/// Main entry point for the CLI.
pub async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.run().await
}
