//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Scrivener Vault - convert a Scrivener project into a Markdown vault.
#[derive(Parser, Debug)]
#[command(name = "scrivener-vault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (defaults to the user config directory).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a .scriv bundle into a vault directory.
    Convert {
        /// Path to the .scriv bundle.
        source: PathBuf,

        /// Vault directory to create or update.
        destination: PathBuf,

        /// Prefix names with their binder position ("01 Chapter 1").
        #[arg(long)]
        prefix_positions: bool,

        /// Mirror the Trash folder instead of skipping it.
        #[arg(long)]
        include_trash: bool,

        /// Report format: text or json (overrides the config file).
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print the binder outline of a bundle without converting it.
    Tree {
        /// Path to the .scriv bundle.
        source: PathBuf,
    },

    /// Create the default configuration file if missing.
    InitConfig,
}
