//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::defaults;

/// hostctl: hosts file editor
///
/// Inspects and edits a hosts file while keeping its entry order and
/// comment blocks.
#[derive(Debug, Parser)]
#[command(name = "hostctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to the hosts file
    #[arg(long, short, global = true)]
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Print entries as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Print the resulting file instead of writing it
    #[arg(long = "dry-run", global = true)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for hostctl
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all entries with their positions
    List,

    /// Look up entries by address, hostname or alias
    Get {
        /// What to look up
        #[command(flatten)]
        query: QueryArgs,

        /// Return every match instead of the first one
        #[arg(long)]
        all: bool,
    },

    /// Insert a new entry
    Add {
        /// IPv4 or IPv6 address
        ip: String,

        /// Canonical hostname
        hostname: String,

        /// Additional names for the address
        aliases: Vec<String>,

        /// Trailing comment ('#' is added when missing)
        #[arg(long)]
        comment: Option<String>,

        /// Insert before this position (-1 appends)
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        position: isize,
    },

    /// Remove the entry at a position (-1 removes the last one)
    Delete {
        /// Position of the entry to remove
        #[arg(allow_negative_numbers = true)]
        position: isize,
    },

    /// Parse the hosts file and report problems
    Check,

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE_NAME)]
        output: PathBuf,
    },
}

/// Lookup key for the `get` subcommand; exactly one must be given.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct QueryArgs {
    /// Match the address text exactly
    #[arg(long)]
    pub ip: Option<String>,

    /// Match the canonical hostname
    #[arg(long)]
    pub hostname: Option<String>,

    /// Match any alias
    #[arg(long)]
    pub alias: Option<String>,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }

    /// Returns true if the command edits the hosts file.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        matches!(self.command, Command::Add { .. } | Command::Delete { .. })
    }
}
