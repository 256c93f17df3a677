//! Configuration layer for hostctl.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The hosts file path follows that order: `--file`, then `hosts.path`, then
//! the platform default. A leading `~` is expanded in both sources.
//!
//! # Boolean Flag Semantics
//!
//! `--json` uses OR semantics with `output.json`: if either is `true`, output is JSON.
//! `hosts.create_if_missing` is TOML-only.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, QueryArgs};
pub use error::ConfigError;
pub use toml::{HostsSection, OutputSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
