//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// Hosts file to operate on, with `~` already expanded
    pub hosts_path: PathBuf,

    /// Whether add/delete may create the hosts file
    pub create_if_missing: bool,

    /// Print entries as JSON
    pub json: bool,

    /// Dry-run mode (print the result instead of writing the file)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ hosts: {}, create_if_missing: {}, json: {}, dry_run: {} }}",
            self.hosts_path.display(),
            self.create_if_missing,
            self.json,
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if the hosts path is empty or starts with `~`
    /// while no home directory is known.
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let hosts_path = Self::resolve_hosts_path(cli, toml)?;

        let create_if_missing = toml
            .and_then(|t| t.hosts.create_if_missing)
            .unwrap_or(defaults::CREATE_IF_MISSING);

        // Flags only enable
        let json = cli.json || toml.is_some_and(|t| t.output.json);

        Ok(Self {
            hosts_path,
            create_if_missing,
            json,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_hosts_path(cli: &Cli, toml: Option<&TomlConfig>) -> Result<PathBuf, ConfigError> {
        let raw = cli
            .file
            .clone()
            .or_else(|| toml.and_then(|t| t.hosts.path.clone()))
            .unwrap_or_else(defaults::hosts_path);

        if raw.as_os_str().is_empty() {
            return Err(ConfigError::invalid_path("", "path is empty"));
        }

        expand_home(&raw)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Replaces a leading `~` component with the user's home directory.
fn expand_home(path: &Path) -> Result<PathBuf, ConfigError> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };

    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::invalid_path(path.display().to_string(), "home directory is unknown")
    })?;

    Ok(home.join(rest))
}
