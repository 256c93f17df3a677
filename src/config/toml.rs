//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Hosts file configuration section
    #[serde(default)]
    pub hosts: HostsSection,

    /// Output configuration section
    #[serde(default)]
    pub output: OutputSection,
}

/// Hosts file configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostsSection {
    /// Path to the hosts file (`~` is expanded)
    pub path: Option<PathBuf>,

    /// Create the hosts file on add/delete when it does not exist
    pub create_if_missing: Option<bool>,
}

/// Output configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Print entries as JSON
    #[serde(default)]
    pub json: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# hostctl Configuration File

[hosts]
# Hosts file to edit (default: /etc/hosts, or the Windows drivers\etc\hosts)
# A leading "~" is expanded to the home directory.
# path = "/etc/hosts"

# Create the file on add/delete when it does not exist (default: true)
# create_if_missing = true

[output]
# Print entries as JSON (same as --json)
# json = false
"#
    .to_string()
}
