//! Default values for configuration options.
//!
//! Centralized constants to avoid magic paths scattered across the codebase.

use std::path::PathBuf;

/// Default hosts file location on Unix-like systems.
pub const UNIX_HOSTS_PATH: &str = "/etc/hosts";

/// Default hosts file location on Windows.
pub const WINDOWS_HOSTS_PATH: &str = r"C:\Windows\System32\drivers\etc\hosts";

/// Whether mutating commands create a missing hosts file.
pub const CREATE_IF_MISSING: bool = true;

/// Default output path for `hostctl init`.
pub const CONFIG_FILE_NAME: &str = "hostctl.toml";

/// Default hosts file path for the current platform.
#[must_use]
pub fn hosts_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(WINDOWS_HOSTS_PATH)
    } else {
        PathBuf::from(UNIX_HOSTS_PATH)
    }
}
