//! Tests for validated configuration.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::ConfigError;
use super::cli::Cli;
use super::defaults;
use super::toml::TomlConfig;
use super::validated::{ValidatedConfig, write_default_config};

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["hostctl"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

mod defaults_applied {
    use super::*;

    #[test]
    fn no_sources_uses_platform_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&["list"]), None).unwrap();

        assert_eq!(config.hosts_path, defaults::hosts_path());
        assert_eq!(config.create_if_missing, defaults::CREATE_IF_MISSING);
        assert!(!config.json);
        assert!(!config.dry_run);
        assert!(!config.verbose);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml(""))).unwrap();

        assert_eq!(config.hosts_path, defaults::hosts_path());
    }
}

mod precedence {
    use super::*;

    #[test]
    fn cli_file_overrides_toml() {
        let cli = cli(&["--file", "/cli/hosts", "list"]);
        let toml = toml("[hosts]\npath = \"/toml/hosts\"\n");

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.hosts_path, Path::new("/cli/hosts"));
    }

    #[test]
    fn toml_path_used_without_cli() {
        let toml = toml("[hosts]\npath = \"/toml/hosts\"\ncreate_if_missing = false\n");

        let config = ValidatedConfig::from_raw(&cli(&["check"]), Some(&toml)).unwrap();

        assert_eq!(config.hosts_path, Path::new("/toml/hosts"));
        assert!(!config.create_if_missing);
    }

    #[test]
    fn json_is_enabled_by_either_source() {
        let from_cli = ValidatedConfig::from_raw(&cli(&["list", "--json"]), None).unwrap();
        assert!(from_cli.json);

        let toml = toml("[output]\njson = true\n");
        let from_toml = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml)).unwrap();
        assert!(from_toml.json);
    }

    #[test]
    fn cli_only_flags_pass_through() {
        let config =
            ValidatedConfig::from_raw(&cli(&["--dry-run", "-v", "delete", "0"]), None).unwrap();

        assert!(config.dry_run);
        assert!(config.verbose);
    }
}

mod paths {
    use super::*;

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let toml = toml("[hosts]\npath = \"~/hosts.d/lab\"\n");

        let config = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml)).unwrap();

        assert_eq!(config.hosts_path, home.join("hosts.d").join("lab"));
    }

    #[test]
    fn tilde_inside_name_is_literal() {
        let config = ValidatedConfig::from_raw(&cli(&["-f", "~backup/hosts", "list"]), None).unwrap();

        assert_eq!(config.hosts_path, PathBuf::from("~backup/hosts"));
    }

    #[test]
    fn empty_path_rejected() {
        let toml = toml("[hosts]\npath = \"\"\n");

        let result = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidPath { .. })));
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_reads_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("hostctl.toml");
        fs::write(&config_path, "[hosts]\npath = \"/from/file\"\n").unwrap();
        let cli = cli(&["--config", config_path.to_str().unwrap(), "list"]);

        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.hosts_path, Path::new("/from/file"));
    }

    #[test]
    fn load_missing_config_file_fails() {
        let cli = cli(&["--config", "/nonexistent/hostctl.toml", "list"]);

        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn init_template_round_trips_through_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("generated.toml");
        write_default_config(&config_path).unwrap();
        let cli = cli(&["--config", config_path.to_str().unwrap(), "check"]);

        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.hosts_path, defaults::hosts_path());
    }

    #[test]
    fn write_default_config_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("missing").join("hostctl.toml");

        let result = write_default_config(&config_path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

mod display {
    use super::*;

    #[test]
    fn display_shows_resolved_path() {
        let config = ValidatedConfig::from_raw(&cli(&["-f", "/srv/hosts", "list"]), None).unwrap();

        let text = config.to_string();

        assert!(text.contains("hosts: /srv/hosts"));
        assert!(text.contains("dry_run: false"));
    }
}
