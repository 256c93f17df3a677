//! Application execution logic.
//!
//! This module runs a single subcommand against the configured hosts file
//! and writes its output to a caller-supplied writer.

use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use hostctl::config::{Command, ConfigError, QueryArgs, ValidatedConfig, write_default_config};
use hostctl::hosts::{HostEntry, HostTable, HostsError, HostsFile};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The hosts store rejected the operation.
    #[error(transparent)]
    Hosts(#[from] HostsError),

    /// Failed to write the configuration template.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to write command output.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    /// Failed to encode entries as JSON.
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A lookup found nothing.
    #[error("No entry matches {0}")]
    NoMatch(String),
}

/// Executes one subcommand.
///
/// Read-only commands never create the hosts file. `add` and `delete`
/// commit through [`HostsFile::sync`], or print the resulting file to `out`
/// when `config.dry_run` is set.
///
/// # Errors
///
/// Returns a [`RunError`] if the hosts file cannot be loaded, the edit is
/// rejected, the commit fails, or output cannot be written.
pub fn execute<W: Write>(
    command: &Command,
    config: &ValidatedConfig,
    out: &mut W,
) -> Result<(), RunError> {
    match command {
        Command::List => {
            let hosts = HostsFile::open_read_only(&config.hosts_path)?;
            print_entries(&hosts.table().entries(), config.json, out)
        }
        Command::Get { query, all } => {
            let hosts = HostsFile::open_read_only(&config.hosts_path)?;
            let found = lookup(hosts.table(), query, *all)?;
            if found.is_empty() {
                return Err(RunError::NoMatch(describe(query)));
            }
            print_entries(&found, config.json, out)
        }
        Command::Add {
            ip,
            hostname,
            aliases,
            comment,
            position,
        } => {
            let hosts = open_for_edit(config)?;
            let entry = HostEntry::mapping(
                ip,
                hostname,
                comment.as_deref().unwrap_or_default(),
                aliases.iter().map(String::as_str),
            )?;
            tracing::debug!(line = entry.canonical_line(), position, "Adding entry");
            hosts.table().add(entry, *position)?;
            commit(&hosts, config, out)
        }
        Command::Delete { position } => {
            let hosts = open_for_edit(config)?;
            let Some(removed) = hosts.table().delete(*position)? else {
                tracing::info!("Hosts file is empty, nothing to delete");
                return Ok(());
            };
            tracing::info!(
                position = removed.position(),
                "Removed entry: {}",
                removed.canonical_line()
            );
            commit(&hosts, config, out)
        }
        Command::Check => {
            let hosts = HostsFile::open_read_only(&config.hosts_path)?;
            writeln!(
                out,
                "{}: {} entries OK",
                hosts.path().display(),
                hosts.table().len()
            )?;
            Ok(())
        }
        Command::Init { output } => init(output, out),
    }
}

/// Writes the default configuration template and reports where it went.
///
/// # Errors
///
/// Returns [`RunError::Config`] if the template cannot be written.
pub fn init<W: Write>(output: &Path, out: &mut W) -> Result<(), RunError> {
    write_default_config(output)?;
    writeln!(out, "Configuration template written to: {}", output.display())?;
    Ok(())
}

fn open_for_edit(config: &ValidatedConfig) -> Result<HostsFile, HostsError> {
    // A dry run must leave the filesystem untouched.
    if config.create_if_missing && !config.dry_run {
        HostsFile::open(&config.hosts_path)
    } else {
        HostsFile::open_read_only(&config.hosts_path)
    }
}

fn commit<W: Write>(
    hosts: &HostsFile,
    config: &ValidatedConfig,
    out: &mut W,
) -> Result<(), RunError> {
    if config.dry_run {
        hosts.table().write_to(out)?;
        tracing::info!("[DRY-RUN] {} left unchanged", hosts.path().display());
        return Ok(());
    }

    let written = hosts.sync()?;
    tracing::info!(
        bytes = written,
        entries = hosts.table().len(),
        "Updated {}",
        hosts.path().display()
    );
    Ok(())
}

fn lookup(table: &HostTable, query: &QueryArgs, all: bool) -> Result<Vec<HostEntry>, HostsError> {
    match (&query.ip, &query.hostname, &query.alias) {
        (Some(ip), _, _) if all => table.find_all_by_ip(ip),
        (Some(ip), _, _) => table.get_by_ip(ip),
        (_, Some(hostname), _) if all => table.find_all_by_hostname(hostname),
        (_, Some(hostname), _) => table.get_by_hostname(hostname),
        (_, _, Some(alias)) if all => table.find_all_by_alias(alias),
        (_, _, Some(alias)) => table.get_by_alias(alias),
        (None, None, None) => Ok(Vec::new()),
    }
}

fn describe(query: &QueryArgs) -> String {
    match (&query.ip, &query.hostname, &query.alias) {
        (Some(ip), _, _) => format!("ip '{ip}'"),
        (_, Some(hostname), _) => format!("hostname '{hostname}'"),
        (_, _, Some(alias)) => format!("alias '{alias}'"),
        (None, None, None) => "an empty query".to_string(),
    }
}

/// Prints entries as an indexed listing, or as a JSON array.
fn print_entries<W: Write>(entries: &[HostEntry], json: bool, out: &mut W) -> Result<(), RunError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, entries)?;
        writeln!(out)?;
        return Ok(());
    }

    for entry in entries {
        for line in entry.header() {
            writeln!(out, "{:>5}  {line}", "")?;
        }
        writeln!(out, "{:>5}  {}", entry.position(), entry.canonical_line())?;
    }
    Ok(())
}
