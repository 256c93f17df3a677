//! Ordered, lock-guarded store of host entries.
//!
//! # Positions
//!
//! Every entry carries its index in the store. Indices are dense and
//! zero-based and are recomputed after each insert or delete, so a position
//! read from a query is only meaningful until the next mutation.
//!
//! # Concurrency
//!
//! A single [`RwLock`] guards the sequence. Inserts and deletes take it
//! exclusively, queries share it. No I/O happens under the exclusive lock;
//! a file sync holds the shared lock for the whole write, so edits wait
//! until the file is consistent with memory again.

use std::io::{BufRead, Read, Write};
use std::mem;
use std::net::IpAddr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::entry::{HostEntry, check_single_line};
use super::error::{FieldError, HostsError};
use super::name::is_comment;
use super::render;
use super::tokenize::tokenize;

/// Position argument meaning "the last entry" for deletes and "after the
/// last entry" for inserts.
pub const END: isize = -1;

/// Longest physical line accepted while loading.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// In-memory ordered store of host entries.
#[derive(Debug, Default)]
pub struct HostTable {
    entries: RwLock<Vec<HostEntry>>,
}

impl HostTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the given entries in order.
    #[must_use]
    pub fn from_entries(mut entries: Vec<HostEntry>) -> Self {
        renumber(&mut entries);
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Parses a hosts file from a byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Parse`] with the 1-based line number for the
    /// first line that fails to parse, [`HostsError::LineTooLong`] for
    /// over-long lines, and [`HostsError::Read`] if the stream fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, HostsError> {
        read_entries(reader).map(Self::from_entries)
    }

    /// Replaces the whole sequence.
    pub(crate) fn replace(&self, mut entries: Vec<HostEntry>) {
        renumber(&mut entries);
        *self.write() = entries;
    }

    /// Inserts an entry.
    ///
    /// `position` is [`END`] (or the current length) to append, `0` to
    /// prepend, or any in-range index to insert before the entry currently
    /// there.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Range`] if `position` is outside `-1..=len`;
    /// the table is left unchanged.
    pub fn add(&self, entry: HostEntry, position: isize) -> Result<(), HostsError> {
        let mut entries = self.write();
        let len = entries.len();
        let index = match position {
            END => len,
            p => usize::try_from(p)
                .ok()
                .filter(|&i| i <= len)
                .ok_or(HostsError::Range { position, len })?,
        };

        entries.insert(index, entry);
        renumber(&mut entries);
        tracing::trace!(index, len = entries.len(), "Inserted host entry");
        Ok(())
    }

    /// Removes an entry and returns it.
    ///
    /// `position` is [`END`] for the last entry or any in-range index.
    /// Deleting from an empty table succeeds and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Range`] if `position` is below `-1`, or at or
    /// past the length of a non-empty table.
    pub fn delete(&self, position: isize) -> Result<Option<HostEntry>, HostsError> {
        if position < END {
            return Err(HostsError::Range {
                position,
                len: self.len(),
            });
        }

        let mut entries = self.write();
        let len = entries.len();
        if len == 0 {
            return Ok(None);
        }

        let index = match position {
            END => len - 1,
            p => usize::try_from(p)
                .ok()
                .filter(|&i| i < len)
                .ok_or(HostsError::Range { position, len })?,
        };

        let removed = entries.remove(index);
        renumber(&mut entries);
        tracing::trace!(index, len = entries.len(), "Deleted host entry");
        Ok(Some(removed))
    }

    /// Returns the first entry whose address text equals `ip`.
    ///
    /// The result holds at most one entry; an empty vector means no match.
    /// Addresses are stored in canonical form, with IPv4-mapped IPv6
    /// addresses such as `::ffff:1.2.3.4` kept as `1.2.3.4`, so queries
    /// must use that form.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::EmptyStore`] if the table has no entries and
    /// [`HostsError::Parse`] if `ip` is not an address.
    pub fn get_by_ip(&self, ip: &str) -> Result<Vec<HostEntry>, HostsError> {
        self.query_ip(ip, Match::First)
    }

    /// Returns the first entry whose hostname equals `hostname`.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::EmptyStore`] if the table has no entries.
    pub fn get_by_hostname(&self, hostname: &str) -> Result<Vec<HostEntry>, HostsError> {
        self.query(Match::First, |e| e.hostname_matches(hostname))
    }

    /// Returns the first entry with an alias equal to `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::EmptyStore`] if the table has no entries.
    pub fn get_by_alias(&self, alias: &str) -> Result<Vec<HostEntry>, HostsError> {
        self.query(Match::First, |e| e.alias_matches(alias))
    }

    /// Returns every entry whose address text equals `ip`, in order.
    ///
    /// # Errors
    ///
    /// Same as [`HostTable::get_by_ip`].
    pub fn find_all_by_ip(&self, ip: &str) -> Result<Vec<HostEntry>, HostsError> {
        self.query_ip(ip, Match::All)
    }

    /// Returns every entry whose hostname equals `hostname`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::EmptyStore`] if the table has no entries.
    pub fn find_all_by_hostname(&self, hostname: &str) -> Result<Vec<HostEntry>, HostsError> {
        self.query(Match::All, |e| e.hostname_matches(hostname))
    }

    /// Returns every entry with an alias equal to `alias`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::EmptyStore`] if the table has no entries.
    pub fn find_all_by_alias(&self, alias: &str) -> Result<Vec<HostEntry>, HostsError> {
        self.query(Match::All, |e| e.alias_matches(alias))
    }

    /// Returns a copy of all entries in order.
    #[must_use]
    pub fn entries(&self) -> Vec<HostEntry> {
        self.read().clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Writes every entry to `writer` and returns the number of bytes
    /// written. An empty table writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Write`] if the writer fails.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, HostsError> {
        render::write_entries(writer, &self.read()).map_err(HostsError::Write)
    }

    /// Renders every entry into a string.
    #[must_use]
    pub fn render(&self) -> String {
        render::render(&self.read())
    }

    /// Runs `f` over the entries while holding the shared lock.
    pub(crate) fn with_entries<R>(&self, f: impl FnOnce(&[HostEntry]) -> R) -> R {
        f(&self.read())
    }

    fn query_ip(&self, ip: &str, mode: Match) -> Result<Vec<HostEntry>, HostsError> {
        if self.is_empty() {
            return Err(HostsError::EmptyStore);
        }
        if ip.parse::<IpAddr>().is_err() {
            return Err(HostsError::parse(FieldError::InvalidIp(ip.to_string())));
        }
        self.query(mode, |e| e.ip_matches(ip))
    }

    fn query<F>(&self, mode: Match, predicate: F) -> Result<Vec<HostEntry>, HostsError>
    where
        F: Fn(&HostEntry) -> bool,
    {
        let entries = self.read();
        if entries.is_empty() {
            return Err(HostsError::EmptyStore);
        }

        let matches = entries.iter().filter(|e| predicate(e)).cloned();
        Ok(match mode {
            Match::First => matches.take(1).collect(),
            Match::All => matches.collect(),
        })
    }

    // The guarded Vec is never left half-modified, so a poisoned lock
    // still holds a consistent sequence.
    fn read(&self) -> RwLockReadGuard<'_, Vec<HostEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<HostEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Copy)]
enum Match {
    First,
    All,
}

fn renumber(entries: &mut [HostEntry]) {
    for (n, entry) in entries.iter_mut().enumerate() {
        entry.set_position(n);
    }
}

/// Reads entries from a stream, folding comment lines into the header of
/// the next mapping and skipping blank lines.
///
/// A comment block with no mapping after it is dropped.
pub(crate) fn read_entries<R: BufRead>(mut reader: R) -> Result<Vec<HostEntry>, HostsError> {
    let mut entries = Vec::new();
    let mut header = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        // Room for the longest accepted line plus its CRLF terminator.
        let limit = u64::try_from(MAX_LINE_LEN + 2).unwrap_or(u64::MAX);
        let read = (&mut reader)
            .take(limit)
            .read_until(b'\n', &mut buf)
            .map_err(HostsError::Read)?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.len() > MAX_LINE_LEN {
            return Err(HostsError::LineTooLong { line: line_number });
        }
        let line = std::str::from_utf8(raw)
            .map_err(|_| HostsError::parse(FieldError::InvalidEncoding).at_line(line_number))?;

        let mut tokens = tokenize(line);
        if tokens.is_empty() {
            continue;
        }
        if is_comment(&tokens[0]) {
            check_single_line(&tokens[0])
                .map_err(|e| HostsError::parse(e).at_line(line_number))?;
            header.append(&mut tokens);
            continue;
        }

        let mut entry = HostEntry::from_tokens(tokens).map_err(|e| e.at_line(line_number))?;
        entry.set_header(mem::take(&mut header));
        entries.push(entry);
    }

    if !header.is_empty() {
        tracing::debug!(
            lines = header.len(),
            "Dropping trailing comment block with no entry after it"
        );
    }
    tracing::debug!(entries = entries.len(), lines = line_number, "Loaded hosts entries");

    Ok(entries)
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
