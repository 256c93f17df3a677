//! Hosts table bound to a file on disk.

use std::fs::{File, OpenOptions};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::entry::HostEntry;
use super::error::HostsError;
use super::sync::{self, FileTarget};
use super::table::{HostTable, read_entries};

/// Mode for files created by [`HostsFile::open`].
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// A [`HostTable`] loaded from, and committed back to, a backing file.
///
/// Edits go through [`HostsFile::table`] and stay in memory until
/// [`HostsFile::sync`] is called.
#[derive(Debug)]
pub struct HostsFile {
    path: PathBuf,
    table: HostTable,
    sync_lock: Mutex<()>,
}

impl HostsFile {
    /// Opens the file for editing, creating it empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`] if the file cannot be opened or read, and
    /// [`HostsError::Parse`] for the first malformed line.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HostsError> {
        let path = path.into();
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(NEW_FILE_MODE);
        }

        let file = options
            .open(&path)
            .map_err(|e| HostsError::io("open", &path, e))?;
        Self::load(path, &file)
    }

    /// Opens an existing file for inspection without creating it.
    ///
    /// # Errors
    ///
    /// Same as [`HostsFile::open`], plus [`HostsError::Io`] if the file is
    /// missing.
    pub fn open_read_only(path: impl Into<PathBuf>) -> Result<Self, HostsError> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| HostsError::io("open", &path, e))?;
        Self::load(path, &file)
    }

    fn load(path: PathBuf, file: &File) -> Result<Self, HostsError> {
        let entries = read_file(&path, file)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened hosts file");

        Ok(Self {
            path,
            table: HostTable::from_entries(entries),
            sync_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory entries.
    #[must_use]
    pub const fn table(&self) -> &HostTable {
        &self.table
    }

    /// Detaches the in-memory entries from the backing file.
    #[must_use]
    pub fn into_table(self) -> HostTable {
        self.table
    }

    /// Discards in-memory edits and re-reads the backing file.
    ///
    /// Returns the number of entries loaded. On error the table is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`HostsFile::open_read_only`].
    pub fn reload(&self) -> Result<usize, HostsError> {
        let _guard = self.sync_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let file = File::open(&self.path).map_err(|e| HostsError::io("open", &self.path, e))?;
        let entries = read_file(&self.path, &file)?;
        let count = entries.len();

        self.table.replace(entries);
        tracing::debug!(path = %self.path.display(), entries = count, "Reloaded hosts file");
        Ok(count)
    }

    /// Writes the in-memory entries to the backing file.
    ///
    /// The previous contents are read first and written back if the write
    /// fails. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// See [`sync::sync`].
    pub fn sync(&self) -> Result<usize, HostsError> {
        let _guard = self.sync_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let target = FileTarget::new(&self.path);
        self.table
            .with_entries(|entries| sync::sync(&target, entries))
    }
}

fn read_file(path: &Path, file: &File) -> Result<Vec<HostEntry>, HostsError> {
    read_entries(BufReader::new(file)).map_err(|e| match e {
        HostsError::Read(source) => HostsError::io("read", path, source),
        other => other,
    })
}
