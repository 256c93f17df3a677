//! Committing entries to a backing file with rollback on failure.
//!
//! The sequence is:
//! 1. Capture the file's permissions.
//! 2. Read the current contents into a backup buffer.
//! 3. Truncate and reopen the file for writing with the same permissions.
//! 4. Write the rendered entries.
//! 5. If 3 or 4 fails, write the backup back (best effort) and report the
//!    original failure. A failed restore is reported as
//!    [`HostsError::Rollback`].
//!
//! The file is not locked against other processes; a concurrent external
//! edit between steps 2 and 3 is lost.

use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::entry::HostEntry;
use super::error::HostsError;
use super::render;

/// Storage that entries are committed to.
///
/// [`FileTarget`] is the production implementation; tests substitute
/// targets that fail at chosen steps.
pub trait SyncTarget {
    /// Writer returned by [`SyncTarget::open_truncated`].
    type Writer: Write;

    /// Path reported in errors.
    fn path(&self) -> &Path;

    /// Returns the current permissions of the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be inspected.
    fn permissions(&self) -> io::Result<Permissions>;

    /// Returns the full current contents of the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be read.
    fn snapshot(&self) -> io::Result<Vec<u8>>;

    /// Truncates the target and opens it for writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be opened.
    fn open_truncated(&self, permissions: &Permissions) -> io::Result<Self::Writer>;

    /// Replaces the target's contents with `contents`.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be written.
    fn restore(&self, contents: &[u8], permissions: &Permissions) -> io::Result<()>;
}

/// A hosts file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    /// Creates a target for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SyncTarget for FileTarget {
    type Writer = BufWriter<File>;

    fn path(&self) -> &Path {
        &self.path
    }

    fn permissions(&self) -> io::Result<Permissions> {
        fs::metadata(&self.path).map(|m| m.permissions())
    }

    fn snapshot(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    fn open_truncated(&self, permissions: &Permissions) -> io::Result<Self::Writer> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            options.mode(permissions.mode());
        }
        #[cfg(not(unix))]
        let _ = permissions;

        options.open(&self.path).map(BufWriter::new)
    }

    fn restore(&self, contents: &[u8], permissions: &Permissions) -> io::Result<()> {
        fs::write(&self.path, contents)?;
        fs::set_permissions(&self.path, permissions.clone())
    }
}

/// Writes `entries` to `target`, restoring the previous contents if the
/// write fails.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// - [`HostsError::Io`] if the target cannot be inspected, or if opening or
///   writing fails and the previous contents were restored
/// - [`HostsError::Backup`] if the previous contents cannot be read; the
///   target is left untouched
/// - [`HostsError::Rollback`] if writing fails and so does the restore
pub fn sync<T: SyncTarget>(target: &T, entries: &[HostEntry]) -> Result<usize, HostsError> {
    let path = target.path();
    let permissions = target
        .permissions()
        .map_err(|e| HostsError::io("stat", path, e))?;

    let backup = target.snapshot().map_err(|source| HostsError::Backup {
        path: path.to_path_buf(),
        source,
    })?;

    match write_entries(target, &permissions, entries) {
        Ok(written) => {
            tracing::debug!(path = %path.display(), bytes = written, "Synced hosts file");
            Ok(written)
        }
        Err((action, source)) => {
            tracing::debug!(
                path = %path.display(),
                "Write failed ({source}), restoring {} backup bytes",
                backup.len()
            );
            match target.restore(&backup, &permissions) {
                Ok(()) => Err(HostsError::io(action, path, source)),
                Err(restore) => Err(HostsError::Rollback {
                    path: path.to_path_buf(),
                    source,
                    restore,
                }),
            }
        }
    }
}

fn write_entries<T: SyncTarget>(
    target: &T,
    permissions: &Permissions,
    entries: &[HostEntry],
) -> Result<usize, (&'static str, io::Error)> {
    let mut writer = target
        .open_truncated(permissions)
        .map_err(|e| ("open", e))?;
    let written = render::write_entries(&mut writer, entries).map_err(|e| ("write", e))?;
    writer.flush().map_err(|e| ("write", e))?;
    Ok(written)
}
