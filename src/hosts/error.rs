//! Error types for hosts file parsing, editing and persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Field-level cause of a rejected line or entry.
///
/// Carried inside [`HostsError::Parse`] when the failure came from reading
/// text, and inside [`HostsError::Validation`] when it came from building
/// an entry out of field values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The line was empty or contained only whitespace.
    #[error("invalid line, empty")]
    EmptyLine,

    /// The first field did not parse as an IPv4 or IPv6 address.
    #[error("invalid ip address: '{0}'")]
    InvalidIp(String),

    /// A mapping entry had no address at all.
    #[error("no valid ip address")]
    MissingIp,

    /// The hostname is absent or violates the name grammar.
    #[error("missing/invalid hostname: '{0}'")]
    InvalidHostname(String),

    /// The hostname looks like a comment.
    #[error("hostname cannot be a comment: '{0}'")]
    CommentHostname(String),

    /// An alias violates the name grammar.
    #[error("alias {index} is not a valid name: '{value}'")]
    InvalidAlias {
        /// 1-based position of the alias in the alias list
        index: usize,
        /// The offending alias
        value: String,
    },

    /// An alias looks like a comment.
    #[error("alias {index} cannot be a comment: '{value}'")]
    CommentAlias {
        /// 1-based position of the alias in the alias list
        index: usize,
        /// The offending alias
        value: String,
    },

    /// A trailing comment was supplied without the leading `#`.
    #[error("comment must start with '#': '{0}'")]
    UnprefixedComment(String),

    /// Comment or header text contained a line break.
    #[error("comment must fit on one line: {0:?}")]
    MultilineComment(String),

    /// A line read from a file or stream was not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}

/// Error type for hosts store operations.
///
/// Every variant is returned to the caller; nothing is recovered silently.
#[derive(Debug, Error)]
pub enum HostsError {
    /// A line could not be turned into an entry.
    #[error("{}{source}", line_prefix(*.line))]
    Parse {
        /// 1-based source line, when the text came from a file or stream
        line: Option<usize>,
        /// Field-level cause
        #[source]
        source: FieldError,
    },

    /// A physical line exceeded the reader limit.
    #[error("line {line} is too long")]
    LineTooLong {
        /// 1-based source line
        line: usize,
    },

    /// Field values did not form a valid entry.
    #[error("invalid host entry: {0}")]
    Validation(#[source] FieldError),

    /// A position argument was outside the store bounds.
    #[error("position {position} out of range for {len} entries")]
    Range {
        /// The rejected position
        position: isize,
        /// Store length at the time of the call
        len: usize,
    },

    /// A query was issued against a store with no entries.
    #[error("no entries in hosts file")]
    EmptyStore,

    /// Opening, inspecting or reading the backing file failed.
    #[error("Failed to {action} '{}': {source}", path.display())]
    Io {
        /// What was being attempted (e.g. "open", "stat", "write")
        action: &'static str,
        /// Path of the backing file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading lines from a byte stream failed.
    #[error("Failed to read hosts data: {0}")]
    Read(#[source] io::Error),

    /// Writing rendered entries to a byte sink failed.
    #[error("Failed to write hosts data: {0}")]
    Write(#[source] io::Error),

    /// The pre-write snapshot of the backing file could not be taken.
    #[error("Failed to read existing file '{}' to make backup: {source}", path.display())]
    Backup {
        /// Path of the backing file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Writing failed and restoring the previous contents failed as well.
    ///
    /// The backing file may hold neither the old nor the new contents.
    #[error(
        "Failed to write '{}' ({source}) and failed to restore its previous contents ({restore})",
        path.display()
    )]
    Rollback {
        /// Path of the backing file
        path: PathBuf,
        /// The write failure that triggered the restore
        #[source]
        source: io::Error,
        /// The restore failure
        restore: io::Error,
    },
}

impl HostsError {
    /// Returns true for variants caused by an I/O failure on the backing
    /// file, an input stream or an output sink.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Read(_) | Self::Write(_))
    }

    /// Returns the field-level cause for parse and validation failures.
    #[must_use]
    pub const fn field_error(&self) -> Option<&FieldError> {
        match self {
            Self::Parse { source, .. } | Self::Validation(source) => Some(source),
            _ => None,
        }
    }

    pub(crate) const fn parse(source: FieldError) -> Self {
        Self::Parse { line: None, source }
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Attaches a 1-based line number to a parse failure.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            Self::Parse { source, .. } | Self::Validation(source) => Self::Parse {
                line: Some(line),
                source,
            },
            other => other,
        }
    }
}

fn line_prefix(line: Option<usize>) -> String {
    line.map_or_else(
        || "invalid host entry: ".to_string(),
        |n| format!("invalid host entry on line {n}: "),
    )
}
