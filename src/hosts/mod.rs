//! Hosts file model, ordered store and persistence.
//!
//! This module provides:
//! - Line tokenizing ([`tokenize`])
//! - The name grammar ([`name`])
//! - Validated entries ([`HostEntry`], [`EntryFields`])
//! - Rendering back to text ([`render`])
//! - The ordered, lock-guarded store ([`HostTable`])
//! - File-backed stores with rollback-safe sync ([`HostsFile`], [`sync`])
//!
//! # File Format
//!
//! ```text
//! <ip>\t<hostname>[\t<alias> <alias> ...][\t#<comment>]
//! #<comment-only line>
//! ```
//!
//! Fields are read separated by spaces or tabs and written separated by a
//! single tab. Comment lines are attached to the entry that follows them.
//! Output lines end with CRLF.

mod entry;
mod error;
mod file;
pub mod name;
pub mod render;
pub mod sync;
mod table;
pub mod tokenize;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use entry::{EntryFields, HostEntry};
pub use error::{FieldError, HostsError};
pub use file::HostsFile;
pub use sync::{FileTarget, SyncTarget};
pub use table::{END, HostTable, MAX_LINE_LEN};
