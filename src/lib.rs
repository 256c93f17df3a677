//! hostctl: hosts file editor
//!
//! A library for reading, querying and editing hosts files while keeping
//! their entry order and comment blocks, and for committing edits back to
//! disk with a backup that is restored if the write fails.

pub mod config;
pub mod hosts;
