//! Rendering entries back to hosts file text.

use std::io::{self, Write};

use super::entry::HostEntry;

/// Line terminator used for every rendered line.
pub const LINE_ENDING: &str = "\r\n";

/// Writes one entry: its header lines, then its canonical line, each
/// terminated by [`LINE_ENDING`].
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns any error reported by the writer.
pub fn write_entry<W: Write + ?Sized>(writer: &mut W, entry: &HostEntry) -> io::Result<usize> {
    let mut count = 0;
    for line in entry.header() {
        count += write_line(writer, line)?;
    }
    count += write_line(writer, entry.canonical_line())?;
    Ok(count)
}

/// Writes entries in order with no separation beyond what each entry emits.
///
/// An empty slice writes nothing.
///
/// # Errors
///
/// Returns the first error reported by the writer.
pub fn write_entries<W: Write + ?Sized>(writer: &mut W, entries: &[HostEntry]) -> io::Result<usize> {
    let mut count = 0;
    for entry in entries {
        count += write_entry(writer, entry)?;
    }
    Ok(count)
}

/// Renders entries into a string.
#[must_use]
pub fn render(entries: &[HostEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        for line in entry.header() {
            out.push_str(line);
            out.push_str(LINE_ENDING);
        }
        out.push_str(entry.canonical_line());
        out.push_str(LINE_ENDING);
    }
    out
}

fn write_line<W: Write + ?Sized>(writer: &mut W, line: &str) -> io::Result<usize> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(LINE_ENDING.as_bytes())?;
    Ok(line.len() + LINE_ENDING.len())
}
