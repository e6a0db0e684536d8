//! Print journal
//!
//! Records what was actually printed. Instead of dumping the raw command
//! stream, each job is condensed to the human-readable parts: quoted text
//! fields joined by tabs, and the copy count taken from the `P` command.
//! Every journal line is prefixed with a timestamp.

use std::path::Path;

use chrono::Local;

use crate::error::LabelResult;
use crate::storage::file_io;

/// Append a printed body to the journal file
pub fn record(path: &Path, body: &str) -> LabelResult<()> {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");
    for line in summarize(body).split('\n') {
        file_io::append_line(path, &format!("{}\t{}", now, line))?;
    }
    Ok(())
}

/// Condense a command stream to its printable text and copy counts
///
/// Quoted segments become tab-separated fields; a `P` command closes the
/// entry with its copy count.
fn summarize(body: &str) -> String {
    let mut out = String::new();

    for line in body.split('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with('P') {
            out.push_str(&trimmed[1..]);
            out.push('\n');
        } else if let Some(first) = line.find('"') {
            let last = line.rfind('"').unwrap_or(first);
            if last > first {
                out.push_str(&line[first + 1..last]);
                out.push('\t');
            }
        }
    }

    out.trim_end_matches('\n').to_string()
}
