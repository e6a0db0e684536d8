//! Primary data table
//!
//! An ordered, case-insensitive key/value table loaded once per engine
//! instance from a flat `key: value` text source. Read-only during a fill.

use std::path::Path;

use crate::error::{LabelError, LabelResult};

/// The static key/value table supplying most token replacements
#[derive(Debug, Clone, Default)]
pub struct PrimaryData {
    entries: Vec<(String, String)>,
}

impl PrimaryData {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from file content
    ///
    /// One entry per line, `key: value`. Lines starting with `#` and lines
    /// without a separator are skipped. The first occurrence of a key wins.
    pub fn parse(content: &str) -> Self {
        let mut data = Self::new();

        for line in content.lines() {
            if line.starts_with('#') {
                continue;
            }
            let Some(separator) = line.find(':') else {
                continue;
            };
            if separator == 0 {
                continue;
            }
            let key = line[..separator].trim();
            let value = line[separator + 1..].trim();
            if data.lookup(key).is_none() {
                data.entries.push((key.to_string(), value.to_string()));
            }
        }

        data
    }

    /// Load a table from a file
    pub fn from_file(path: impl AsRef<Path>) -> LabelResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LabelError::Io(format!("Failed to read primary data {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&content))
    }

    /// Look up a value by key, case-insensitively
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let wanted = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
