//! Label template records
//!
//! A [`LabelFile`] owns one template: its name, where it came from, the
//! template source, and the rendered body of the most recent fill.

use std::cmp::Ordering;
use std::path::PathBuf;

use crate::engine::FillOutcome;

/// One label template and its most recent rendering
#[derive(Debug, Clone)]
pub struct LabelFile {
    /// Display name, usually the file name
    pub name: String,
    /// Where the template is stored; empty for synthesized records
    pub path: PathBuf,
    /// The template source as loaded from disk
    pub template: String,
    /// The rendered body of the last fill (empty until filled)
    pub body: String,
    /// Whether the last fill produced a body that should be emitted
    pub print: bool,
}

impl LabelFile {
    /// Create a label file backed by a file on disk
    pub fn new(name: impl Into<String>, path: PathBuf, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path,
            template: template.into(),
            body: String::new(),
            print: true,
        }
    }

    /// Create a synthesized record with no backing file (master mode)
    pub fn with_template(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self::new(name, PathBuf::new(), template)
    }

    /// Apply the outcome of a fill to this record
    ///
    /// Replaces the rendered body and print flag, and swaps in the updated
    /// template source when the fill carried a sequence persistence. Returns
    /// true if the template changed and should be written back to storage.
    pub fn apply(&mut self, outcome: FillOutcome) -> bool {
        self.body = outcome.body;
        self.print = outcome.should_print;

        match outcome.updated_template {
            Some(template) => {
                self.template = template;
                true
            }
            None => false,
        }
    }
}

impl PartialEq for LabelFile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for LabelFile {}

impl PartialOrd for LabelFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LabelFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl std::fmt::Display for LabelFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
