//! Template store
//!
//! Loads label templates either from a directory of template files or from a
//! master data table expanded against a single master template, and writes
//! templates back after a sequence persistence.

use std::fs;
use std::path::Path;

use crate::error::{LabelError, LabelResult};
use crate::models::LabelFile;
use crate::storage::file_io;

/// Loads and saves label templates
pub struct TemplateStore;

impl TemplateStore {
    /// Load every readable file in a directory as a template
    ///
    /// Unreadable entries are skipped rather than failing the whole load.
    /// The optional filter keeps names containing it, case-insensitively.
    /// Results are sorted by name.
    pub fn load_dir(dir: &Path, filter: Option<&str>) -> LabelResult<Vec<LabelFile>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            LabelError::Storage(format!("Failed to read {}: {}", dir.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(LabelFile::new(name, path, content));
        }

        apply_filter(&mut files, filter);
        files.sort();
        Ok(files)
    }

    /// Load a single template file
    pub fn load_file(path: &Path) -> LabelResult<LabelFile> {
        let content = file_io::read_text_required(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(LabelFile::new(name, path.to_path_buf(), content))
    }

    /// Expand a master data table against a master template
    ///
    /// The data file carries a `keys:` header naming the placeholders and
    /// one row per label. Rows starting with `;`, `#` or `─` are comments;
    /// rows whose column count doesn't match the header are skipped. Each
    /// surviving row produces a synthesized template named after its first
    /// column, with every key replaced by the row's value. The optional
    /// filter keeps names containing it, case-insensitively.
    pub fn load_master(
        data_path: &Path,
        template_path: &Path,
        filter: Option<&str>,
    ) -> LabelResult<Vec<LabelFile>> {
        let data = file_io::read_text_required(data_path)?;
        let template = file_io::read_text_required(template_path)?;

        let mut keys: Vec<String> = Vec::new();
        let mut files = Vec::new();

        for line in data.lines() {
            if line.is_empty()
                || line.starts_with(';')
                || line.starts_with('#')
                || line.starts_with('─')
            {
                continue;
            }

            if line.starts_with("keys") {
                if let Some(separator) = line.find(':') {
                    keys = split_quoted(line[separator + 1..].trim());
                }
                continue;
            }

            let values = split_quoted(line);
            if keys.is_empty() || values.len() != keys.len() {
                continue;
            }

            let mut body = template.clone();
            for (key, value) in keys.iter().zip(&values) {
                body = body.replace(key.as_str(), value);
            }
            files.push(LabelFile::with_template(values[0].clone(), body));
        }

        apply_filter(&mut files, filter);
        Ok(files)
    }

    /// Write a template back to its backing file
    pub fn save(file: &LabelFile) -> LabelResult<()> {
        if file.path.as_os_str().is_empty() {
            return Err(LabelError::Storage(format!(
                "Template '{}' has no backing file",
                file.name
            )));
        }
        file_io::write_text_atomic(&file.path, &file.template)
    }
}

/// Keep only records whose name contains the filter, case-insensitively
fn apply_filter(files: &mut Vec<LabelFile>, filter: Option<&str>) {
    if let Some(filter) = filter {
        let needle = filter.to_lowercase();
        files.retain(|f| f.name.to_lowercase().contains(&needle));
    }
}

/// Split a row on whitespace, keeping double-quoted segments together
///
/// Quotes are stripped from the resulting columns.
fn split_quoted(line: &str) -> Vec<String> {
    let mut columns = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    columns.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        columns.push(current);
    }

    columns
}
