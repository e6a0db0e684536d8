//! Path management for labelpress
//!
//! Provides platform-aware path resolution for the configuration directory.
//!
//! ## Path Resolution Order
//!
//! 1. `LABELPRESS_CONFIG_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/labelpress` or `~/.config/labelpress`
//! 3. Windows: `%APPDATA%\labelpress`

use std::path::PathBuf;

use crate::error::LabelError;

/// Manages all paths used by labelpress
#[derive(Debug, Clone)]
pub struct LabelPaths {
    /// Base directory for configuration and default template storage
    base_dir: PathBuf,
}

impl LabelPaths {
    /// Create a new LabelPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, LabelError> {
        let base_dir = if let Ok(custom) = std::env::var("LABELPRESS_CONFIG_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LabelPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/labelpress/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to a named configuration file inside the base directory
    pub fn config_file(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// The default directory for template files (same as base)
    pub fn default_templates_dir(&self) -> PathBuf {
        self.base_dir.clone()
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), LabelError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LabelError::Io(format!("Failed to create config directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default config directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LabelError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("labelpress"))
}

/// Resolve the default config directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LabelError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LabelError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("labelpress"))
}
