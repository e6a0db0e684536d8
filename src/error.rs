//! Custom error types for labelpress
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for labelpress operations
#[derive(Error, Debug)]
pub enum LabelError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Template storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Malformed token or directive inside a template
    #[error("Template format error: {0}")]
    TokenFormat(String),

    /// Printer transmission errors
    #[error("Print error: {0}")]
    Print(String),

    /// Missing file errors
    #[error("File not found: {0}")]
    NotFound(String),
}

impl LabelError {
    /// Create a format error for a malformed token
    pub fn bad_token(token: impl AsRef<str>, expected: &str) -> Self {
        Self::TokenFormat(format!(
            "invalid token {}, expected {}",
            token.as_ref(),
            expected
        ))
    }

    /// Check if this is a template format error
    pub fn is_token_format(&self) -> bool {
        matches!(self, Self::TokenFormat(_))
    }
}

impl From<std::io::Error> for LabelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for labelpress operations
pub type LabelResult<T> = Result<T, LabelError>;
