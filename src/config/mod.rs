//! Configuration module for labelpress
//!
//! This module provides configuration management including:
//! - Platform-aware config directory resolution
//! - Flat `key: value` settings file parsing and persistence

pub mod paths;
pub mod settings;

pub use paths::LabelPaths;
pub use settings::{PrinterType, Settings};
