//! labelpress - Terminal label template manager for EPL printers
//!
//! Loads text label templates, fills their `<...>` tokens interactively or
//! from a primary data table, and sends the rendered command stream to a
//! label printer or the screen.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Label template records
//! - `engine`: Token scanning and template filling
//! - `storage`: Text file storage layer
//! - `print`: Printer output and the print journal
//!
//! # Example
//!
//! ```rust,ignore
//! use labelpress::config::{paths::LabelPaths, settings::Settings};
//!
//! let paths = LabelPaths::new()?;
//! let settings = Settings::load_or_create(&paths, "labelpress.conf")?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod print;
pub mod storage;

pub use error::LabelError;
