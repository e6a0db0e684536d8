//! Template storage
//!
//! Plain-text file operations with atomic writes and the template store
//! loading label files from a directory or from a master data table.

pub mod file_io;
pub mod templates;

pub use templates::TemplateStore;
