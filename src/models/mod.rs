//! Core data models for labelpress
//!
//! This module contains the data structures representing label templates
//! and the outcome of filling one.

pub mod label_file;

pub use label_file::LabelFile;
