//! Rusty Organizer - sort the files of a directory into category folders
//!
//! This crate provides functionality for:
//! - Walking a directory tree and reporting entry metadata
//! - Mapping file extensions to categories through layered rule tables
//! - Moving files into `<category>/` folders with conflict handling and dry runs

pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod organizer;
pub mod scanner;

// Re-export commonly used types
pub use classifier::Classifier;
pub use config::AppConfig;
pub use error::{OrganizerError, Result};
pub use organizer::{OrganizeOptions, OrganizeReport, Organizer};
pub use scanner::{ScanEntry, Scanner};
