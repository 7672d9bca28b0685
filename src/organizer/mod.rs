//! Organizing engine.
//!
//! This module provides:
//! - Conflict policies for names already taken at the destination
//! - Optional date sub-folders and backup copies
//! - The [`Organizer`] that applies classification decisions to the filesystem

mod backup;
mod conflict;
mod date;
mod engine;
mod options;
mod outcome;

pub use backup::{prune as prune_backups, BackupOptions, BackupSession};
pub use conflict::{resolve as resolve_conflict, ConflictAction, Resolution};
pub use date::DateFormat;
pub use engine::Organizer;
pub use options::{FileFilter, Grouping, OrganizeOptions};
pub use outcome::{FileAction, FileOutcome, OrganizeReport, OrganizeSummary};
