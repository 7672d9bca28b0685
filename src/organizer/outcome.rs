//! Per-file outcomes and the run report.

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::error::FileError;

fn error_string<S: Serializer>(error: &FileError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// What happened (or, in a dry run, would happen) to one file.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FileAction {
    /// Moved under its own name
    Moved { destination: PathBuf },
    /// Moved under a new name because the original was taken
    Renamed { destination: PathBuf },
    /// Moved over an existing file
    Overwritten { destination: PathBuf },
    /// Left in place
    Skipped { reason: String },
    /// Attempted and failed; the file stays where it was
    Failed {
        #[serde(serialize_with = "error_string")]
        error: FileError,
    },
}

/// Outcome for a single file.
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub category: String,
    pub size: u64,
    #[serde(flatten)]
    pub action: FileAction,
}

impl FileOutcome {
    /// False only for failures; skips count as success.
    pub fn success(&self) -> bool {
        !matches!(self.action, FileAction::Failed { .. })
    }

    /// Final location of the file, if it was (or would be) relocated.
    pub fn destination(&self) -> Option<&Path> {
        match &self.action {
            FileAction::Moved { destination }
            | FileAction::Renamed { destination }
            | FileAction::Overwritten { destination } => Some(destination),
            FileAction::Skipped { .. } | FileAction::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&FileError> {
        match &self.action {
            FileAction::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// One-line human readable description.
    pub fn message(&self) -> String {
        let source = self.source.display();
        match &self.action {
            FileAction::Moved { destination } => {
                format!("{} -> {}", source, destination.display())
            }
            FileAction::Renamed { destination } => {
                format!("{} -> {} (renamed)", source, destination.display())
            }
            FileAction::Overwritten { destination } => {
                format!("{} -> {} (overwritten)", source, destination.display())
            }
            FileAction::Skipped { reason } => format!("{} skipped: {}", source, reason),
            FileAction::Failed { error } => {
                format!("{} [{}] failed: {}", source, self.category, error)
            }
        }
    }
}

/// Counts over a run's outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrganizeSummary {
    pub moved: usize,
    pub renamed: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Bytes relocated by moves, renames and overwrites
    pub bytes: u64,
}

impl OrganizeSummary {
    /// Files relocated in any way.
    pub fn relocated(&self) -> usize {
        self.moved + self.renamed + self.overwritten
    }
}

/// Result of a whole organize run.
#[derive(Debug, Serialize)]
pub struct OrganizeReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub dry_run: bool,
    pub outcomes: Vec<FileOutcome>,
    /// Run directory holding backup copies, when any were made
    pub backup_dir: Option<PathBuf>,
    /// Entries the scanner could not read
    pub unreadable: usize,
}

impl OrganizeReport {
    pub fn summary(&self) -> OrganizeSummary {
        let mut summary = OrganizeSummary::default();

        for outcome in &self.outcomes {
            match outcome.action {
                FileAction::Moved { .. } => summary.moved += 1,
                FileAction::Renamed { .. } => summary.renamed += 1,
                FileAction::Overwritten { .. } => summary.overwritten += 1,
                FileAction::Skipped { .. } => summary.skipped += 1,
                FileAction::Failed { .. } => summary.failed += 1,
            }
            if outcome.destination().is_some() {
                summary.bytes += outcome.size;
            }
        }

        summary
    }

    /// True iff no file failed.
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.success())
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Run-level message, e.g. `Organized 3 files (1 skipped, 0 failed)`.
    pub fn message(&self) -> String {
        let summary = self.summary();
        let verb = if self.dry_run { "Would organize" } else { "Organized" };
        format!(
            "{} {} file{} ({} skipped, {} failed)",
            verb,
            summary.relocated(),
            if summary.relocated() == 1 { "" } else { "s" },
            summary.skipped,
            summary.failed
        )
    }
}
