use glob::{MatchOptions, Pattern, PatternError};
use std::path::PathBuf;

use super::backup::BackupOptions;
use super::conflict::ConflictAction;
use super::date::DateFormat;

/// How destination folders are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Grouping {
    /// `<dest>/<category>[/<date>]`
    #[default]
    Category,
    /// `<dest>/<date>`
    Date,
}

/// File-name globs selecting which files get organized.
#[derive(Debug, Clone)]
pub struct FileFilter {
    patterns: Vec<Pattern>,
}

impl FileFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Everything matches.
    pub fn any() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Case-insensitive match against a file name. An empty filter matches all.
    pub fn matches(&self, file_name: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };
        self.patterns.is_empty()
            || self
                .patterns
                .iter()
                .any(|p| p.matches_with(file_name, options))
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::any()
    }
}

/// Behavior switches for an organize run.
///
/// The name of the others bucket lives on the
/// [`Classifier`](crate::classifier::Classifier).
#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    /// Compute and report decisions without touching the filesystem
    pub dry_run: bool,

    /// Policy when the destination name is taken
    pub conflict_action: ConflictAction,

    /// Root for category folders (None = the source directory)
    pub destination: Option<PathBuf>,

    /// Folder layout
    pub grouping: Grouping,

    /// Add a date level below each category, from the file's modified time
    pub date_folders: Option<DateFormat>,

    /// Organize files in subdirectories too
    pub recursive: bool,

    /// Create missing destination folders; when false such files are skipped
    pub create_subfolders: bool,

    /// Which file names are eligible
    pub filter: FileFilter,

    /// Take backup copies before moving
    pub backup: Option<BackupOptions>,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            conflict_action: ConflictAction::default(),
            destination: None,
            grouping: Grouping::default(),
            date_folders: None,
            recursive: false,
            create_subfolders: true,
            filter: FileFilter::any(),
            backup: None,
        }
    }
}

impl OrganizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_conflict_action(mut self, action: ConflictAction) -> Self {
        self.conflict_action = action;
        self
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_date_folders(mut self, format: DateFormat) -> Self {
        self.date_folders = Some(format);
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_create_subfolders(mut self, create: bool) -> Self {
        self.create_subfolders = create;
        self
    }

    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_backup(mut self, backup: BackupOptions) -> Self {
        self.backup = Some(backup);
        self
    }
}
