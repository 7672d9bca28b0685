//! The move engine: classify, resolve, back up, relocate.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::classifier::Classifier;
use crate::error::{FileError, Result};
use crate::scanner::{ScanEntry, ScanOptions, Scanner};

use super::backup::{self, BackupSession};
use super::conflict::{self, Resolution};
use super::date::DateFormat;
use super::options::{Grouping, OrganizeOptions};
use super::outcome::{FileAction, FileOutcome, OrganizeReport};

/// Sorts the files of a directory into category folders.
///
/// Files are handled one after another; each file's destination folder is
/// created (idempotently) right before its move. A failure on one file is
/// recorded in its outcome and the run carries on with the next.
pub struct Organizer {
    classifier: Classifier,
    options: OrganizeOptions,
}

impl Organizer {
    pub fn new(classifier: Classifier, options: OrganizeOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn options(&self) -> &OrganizeOptions {
        &self.options
    }

    /// Organize `source`.
    ///
    /// Fails only if `source` itself can't be listed; everything else ends up
    /// in the per-file outcomes of the report.
    pub fn organize(&self, source: &Path) -> Result<OrganizeReport> {
        self.organize_with(source, |_| {})
    }

    /// Like [`organize`](Self::organize), calling `on_file` after each file is handled.
    pub fn organize_with<F>(&self, source: &Path, mut on_file: F) -> Result<OrganizeReport>
    where
        F: FnMut(&FileOutcome),
    {
        let scan_options = if self.options.recursive {
            ScanOptions::new()
        } else {
            ScanOptions::top_level()
        };
        let mut scanner = Scanner::new(source, &scan_options)?;

        let destination = self
            .options
            .destination
            .clone()
            .unwrap_or_else(|| source.to_path_buf());
        let reserved = self.reserved_dirs(source, &destination);
        let mut backups = self.options.backup.as_ref().map(BackupSession::new);

        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            dry_run = self.options.dry_run,
            recursive = self.options.recursive,
            "Organizing directory"
        );

        // A recursive walk is collected before anything moves, since moves
        // rewrite the subtrees being walked. Top-level entries stream
        // straight from the scanner; `chain` picks up whatever it has left.
        let collected: Vec<ScanEntry> = if self.options.recursive {
            scanner.by_ref().collect()
        } else {
            Vec::new()
        };
        let entries = collected.into_iter().chain(&mut scanner);

        let mut outcomes = Vec::new();
        for entry in entries {
            if !entry.is_file() {
                if entry.is_symlink {
                    tracing::debug!(path = %entry.path.display(), "Skipping symlink");
                }
                continue;
            }
            if self.is_reserved(source, &entry, &reserved) {
                continue;
            }
            if !self.options.filter.matches(&entry.name()) {
                tracing::debug!(path = %entry.path.display(), "Filtered out");
                continue;
            }

            if let Some(outcome) = self.organize_file(source, &destination, &entry, &mut backups) {
                on_file(&outcome);
                outcomes.push(outcome);
            }
        }

        let backup_dir = backups
            .as_ref()
            .and_then(|session| session.run_dir().map(Path::to_path_buf));
        if let (Some(options), Some(_)) = (&self.options.backup, &backup_dir) {
            if let Err(e) = backup::prune(&options.dir, options.keep_count) {
                tracing::warn!(dir = %options.dir.display(), error = %e, "Failed to prune backups");
            }
        }

        let report = OrganizeReport {
            source: source.to_path_buf(),
            destination,
            dry_run: self.options.dry_run,
            outcomes,
            backup_dir,
            unreadable: scanner.skipped(),
        };

        tracing::info!(result = %report.message(), "Organize run finished");
        Ok(report)
    }

    /// Top-level folder names under `source` that hold organized output.
    ///
    /// Only relevant for recursive runs into the source itself; they are
    /// passed over so a second run leaves them alone.
    fn reserved_dirs(&self, source: &Path, destination: &Path) -> HashSet<String> {
        let mut reserved = HashSet::new();
        if self.options.recursive
            && destination == source
            && self.options.grouping == Grouping::Category
        {
            reserved.extend(self.classifier.category_names().map(str::to_string));
        }
        reserved
    }

    fn is_reserved(&self, source: &Path, entry: &ScanEntry, reserved: &HashSet<String>) -> bool {
        if let Some(options) = &self.options.backup {
            if entry.path.starts_with(&options.dir) {
                return true;
            }
        }
        if entry.depth < 2 || reserved.is_empty() {
            return false;
        }
        match entry.relative_to(source).components().next() {
            Some(Component::Normal(top)) => reserved.contains(top.to_string_lossy().as_ref()),
            _ => false,
        }
    }

    /// Destination folder and category label for one file.
    fn target_dir(&self, destination: &Path, entry: &ScanEntry) -> (PathBuf, String) {
        let date_bucket = |format: &DateFormat| entry.modified.map(|t| format.bucket(t));

        match self.options.grouping {
            Grouping::Category => {
                let category = self.classifier.classify(&entry.name()).to_string();
                let mut dir = destination.join(&category);
                if let Some(bucket) = self.options.date_folders.as_ref().and_then(date_bucket) {
                    dir.push(bucket);
                }
                (dir, category)
            }
            Grouping::Date => {
                let format = self.options.date_folders.clone().unwrap_or_default();
                match date_bucket(&format) {
                    Some(bucket) => (destination.join(&bucket), bucket),
                    None => {
                        let others = self.classifier.others_dir().to_string();
                        (destination.join(&others), others)
                    }
                }
            }
        }
    }

    /// Handle one file. `None` means the file is already where it belongs.
    fn organize_file(
        &self,
        source: &Path,
        destination: &Path,
        entry: &ScanEntry,
        backups: &mut Option<BackupSession>,
    ) -> Option<FileOutcome> {
        let (dest_dir, category) = self.target_dir(destination, entry);
        if entry.path.parent() == Some(dest_dir.as_path()) {
            return None;
        }

        let outcome = |action: FileAction| FileOutcome {
            source: entry.path.clone(),
            category: category.clone(),
            size: entry.size,
            action,
        };
        let failed = |error: FileError| {
            tracing::warn!(
                path = %entry.path.display(),
                category = %category,
                error = %error,
                "Failed to organize file"
            );
            outcome(FileAction::Failed { error })
        };

        if !self.options.create_subfolders && !dest_dir.is_dir() {
            return Some(outcome(FileAction::Skipped {
                reason: format!("destination folder '{}' does not exist", dest_dir.display()),
            }));
        }

        let file_name = entry.path.file_name()?;
        let resolution = match conflict::resolve(&dest_dir, file_name, self.options.conflict_action) {
            Ok(resolution) => resolution,
            Err(e) => return Some(failed(e)),
        };

        let (target, action) = match resolution {
            Resolution::Skip(existing) => {
                tracing::debug!(path = %entry.path.display(), existing = %existing.display(), "Skipping conflict");
                return Some(outcome(FileAction::Skipped {
                    reason: format!("'{}' already exists", existing.display()),
                }));
            }
            Resolution::Clear(target) => (target.clone(), FileAction::Moved { destination: target }),
            Resolution::Rename(target) => (target.clone(), FileAction::Renamed { destination: target }),
            Resolution::Overwrite(target) => {
                (target.clone(), FileAction::Overwritten { destination: target })
            }
        };

        if self.options.dry_run {
            tracing::info!(path = %entry.path.display(), target = %target.display(), "Would move file");
            return Some(outcome(action));
        }

        if let Err(e) = self.relocate(source, destination, entry, &dest_dir, &target, &action, backups) {
            return Some(failed(e));
        }

        tracing::info!(path = %entry.path.display(), target = %target.display(), "Moved file");
        Some(outcome(action))
    }

    #[allow(clippy::too_many_arguments)]
    fn relocate(
        &self,
        source: &Path,
        destination: &Path,
        entry: &ScanEntry,
        dest_dir: &Path,
        target: &Path,
        action: &FileAction,
        backups: &mut Option<BackupSession>,
    ) -> std::result::Result<(), FileError> {
        fs::create_dir_all(dest_dir).map_err(|e| FileError::CreateDir {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let overwriting = matches!(action, FileAction::Overwritten { .. });

        if let Some(session) = backups.as_mut() {
            session.backup(&entry.path, entry.relative_to(source))?;
            if overwriting {
                let replaced = target.strip_prefix(destination).unwrap_or(target);
                session.backup(target, &Path::new("overwritten").join(replaced))?;
            }
        }

        // Replaces an existing target in place; a failed move leaves it untouched
        fs::rename(&entry.path, target).map_err(|e| FileError::Move {
            from: entry.path.clone(),
            to: target.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organizer::{ConflictAction, DateFormat, FileFilter};
    use tempfile::TempDir;

    fn organizer(options: OrganizeOptions) -> Organizer {
        Organizer::new(Classifier::with_defaults(), options)
    }

    #[test]
    fn test_example_scenario() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("photo.jpg"), "img").unwrap();
        fs::write(root.join("notes.pdf"), "pdf").unwrap();
        fs::write(root.join("script.sh"), "sh").unwrap();

        let report = organizer(OrganizeOptions::default()).organize(root).unwrap();

        assert!(report.success());
        assert_eq!(report.summary().moved, 3);
        assert!(root.join("Images/photo.jpg").exists());
        assert!(root.join("Documents/notes.pdf").exists());
        assert!(root.join("others/script.sh").exists());
        assert!(!root.join("photo.jpg").exists());
    }

    #[test]
    fn test_target_dir_with_date_folders() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("photo.png");
        fs::write(&file, "x").unwrap();
        let metadata = fs::symlink_metadata(&file).unwrap();
        let entry = ScanEntry::from_metadata(file, &metadata, 1);

        let org = organizer(OrganizeOptions::new().with_date_folders(DateFormat::new("YYYY")));
        let (dir, category) = org.target_dir(tmp.path(), &entry);

        assert_eq!(category, "Images");
        assert_eq!(dir.parent().unwrap(), tmp.path().join("Images"));
        assert_eq!(dir.file_name().unwrap().len(), 4);
    }

    #[test]
    fn test_reserved_dirs_only_for_recursive_in_place() {
        let tmp = TempDir::new().unwrap();
        let top = organizer(OrganizeOptions::default());
        assert!(top.reserved_dirs(tmp.path(), tmp.path()).is_empty());

        let rec = organizer(OrganizeOptions::new().with_recursive(true));
        let reserved = rec.reserved_dirs(tmp.path(), tmp.path());
        assert!(reserved.contains("Images"));
        assert!(reserved.contains("others"));

        let elsewhere = rec.reserved_dirs(tmp.path(), Path::new("/elsewhere"));
        assert!(elsewhere.is_empty());
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        // A plain file where the Images folder should go makes that move fail
        fs::write(root.join("Images"), "in the way").unwrap();
        fs::write(root.join("a.jpg"), "img").unwrap();
        fs::write(root.join("b.pdf"), "pdf").unwrap();

        let options = OrganizeOptions::new()
            .with_conflict_action(ConflictAction::Skip)
            .with_filter(FileFilter::new(&["*.*"]).unwrap());
        let report = organizer(options).organize(root).unwrap();

        let summary = report.summary();
        assert_eq!(summary.failed, 1);
        assert!(!report.success());
        assert!(root.join("a.jpg").exists());
        assert!(root.join("Documents/b.pdf").exists());
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.category, "Images");
        assert!(matches!(failure.error(), Some(FileError::CreateDir { .. })));
    }

    #[test]
    fn test_failed_overwrite_keeps_existing_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("Documents")).unwrap();
        fs::write(root.join("Documents/report.txt"), "old").unwrap();

        // The incoming file vanishes after it was scanned, so the move fails
        let file = root.join("report.txt");
        fs::write(&file, "new").unwrap();
        let metadata = fs::symlink_metadata(&file).unwrap();
        let entry = ScanEntry::from_metadata(file.clone(), &metadata, 1);
        fs::remove_file(&file).unwrap();

        let org = organizer(OrganizeOptions::new().with_conflict_action(ConflictAction::Overwrite));
        let outcome = org.organize_file(root, root, &entry, &mut None).unwrap();

        assert!(matches!(outcome.error(), Some(FileError::Move { .. })));
        assert_eq!(
            fs::read_to_string(root.join("Documents/report.txt")).unwrap(),
            "old"
        );
    }
}
