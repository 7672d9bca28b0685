use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{FileError, OrganizerError, Result};

use super::entry::ScanEntry;
use super::options::ScanOptions;

/// Lazy depth-first walk below a root directory.
///
/// Parents are yielded before their children; the root itself is not
/// yielded. An entry that can't be read (vanished between listing and stat,
/// unreadable subdirectory) is logged, recorded in [`Scanner::errors`] and
/// passed over without ending the walk.
pub struct Scanner {
    root: PathBuf,
    inner: walkdir::IntoIter,
    skip_hidden: bool,
    errors: Vec<FileError>,
}

impl Scanner {
    /// Start a scan of `root`.
    ///
    /// Fails up front if the root is missing, not a directory or unreadable.
    pub fn new(root: &Path, options: &ScanOptions) -> Result<Self> {
        let metadata = fs::metadata(root).map_err(|e| OrganizerError::from_io(root, e))?;
        if !metadata.is_dir() {
            return Err(OrganizerError::NotADirectory(root.to_path_buf()));
        }
        // Opening the listing surfaces permission problems before any entry is produced
        fs::read_dir(root).map_err(|e| OrganizerError::from_io(root, e))?;

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(options.follow_symlinks);

        if let Some(depth) = options.max_depth {
            walker = walker.max_depth(depth);
        }

        Ok(Self {
            root: root.to_path_buf(),
            inner: walker.into_iter(),
            skip_hidden: options.skip_hidden,
            errors: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of entries passed over because of read errors so far.
    pub fn skipped(&self) -> usize {
        self.errors.len()
    }

    /// Causes of the entries passed over so far.
    pub fn errors(&self) -> &[FileError] {
        &self.errors
    }

    fn record(&mut self, path: Option<PathBuf>, err: walkdir::Error) {
        let error = FileError::Stat {
            path: path.unwrap_or_else(|| self.root.clone()),
            source: err.into(),
        };
        tracing::warn!(error = %error, "Skipping unreadable entry");
        self.errors.push(error);
    }
}

impl Iterator for Scanner {
    type Item = ScanEntry;

    fn next(&mut self) -> Option<ScanEntry> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.record(err.path().map(Path::to_path_buf), err);
                    continue;
                }
            };

            if self.skip_hidden && entry.file_name().to_string_lossy().starts_with('.') {
                if entry.file_type().is_dir() {
                    self.inner.skip_current_dir();
                }
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    self.record(Some(entry.path().to_path_buf()), err);
                    continue;
                }
            };

            let depth = entry.depth();
            return Some(ScanEntry::from_metadata(entry.into_path(), &metadata, depth));
        }
    }
}

/// Scan a directory tree and collect every entry below it.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> Result<Vec<ScanEntry>> {
    let mut scanner = Scanner::new(root, options)?;
    let entries: Vec<ScanEntry> = scanner.by_ref().collect();

    tracing::debug!(
        root = %root.display(),
        entries = entries.len(),
        skipped = scanner.skipped(),
        "Scan finished"
    );

    Ok(entries)
}
