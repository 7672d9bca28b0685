//! Safety copies of files taken before they are moved or overwritten.

use chrono::{Local, NaiveDateTime};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::FileError;

/// Run directory name format, optionally followed by `-<n>`.
const RUN_STAMP: &str = "%Y%m%dT%H%M%S%.3f";

/// Backup settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOptions {
    /// Directory holding one subdirectory per run
    pub dir: PathBuf,
    /// Number of run directories kept after pruning
    pub keep_count: usize,
    /// Write gzip copies with a `.gz` suffix
    pub compress: bool,
}

/// Backup target for a single run. Nothing is created on disk until the
/// first file is copied.
#[derive(Debug)]
pub struct BackupSession {
    run_dir: PathBuf,
    compress: bool,
    copies: usize,
}

impl BackupSession {
    pub fn new(options: &BackupOptions) -> Self {
        let stamp = Local::now().format(RUN_STAMP).to_string();
        let mut run_dir = options.dir.join(&stamp);
        let mut n = 1;
        while run_dir.exists() {
            run_dir = options.dir.join(format!("{}-{}", stamp, n));
            n += 1;
        }

        Self {
            run_dir,
            compress: options.compress,
            copies: 0,
        }
    }

    /// Copy `file` to `<run dir>/<relative>`, gzip-compressed if configured.
    pub fn backup(&mut self, file: &Path, relative: &Path) -> Result<PathBuf, FileError> {
        let mut target = self.run_dir.join(relative);
        if self.compress {
            let mut name = target.clone().into_os_string();
            name.push(".gz");
            target = PathBuf::from(name);
        }

        let to_backup_error = |source: io::Error| FileError::Backup {
            path: file.to_path_buf(),
            source,
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(to_backup_error)?;
        }

        if self.compress {
            let mut reader = BufReader::new(File::open(file).map_err(to_backup_error)?);
            let writer = BufWriter::new(File::create(&target).map_err(to_backup_error)?);
            let mut encoder = GzEncoder::new(writer, Compression::default());
            io::copy(&mut reader, &mut encoder).map_err(to_backup_error)?;
            let mut writer = encoder.finish().map_err(to_backup_error)?;
            writer.flush().map_err(to_backup_error)?;
        } else {
            fs::copy(file, &target).map_err(to_backup_error)?;
        }

        self.copies += 1;
        tracing::debug!(file = %file.display(), backup = %target.display(), "Backed up file");
        Ok(target)
    }

    /// Run directory, if anything was copied into it.
    pub fn run_dir(&self) -> Option<&Path> {
        (self.copies > 0).then_some(self.run_dir.as_path())
    }

    pub fn copies(&self) -> usize {
        self.copies
    }
}

/// Whether `name` was written by [`BackupSession::new`].
fn is_run_dir_name(name: &str) -> bool {
    let stamp = match name.split_once('-') {
        Some((stamp, n)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => stamp,
        Some(_) => return false,
        None => name,
    };
    NaiveDateTime::parse_from_str(stamp, RUN_STAMP).is_ok()
}

/// Delete the oldest run directories in `dir` so at most `keep` remain.
///
/// Only directories named like a run stamp count; anything else in `dir` is
/// left alone. Run names sort in age order.
pub fn prune(dir: &Path, keep: usize) -> io::Result<Vec<PathBuf>> {
    let mut runs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|e| is_run_dir_name(&e.file_name().to_string_lossy()))
        .map(|e| e.path())
        .collect();

    if runs.len() <= keep {
        return Ok(Vec::new());
    }

    runs.sort();
    let excess = runs.len() - keep;
    let removed: Vec<PathBuf> = runs.into_iter().take(excess).collect();
    for run in &removed {
        fs::remove_dir_all(run)?;
        tracing::info!(path = %run.display(), "Pruned old backup");
    }

    Ok(removed)
}
