//! Destination collision handling.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::FileError;

/// Highest numeric suffix tried before a rename gives up.
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// What to do when the destination already holds a file of the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    /// Move under a free name such as `report_1.txt`
    #[default]
    Rename,
    /// Leave the source file where it is
    Skip,
    /// Replace the existing destination file
    Overwrite,
}

impl ConflictAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictAction::Rename => "rename",
            ConflictAction::Skip => "skip",
            ConflictAction::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for ConflictAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rename" => Ok(ConflictAction::Rename),
            "skip" => Ok(ConflictAction::Skip),
            "overwrite" => Ok(ConflictAction::Overwrite),
            other => Err(format!(
                "unknown conflict action '{}' (expected rename, skip or overwrite)",
                other
            )),
        }
    }
}

/// Where a file will end up once its conflict policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing in the way
    Clear(PathBuf),
    /// Original name taken; use this one instead
    Rename(PathBuf),
    /// Existing file at this path gets replaced
    Overwrite(PathBuf),
    /// Leave the file alone; the path is the existing occupant
    Skip(PathBuf),
}

fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// `report.txt` -> `report_3.txt`
fn numbered_name(file_name: &OsStr, n: u32) -> PathBuf {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match path.extension() {
        Some(ext) => PathBuf::from(format!("{}_{}.{}", stem, n, ext.to_string_lossy())),
        None => PathBuf::from(format!("{}_{}", stem, n)),
    }
}

/// Decide the final destination of `file_name` inside `dest_dir`.
///
/// Only inspects the filesystem, never modifies it, so dry runs resolve
/// conflicts exactly as a real run would.
pub fn resolve(
    dest_dir: &Path,
    file_name: &OsStr,
    action: ConflictAction,
) -> Result<Resolution, FileError> {
    let target = dest_dir.join(file_name);
    if !occupied(&target) {
        return Ok(Resolution::Clear(target));
    }

    match action {
        ConflictAction::Skip => Ok(Resolution::Skip(target)),
        ConflictAction::Overwrite => {
            if target.is_dir() {
                return Err(FileError::Move {
                    from: PathBuf::from(file_name),
                    to: target,
                    source: io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "destination is a directory",
                    ),
                });
            }
            Ok(Resolution::Overwrite(target))
        }
        ConflictAction::Rename => (1..=MAX_RENAME_ATTEMPTS)
            .map(|n| dest_dir.join(numbered_name(file_name, n)))
            .find(|candidate| !occupied(candidate))
            .map(Resolution::Rename)
            .ok_or(FileError::Conflict(target)),
    }
}
