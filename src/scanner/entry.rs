use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Metadata record for one filesystem entry found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Path of the entry, prefixed by the scan root as given
    pub path: PathBuf,

    /// True if this is a directory
    pub is_dir: bool,

    /// True if the entry itself is a symbolic link
    pub is_symlink: bool,

    /// Size in bytes (0 for directories on most filesystems)
    pub size: u64,

    /// Last modification time, when the platform reports one
    pub modified: Option<SystemTime>,

    /// Depth below the scan root (1 = immediate child)
    pub depth: usize,
}

impl ScanEntry {
    pub fn from_metadata(path: PathBuf, metadata: &Metadata, depth: usize) -> Self {
        let file_type = metadata.file_type();
        Self {
            path,
            is_dir: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
            depth,
        }
    }

    /// A regular file: not a directory and not a symlink.
    pub fn is_file(&self) -> bool {
        !self.is_dir && !self.is_symlink
    }

    /// Last path component.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path relative to `root`, or the full path if it isn't below it.
    pub fn relative_to<'a>(&'a self, root: &Path) -> &'a Path {
        self.path.strip_prefix(root).unwrap_or(&self.path)
    }
}
