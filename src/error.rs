use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal errors that abort a whole run
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl OrganizerError {
    /// Classify an IO failure on a root path into the matching fatal kind.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => OrganizerError::PathNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => OrganizerError::PermissionDenied(path.to_path_buf()),
            _ => OrganizerError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    TomlParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Per-file errors. These are recorded in the file's outcome and never abort a batch.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to read metadata of '{path}': {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move '{from}' to '{to}': {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to back up '{path}': {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No free name for '{0}' in its destination")]
    Conflict(PathBuf),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, OrganizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ConfigError::Invalid("othersDir must not be empty".into());
        assert!(err.to_string().contains("othersDir"));
    }

    #[test]
    fn error_conversion() {
        let config_err = ConfigError::Invalid("test".into());
        let err: OrganizerError = config_err.into();
        assert!(matches!(err, OrganizerError::Config(_)));
    }

    #[test]
    fn io_kinds_map_to_fatal_variants() {
        let path = Path::new("/missing");
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            OrganizerError::from_io(path, not_found),
            OrganizerError::PathNotFound(_)
        ));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            OrganizerError::from_io(path, denied),
            OrganizerError::PermissionDenied(_)
        ));

        let other = io::Error::new(io::ErrorKind::Other, "boom");
        assert!(matches!(
            OrganizerError::from_io(path, other),
            OrganizerError::Io { .. }
        ));
    }

    #[test]
    fn file_error_mentions_both_paths() {
        let err = FileError::Move {
            from: PathBuf::from("/src/a.txt"),
            to: PathBuf::from("/src/Documents/a.txt"),
            source: io::Error::new(io::ErrorKind::Other, "cross-device link"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/src/a.txt"));
        assert!(msg.contains("Documents"));
        assert!(msg.contains("cross-device"));
    }
}
