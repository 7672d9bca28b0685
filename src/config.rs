use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::classifier::{normalize_extension, Classifier, RuleTable, DEFAULT_OTHERS_DIR};
use crate::error::ConfigError;
use crate::organizer::{
    BackupOptions, ConflictAction, DateFormat, FileFilter, Grouping, OrganizeOptions,
};

const APP_DIR: &str = "rusty-organizer";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub version: String,
    pub paths: PathsConfig,
    /// Category name -> extensions. Replaces a built-in category of the same name.
    pub rules: BTreeMap<String, Vec<String>>,
    pub organizing: OrganizingConfig,
    pub backup: BackupConfig,
    /// Directory organized when none is given on the command line
    pub source_path: String,
    /// Root for category folders (empty = the source directory)
    pub destination_path: String,
    /// File-name globs eligible for organizing
    pub file_types: Vec<String>,
    pub organize_by: OrganizeBy,
    /// Create missing category folders
    pub create_subfolders: bool,
    pub supported_file_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub root: String,
    pub working: String,
    pub backup: String,
    /// Log file appended to in addition to stderr (empty = none)
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizingConfig {
    pub create_date_folders: bool,
    /// Tokens: YYYY YY MM DD HH mm ss
    pub date_format: String,
    pub preserve_names: bool,
    pub conflict_action: ConflictAction,
    /// Category for files no rule matches
    pub others_dir: String,
    pub dry_run: bool,
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackupConfig {
    pub enabled: bool,
    pub keep_count: usize,
    pub compress: bool,
}

/// Folder layout selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizeBy {
    #[default]
    Extension,
    Date,
    Size,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            paths: PathsConfig::default(),
            rules: BTreeMap::new(),
            organizing: OrganizingConfig::default(),
            backup: BackupConfig::default(),
            source_path: String::new(),
            destination_path: String::new(),
            file_types: vec!["*".to_string()],
            organize_by: OrganizeBy::default(),
            create_subfolders: true,
            supported_file_types: vec![
                ".jpg".to_string(),
                ".jpeg".to_string(),
                ".png".to_string(),
                ".pdf".to_string(),
                ".doc".to_string(),
                ".docx".to_string(),
            ],
        }
    }
}

impl Default for OrganizingConfig {
    fn default() -> Self {
        Self {
            create_date_folders: false,
            date_format: "YYYY-MM-DD".to_string(),
            preserve_names: true,
            conflict_action: ConflictAction::Rename,
            others_dir: DEFAULT_OTHERS_DIR.to_string(),
            dry_run: false,
            recursive: false,
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            keep_count: 5,
            compress: true,
        }
    }
}

fn non_empty(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

/// A single, ordinary path component: no separators, not `.` or `..`.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

impl AppConfig {
    /// Default config file location: `<config dir>/rusty-organizer/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// Load from `path`, or from [`default_path`](Self::default_path) when `None`.
    ///
    /// A missing file yields the defaults. Malformed or invalid content is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => {
                tracing::info!("No config directory available, using default configuration");
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using default configuration");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let config = Self::parse(&path, &content)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse content as TOML for `.toml` paths, JSON otherwise.
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
                path: path.to_path_buf(),
                source: e,
            })
        } else {
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    /// Write as pretty JSON, replacing the file atomically.
    ///
    /// An existing file is first copied to `<path>.backup`.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;

        let write_error = |source| ConfigError::WriteError {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        if path.exists() {
            let backup = with_suffix(path, ".backup");
            if let Err(e) = fs::copy(path, &backup) {
                tracing::warn!(path = %backup.display(), error = %e, "Failed to create config backup");
            }
        }

        let temp = with_suffix(path, ".temp");
        fs::write(&temp, json).map_err(write_error)?;
        fs::rename(&temp, path).map_err(write_error)?;

        tracing::info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Check the configuration before it reaches the organizer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::Invalid("version must not be empty".into()));
        }

        if !is_plain_name(&self.organizing.others_dir) {
            return Err(ConfigError::Invalid(format!(
                "organizing.othersDir '{}' must be a single folder name",
                self.organizing.others_dir
            )));
        }

        for (category, extensions) in &self.rules {
            if !is_plain_name(category) {
                return Err(ConfigError::Invalid(format!(
                    "rule category '{}' must be a single folder name",
                    category
                )));
            }
            for ext in extensions {
                let normalized = normalize_extension(ext);
                if normalized.is_empty() || normalized.contains(['.', '/', '\\']) {
                    return Err(ConfigError::Invalid(format!(
                        "rule '{}' has invalid extension '{}'",
                        category, ext
                    )));
                }
            }
        }

        let uses_dates =
            self.organizing.create_date_folders || self.organize_by == OrganizeBy::Date;
        if uses_dates && self.organizing.date_format.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "organizing.dateFormat must not be empty when date folders are used".into(),
            ));
        }
        if !self.organizing.date_format.is_empty()
            && !DateFormat::new(&self.organizing.date_format).is_contained()
        {
            return Err(ConfigError::Invalid(format!(
                "organizing.dateFormat '{}' must stay inside the destination folder",
                self.organizing.date_format
            )));
        }

        if self.backup.enabled && self.backup.keep_count == 0 {
            return Err(ConfigError::Invalid(
                "backup.keepCount must be at least 1".into(),
            ));
        }

        if let Err(e) = FileFilter::new(&self.file_types) {
            return Err(ConfigError::Invalid(format!("fileTypes: {}", e)));
        }

        if self.organize_by == OrganizeBy::Size {
            return Err(ConfigError::Invalid(
                "organizeBy 'size' is not supported (use 'extension' or 'date')".into(),
            ));
        }

        Ok(())
    }

    /// Built-in rules with this configuration's rules applied on top.
    pub fn rule_table(&self) -> RuleTable {
        RuleTable::with_user_rules(&self.rules)
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.rule_table(), self.organizing.others_dir.clone())
    }

    /// Directory to organize when none is given: `sourcePath`, then `paths.root`.
    pub fn source_dir(&self) -> Option<PathBuf> {
        non_empty(&self.source_path).or_else(|| non_empty(&self.paths.root))
    }

    pub fn destination_dir(&self) -> Option<PathBuf> {
        non_empty(&self.destination_path)
    }

    /// `paths.backup`, else `<data dir>/rusty-organizer/backups`.
    pub fn backup_dir(&self) -> PathBuf {
        non_empty(&self.paths.backup).unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("backups")
        })
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        non_empty(&self.paths.log)
    }

    /// Organizer switches derived from this configuration.
    pub fn organize_options(&self) -> Result<OrganizeOptions, ConfigError> {
        let filter = FileFilter::new(&self.file_types)
            .map_err(|e| ConfigError::Invalid(format!("fileTypes: {}", e)))?;

        let grouping = match self.organize_by {
            OrganizeBy::Extension => Grouping::Category,
            OrganizeBy::Date => Grouping::Date,
            OrganizeBy::Size => {
                return Err(ConfigError::Invalid(
                    "organizeBy 'size' is not supported".into(),
                ))
            }
        };

        let mut options = OrganizeOptions::new()
            .with_dry_run(self.organizing.dry_run)
            .with_conflict_action(self.organizing.conflict_action)
            .with_grouping(grouping)
            .with_recursive(self.organizing.recursive)
            .with_create_subfolders(self.create_subfolders)
            .with_filter(filter);

        if self.organizing.create_date_folders || grouping == Grouping::Date {
            options = options.with_date_folders(DateFormat::new(&self.organizing.date_format));
        }
        if let Some(dest) = self.destination_dir() {
            options = options.with_destination(dest);
        }
        if self.backup.enabled {
            options = options.with_backup(BackupOptions {
                dir: self.backup_dir(),
                keep_count: self.backup.keep_count,
                compress: self.backup.compress,
            });
        }

        Ok(options)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.organizing.conflict_action, ConflictAction::Rename);
        assert_eq!(config.organizing.others_dir, "others");
    }

    #[test]
    fn config_serializes_camel_case() {
        let json = serde_json::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(json.contains("\"conflictAction\": \"rename\""));
        assert!(json.contains("\"keepCount\": 5"));
        assert!(json.contains("\"sourcePath\""));
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let config = AppConfig::parse(
            Path::new("config.json"),
            r#"{ "organizing": { "conflictAction": "skip" } }"#,
        )
        .unwrap();

        assert_eq!(config.organizing.conflict_action, ConflictAction::Skip);
        assert_eq!(config.organizing.date_format, "YYYY-MM-DD");
        assert_eq!(config.backup.keep_count, 5);
        assert_eq!(config.version, "1.0.0");
    }

    #[test]
    fn unknown_conflict_action_is_parse_error() {
        let result = AppConfig::parse(
            Path::new("config.json"),
            r#"{ "organizing": { "conflictAction": "merge" } }"#,
        );
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn toml_is_accepted_by_extension() {
        let config = AppConfig::parse(
            Path::new("config.toml"),
            "sourcePath = \"/data\"\n[rules]\nShell = [\"sh\"]\n",
        )
        .unwrap();
        assert_eq!(config.source_dir(), Some(PathBuf::from("/data")));
        assert_eq!(config.rules["Shell"], vec!["sh".to_string()]);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.organizing.others_dir = "../escape".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.rules.insert("A/B".into(), vec!["x".into()]);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.rules.insert("Docs".into(), vec!["tar.gz".into()]);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.backup.enabled = true;
        config.backup.keep_count = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.file_types = vec!["[bad".into()];
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.organize_by = OrganizeBy::Size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_escaping_date_format() {
        for pattern in ["../YYYY", "/YYYY", "YYYY/../../MM"] {
            let mut config = AppConfig::default();
            config.organizing.date_format = pattern.into();
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{} should be rejected",
                pattern
            );
        }

        let mut config = AppConfig::default();
        config.organizing.date_format = "YYYY/MM".into();
        config.organizing.create_date_folders = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn leading_dot_extensions_are_allowed() {
        let mut config = AppConfig::default();
        config.rules.insert("Text".into(), vec![".md".into(), "RST".into()]);
        assert!(config.validate().is_ok());

        let classifier = config.classifier();
        assert_eq!(classifier.classify("readme.md"), "Text");
        assert_eq!(classifier.classify("guide.rst"), "Text");
    }

    #[test]
    fn organize_options_follow_config() {
        let mut config = AppConfig::default();
        config.organizing.dry_run = true;
        config.organizing.conflict_action = ConflictAction::Overwrite;
        config.organizing.create_date_folders = true;
        config.destination_path = "/sorted".into();
        config.backup.enabled = true;
        config.paths.backup = "/backups".into();

        let options = config.organize_options().unwrap();
        assert!(options.dry_run);
        assert_eq!(options.conflict_action, ConflictAction::Overwrite);
        assert_eq!(options.destination, Some(PathBuf::from("/sorted")));
        assert!(options.date_folders.is_some());
        let backup = options.backup.unwrap();
        assert_eq!(backup.dir, PathBuf::from("/backups"));
        assert_eq!(backup.keep_count, 5);
        assert!(backup.compress);
    }

    #[test]
    fn source_dir_prefers_source_path() {
        let mut config = AppConfig::default();
        assert_eq!(config.source_dir(), None);

        config.paths.root = "/home/me/Documents".into();
        assert_eq!(config.source_dir(), Some(PathBuf::from("/home/me/Documents")));

        config.source_path = "/home/me/Downloads".into();
        assert_eq!(config.source_dir(), Some(PathBuf::from("/home/me/Downloads")));
    }

    #[test]
    fn plain_names() {
        assert!(is_plain_name("Images"));
        assert!(is_plain_name("My Files"));
        assert!(!is_plain_name(""));
        assert!(!is_plain_name("."));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name("a/b"));
        assert!(!is_plain_name("/abs"));
    }
}
