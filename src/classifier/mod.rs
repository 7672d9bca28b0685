//! Extension based file classification.
//!
//! A [`Classifier`] is a pure lookup over a [`RuleTable`]: it never touches
//! the filesystem, so it can be shared freely and tested in isolation.

mod rules;

pub use rules::{normalize_extension, RuleSet, RuleSource, RuleTable, BUILTIN_CATEGORIES};

use std::path::{is_separator, Path};

/// Category used for files no rule matches, unless configured otherwise.
pub const DEFAULT_OTHERS_DIR: &str = "others";

/// Extension of a file name: the text after the last `.`, lowercased.
///
/// Names without a dot, or ending in one, have an empty extension. A leading
/// dot is part of the name, so `.bashrc` has none. Only the final path
/// component is considered.
pub fn extension_of(filename: &str) -> String {
    let name = filename.rsplit(is_separator).next().unwrap_or(filename);
    let name = name.strip_prefix('.').unwrap_or(name);
    match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

/// Maps file names to category names.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleTable,
    others_dir: String,
}

impl Classifier {
    pub fn new(rules: RuleTable, others_dir: impl Into<String>) -> Self {
        Self {
            rules,
            others_dir: others_dir.into(),
        }
    }

    /// Built-in rules with the default others bucket.
    pub fn with_defaults() -> Self {
        Self::new(RuleTable::builtin(), DEFAULT_OTHERS_DIR)
    }

    /// Category for `filename`, falling back to the others bucket.
    pub fn classify(&self, filename: &str) -> &str {
        let ext = extension_of(filename);
        if ext.is_empty() {
            return self.others_dir.as_str();
        }
        self.rules.category_for(&ext).unwrap_or(self.others_dir.as_str())
    }

    /// Category for the final component of `path`.
    pub fn classify_path(&self, path: &Path) -> &str {
        match path.file_name() {
            Some(name) => self.classify(&name.to_string_lossy()),
            None => self.others_dir.as_str(),
        }
    }

    /// True only when an explicit rule matches; the others bucket doesn't count.
    pub fn is_supported(&self, filename: &str) -> bool {
        let ext = extension_of(filename);
        !ext.is_empty() && self.rules.category_for(&ext).is_some()
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn others_dir(&self) -> &str {
        &self.others_dir
    }

    /// Every directory name this classifier can produce.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.rules
            .categories()
            .chain(std::iter::once(self.others_dir.as_str()))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), "jpg");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of(".txt"), "");
        assert_eq!(extension_of(".config.json"), "json");
        assert_eq!(extension_of(".."), "");
        assert_eq!(extension_of("dir.v2/notes"), "");
    }

    #[test]
    fn test_default_classification() {
        let classifier = Classifier::with_defaults();
        assert_eq!(classifier.classify("photo.jpg"), "Images");
        assert_eq!(classifier.classify("notes.pdf"), "Documents");
        assert_eq!(classifier.classify("script.sh"), "others");
        assert_eq!(classifier.classify("Makefile"), "others");
        assert_eq!(classifier.classify("weird."), "others");
        assert_eq!(classifier.classify(".txt"), "others");
        assert!(!classifier.is_supported(".jpg"));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let classifier = Classifier::with_defaults();
        assert_eq!(classifier.classify("SONG.MP3"), "Audio");
        assert_eq!(classifier.classify("Clip.MoV"), "Video");
    }

    #[test]
    fn test_classify_is_repeatable() {
        let classifier = Classifier::with_defaults();
        for name in ["a.zip", "b.unknown", "c", "d.HTML"] {
            assert_eq!(classifier.classify(name), classifier.classify(name));
        }
    }

    #[test]
    fn test_custom_others_dir() {
        let classifier = Classifier::new(RuleTable::builtin(), "Misc");
        assert_eq!(classifier.classify("data.bin"), "Misc");
        assert_eq!(classifier.others_dir(), "Misc");
    }

    #[test]
    fn test_is_supported() {
        let classifier = Classifier::with_defaults();
        assert!(classifier.is_supported("photo.png"));
        assert!(classifier.is_supported("PHOTO.PNG"));
        assert!(!classifier.is_supported("script.sh"));
        assert!(!classifier.is_supported("README"));
    }

    #[test]
    fn test_classify_path_uses_file_name() {
        let classifier = Classifier::with_defaults();
        let path = PathBuf::from("/tmp/some.dir/track.wav");
        assert_eq!(classifier.classify_path(&path), "Audio");
        assert_eq!(classifier.classify_path(Path::new("/")), "others");
    }

    #[test]
    fn test_user_rules_flow_through() {
        let mut rules = BTreeMap::new();
        rules.insert("Shell".to_string(), vec!["sh".to_string()]);
        let classifier = Classifier::new(RuleTable::with_user_rules(&rules), "others");

        assert_eq!(classifier.classify("script.sh"), "Shell");
        assert!(classifier.is_supported("script.sh"));
    }

    #[test]
    fn test_category_names_include_others() {
        let classifier = Classifier::with_defaults();
        let names: Vec<_> = classifier.category_names().collect();
        assert!(names.contains(&"Images"));
        assert!(names.contains(&"others"));
        assert_eq!(names.len(), 7);
    }
}
