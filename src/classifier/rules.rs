use std::collections::{BTreeMap, HashMap};

/// Seed categories used before any user configuration is applied.
pub const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    ("Images", &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"]),
    ("Documents", &["pdf", "doc", "docx", "txt", "rtf", "odt"]),
    ("Audio", &["mp3", "wav", "flac", "m4a", "aac"]),
    ("Video", &["mp4", "avi", "mkv", "mov", "wmv"]),
    ("Archives", &["zip", "rar", "7z", "tar", "gz"]),
    ("Code", &["js", "ts", "py", "java", "cpp", "html", "css"]),
];

/// Where a rule set came from. Later variants take priority over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleSource {
    BuiltIn,
    User,
}

/// An ordered list of `category -> extensions` rules from one source.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub source: RuleSource,
    pub categories: Vec<(String, Vec<String>)>,
}

impl RuleSet {
    /// The built-in seed categories.
    pub fn builtin() -> Self {
        Self {
            source: RuleSource::BuiltIn,
            categories: BUILTIN_CATEGORIES
                .iter()
                .map(|(name, exts)| {
                    (
                        name.to_string(),
                        exts.iter().map(|e| e.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    /// User rules, in category-name order.
    pub fn user(rules: &BTreeMap<String, Vec<String>>) -> Self {
        Self {
            source: RuleSource::User,
            categories: rules
                .iter()
                .map(|(name, exts)| (name.clone(), exts.clone()))
                .collect(),
        }
    }
}

/// Normalize an extension for lookup: trimmed, no leading dot, lowercase.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Resolved extension -> category mapping.
///
/// Built once from a list of rule sets. Sets are applied in [`RuleSource`]
/// priority order; a category defined again by a later set has its whole
/// extension list replaced while keeping its position, new categories are
/// appended. Extensions are then inserted following category order, so on a
/// collision the later category wins.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    extensions: HashMap<String, String>,
    categories: Vec<String>,
}

impl RuleTable {
    pub fn from_layers(mut layers: Vec<RuleSet>) -> Self {
        // Stable: sets with equal priority keep the order they were given in
        layers.sort_by_key(|set| set.source);

        let mut merged: Vec<(String, Vec<String>)> = Vec::new();
        for set in layers {
            for (name, exts) in set.categories {
                match merged.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(slot) => slot.1 = exts,
                    None => merged.push((name, exts)),
                }
            }
        }

        let mut extensions = HashMap::new();
        for (name, exts) in &merged {
            for ext in exts {
                let key = normalize_extension(ext);
                if !key.is_empty() {
                    extensions.insert(key, name.clone());
                }
            }
        }

        Self {
            extensions,
            categories: merged.into_iter().map(|(name, _)| name).collect(),
        }
    }

    /// Table with only the built-in categories.
    pub fn builtin() -> Self {
        Self::from_layers(vec![RuleSet::builtin()])
    }

    /// Built-in categories overridden by `rules`.
    pub fn with_user_rules(rules: &BTreeMap<String, Vec<String>>) -> Self {
        Self::from_layers(vec![RuleSet::builtin(), RuleSet::user(rules)])
    }

    /// Category for an extension, case-insensitive. The extension may carry a leading dot.
    pub fn category_for(&self, ext: &str) -> Option<&str> {
        self.extensions
            .get(&normalize_extension(ext))
            .map(String::as_str)
    }

    /// Category names in merge order, including categories left with no extensions.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(name, exts)| {
                (
                    name.to_string(),
                    exts.iter().map(|e| e.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn builtin_table_has_seed_data() {
        let table = RuleTable::builtin();
        assert_eq!(table.category_for("jpg"), Some("Images"));
        assert_eq!(table.category_for("docx"), Some("Documents"));
        assert_eq!(table.category_for("flac"), Some("Audio"));
        assert_eq!(table.category_for("mkv"), Some("Video"));
        assert_eq!(table.category_for("7z"), Some("Archives"));
        assert_eq!(table.category_for("py"), Some("Code"));
        assert_eq!(table.category_for("sh"), None);
        assert_eq!(table.categories().count(), 6);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = RuleTable::builtin();
        assert_eq!(table.category_for("JPG"), Some("Images"));
        assert_eq!(table.category_for(".Png"), Some("Images"));
    }

    #[test]
    fn user_category_replaces_builtin_list() {
        let table = RuleTable::with_user_rules(&rules(&[("Images", &["png"])]));

        assert_eq!(table.category_for("png"), Some("Images"));
        // jpg was only in the built-in Images list, which was replaced
        assert_eq!(table.category_for("jpg"), None);
        // Replaced category keeps its slot
        assert_eq!(table.categories().next(), Some("Images"));
    }

    #[test]
    fn user_category_wins_extension_collision() {
        let table = RuleTable::with_user_rules(&rules(&[("Photos", &["JPG", ".jpeg"])]));

        assert_eq!(table.category_for("jpg"), Some("Photos"));
        assert_eq!(table.category_for("jpeg"), Some("Photos"));
        assert_eq!(table.category_for("png"), Some("Images"));
        assert_eq!(table.categories().last(), Some("Photos"));
    }

    #[test]
    fn layer_order_does_not_depend_on_argument_order() {
        let user = RuleSet::user(&rules(&[("Scripts", &["js"])]));
        let table = RuleTable::from_layers(vec![user, RuleSet::builtin()]);
        assert_eq!(table.category_for("js"), Some("Scripts"));
    }

    #[test]
    fn empty_extensions_are_ignored() {
        let table = RuleTable::with_user_rules(&rules(&[("Misc", &["", "  ", "."])]));
        assert!(table.category_for("").is_none());
        assert!(table.categories().any(|c| c == "Misc"));
    }

    #[test]
    fn normalize_strips_dot_and_lowercases() {
        assert_eq!(normalize_extension(".TXT"), "txt");
        assert_eq!(normalize_extension(" Md "), "md");
        assert_eq!(normalize_extension(""), "");
    }
}
