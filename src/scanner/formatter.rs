use chrono::{DateTime, Local};
use humansize::{format_size, BINARY};
use serde::Serialize;
use std::path::Path;

use super::entry::ScanEntry;

/// Aggregate counts over a set of scanned entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanTotals {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

impl ScanTotals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ScanEntry>) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            if entry.is_dir {
                totals.dirs += 1;
            } else {
                totals.files += 1;
                totals.bytes += entry.size;
            }
        }
        totals
    }
}

#[derive(Serialize)]
struct JsonEntry {
    path: String,
    is_dir: bool,
    size: u64,
    modified: Option<String>,
}

#[derive(Serialize)]
struct JsonScan {
    root: String,
    entries: Vec<JsonEntry>,
    totals: ScanTotals,
}

fn format_mtime(entry: &ScanEntry) -> Option<DateTime<Local>> {
    entry.modified.map(DateTime::<Local>::from)
}

/// Format entries as a table with paths relative to `root`
pub fn format_table(root: &Path, entries: &[ScanEntry]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<4}  {:>10}  {:<16}  {}\n",
        "TYPE", "SIZE", "MODIFIED", "PATH"
    ));
    output.push_str(&format!("{:-<4}  {:->10}  {:-<16}  {:-<40}\n", "", "", "", ""));

    for entry in entries {
        let kind = if entry.is_dir {
            "dir"
        } else if entry.is_symlink {
            "link"
        } else {
            "file"
        };
        let size = if entry.is_dir {
            String::new()
        } else {
            format_size(entry.size, BINARY)
        };
        let modified = format_mtime(entry)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        let mut path = entry.relative_to(root).display().to_string();
        if entry.is_dir {
            path.push('/');
        }

        output.push_str(&format!(
            "{:<4}  {:>10}  {:<16}  {}\n",
            kind, size, modified, path
        ));
    }

    output
}

/// Format entries as JSON
pub fn format_json(root: &Path, entries: &[ScanEntry], pretty: bool) -> serde_json::Result<String> {
    let scan = JsonScan {
        root: root.display().to_string(),
        entries: entries
            .iter()
            .map(|e| JsonEntry {
                path: e.path.display().to_string(),
                is_dir: e.is_dir,
                size: e.size,
                modified: format_mtime(e).map(|t| t.to_rfc3339()),
            })
            .collect(),
        totals: ScanTotals::from_entries(entries),
    };

    if pretty {
        serde_json::to_string_pretty(&scan)
    } else {
        serde_json::to_string(&scan)
    }
}
