//! Date bucket folder names.

use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Folder-name pattern such as `YYYY-MM-DD`.
///
/// Recognised tokens: `YYYY`, `YY`, `MM`, `DD`, `HH`, `mm`, `ss`. Everything
/// else is copied literally, so `YYYY/MM` yields nested folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    strftime: String,
}

const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("mm", "%M"),
    ("ss", "%S"),
];

impl DateFormat {
    pub fn new(pattern: &str) -> Self {
        let mut strftime = String::with_capacity(pattern.len() * 2);
        let mut rest = pattern;

        'outer: while let Some(c) = rest.chars().next() {
            for (token, directive) in TOKENS {
                if let Some(tail) = rest.strip_prefix(token) {
                    strftime.push_str(directive);
                    rest = tail;
                    continue 'outer;
                }
            }
            if c == '%' {
                strftime.push_str("%%");
            } else {
                strftime.push(c);
            }
            rest = &rest[c.len_utf8()..];
        }

        Self {
            pattern: pattern.to_string(),
            strftime,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True if every bucket stays below the folder it is joined to: no empty,
    /// `.` or `..` components and no leading separator.
    pub fn is_contained(&self) -> bool {
        self.pattern
            .split(['/', '\\'])
            .all(|part| !part.is_empty() && part != "." && part != "..")
    }

    /// Folder name for a timestamp, in local time.
    pub fn bucket(&self, time: SystemTime) -> String {
        DateTime::<Local>::from(time).format(&self.strftime).to_string()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::new("YYYY-MM-DD")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> SystemTime {
        Local
            .with_ymd_and_hms(y, m, d, h, min, s)
            .single()
            .unwrap()
            .into()
    }

    #[test]
    fn test_default_pattern() {
        let fmt = DateFormat::default();
        assert_eq!(fmt.bucket(local(2024, 3, 7, 12, 0, 0)), "2024-03-07");
    }

    #[test]
    fn test_all_tokens() {
        let fmt = DateFormat::new("YY.MM.DD HH-mm-ss");
        assert_eq!(fmt.bucket(local(2023, 11, 2, 9, 5, 30)), "23.11.02 09-05-30");
    }

    #[test]
    fn test_literals_and_percent() {
        let fmt = DateFormat::new("year YYYY 100%");
        assert_eq!(fmt.bucket(local(2022, 1, 1, 0, 0, 0)), "year 2022 100%");
    }

    #[test]
    fn test_nested_pattern() {
        let fmt = DateFormat::new("YYYY/MM");
        assert_eq!(fmt.bucket(local(2021, 6, 15, 8, 0, 0)), "2021/06");
        assert_eq!(fmt.pattern(), "YYYY/MM");
    }

    #[test]
    fn test_contained_patterns() {
        assert!(DateFormat::new("YYYY-MM-DD").is_contained());
        assert!(DateFormat::new("YYYY/MM").is_contained());
        assert!(!DateFormat::new("../YYYY").is_contained());
        assert!(!DateFormat::new("/YYYY").is_contained());
        assert!(!DateFormat::new("YYYY/../x").is_contained());
        assert!(!DateFormat::new("YYYY//MM").is_contained());
        assert!(!DateFormat::new("..\\YYYY").is_contained());
    }
}
