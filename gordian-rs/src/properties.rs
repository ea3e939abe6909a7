//! `key = value` properties files.
//!
//! ```text
//! # robot tuning
//! speed = 0.5
//! side  = left
//! ```
//!
//! | Line | Action |
//! |------|--------|
//! | `key = value` | record; key and value trimmed, split at the first `=` |
//! | blank, or starting with `#` | ignored |
//! | anything else | reported as a [`PropertyError`] and skipped |

use std::fmt;
use std::path::Path;

use crate::script::value::parse_number;

/// A non-fatal error encountered while reading a properties file.
#[derive(Debug)]
pub struct PropertyError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for PropertyError {}

/// One `key = value` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    key: String,
    value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Property {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.key, self.value)
    }
}

/// Properties in file order.  A repeated key replaces the earlier value in
/// place.
#[derive(Debug, Default)]
pub struct Properties {
    entries: Vec<Property>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text, returning the records and any bad lines.
    pub fn load_str(s: &str) -> (Self, Vec<PropertyError>) {
        let mut props = Properties::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                errors.push(PropertyError {
                    line: lineno,
                    message: format!("expected `key = value`, got `{line}`"),
                });
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                errors.push(PropertyError {
                    line: lineno,
                    message: "empty key".to_owned(),
                });
                continue;
            }
            props.insert(key, value.trim());
        }

        (props, errors)
    }

    /// Read and parse a properties file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<PropertyError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|p| p.key == key) {
            Some(p) => p.value = value.to_owned(),
            None => self.entries.push(Property::new(key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|p| p.key == key).map(Property::value)
    }

    /// The value for `key`, or `backup` when it is absent.
    pub fn get_or<'a>(&'a self, key: &str, backup: &'a str) -> &'a str {
        self.get(key).unwrap_or(backup)
    }

    /// The value for `key` read as a number; `None` if absent or not numeric.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(parse_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_lines() {
        let (props, errs) = Properties::load_str("speed = 0.5\nside=left\n");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("speed"), Some("0.5"));
        assert_eq!(props.get("side"), Some("left"));
    }

    #[test]
    fn crlf_and_whitespace() {
        let (props, errs) = Properties::load_str("  a =  1 \r\n\r\nb = two words\r\n");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("two words"));
    }

    #[test]
    fn first_equals_splits() {
        let (props, _) = Properties::load_str("expr = a == b");
        assert_eq!(props.get("expr"), Some("a == b"));
    }

    #[test]
    fn empty_value_is_allowed() {
        let (props, errs) = Properties::load_str("blank =");
        assert!(errs.is_empty());
        assert_eq!(props.get("blank"), Some(""));
    }

    #[test]
    fn comments_skipped() {
        let (props, errs) = Properties::load_str("# tuning\n   # more\nx = 1");
        assert!(errs.is_empty());
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn bad_lines_reported_and_skipped() {
        let (props, errs) = Properties::load_str("ok = 1\njunk\n = 2\nalso = 3");
        assert_eq!(props.len(), 2);
        let lines: Vec<usize> = errs.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 3]);
        assert_eq!(errs[1].to_string(), "line 3: empty key");
    }

    #[test]
    fn repeated_key_replaces() {
        let (props, _) = Properties::load_str("x = 1\ny = 2\nx = 3");
        assert_eq!(props.get("x"), Some("3"));
        let keys: Vec<&str> = props.iter().map(Property::key).collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn lookups_with_backup_and_numbers() {
        let (props, _) = Properties::load_str("speed = 0.75\nname = bot");
        assert_eq!(props.get_or("missing", "fallback"), "fallback");
        assert_eq!(props.get_or("name", "fallback"), "bot");
        assert_eq!(props.get_number("speed"), Some(0.75));
        assert_eq!(props.get_number("name"), None);
        assert_eq!(props.get_number("missing"), None);
    }

    #[test]
    fn property_display() {
        assert_eq!(Property::new("speed", "0.5").to_string(), "speed = 0.5");
    }

    #[test]
    fn load_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robot.properties");
        std::fs::write(&path, "speed = 1\n").unwrap();
        let (props, errs) = Properties::load_file(&path).unwrap();
        assert!(errs.is_empty());
        assert_eq!(props.get_number("speed"), Some(1.0));
    }
}
