//! Frontmatter parsing for post source files.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use crate::error::{ContentError, ContentResult};

/// YAML frontmatter delimiter.
const DELIMITER: &str = "---";

/// A list field that may also be written as a single scalar (`tags: rust`).
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
        None => Vec::new(),
    })
}

/// Dates may be unquoted in YAML, so accept any scalar and keep its text.
fn deserialize_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_yaml::Value::String(s)) => Some(s),
        Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
        Some(serde_yaml::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Frontmatter metadata for a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
    /// Post title.
    #[serde(default)]
    pub title: Option<String>,

    /// Summary for listings and search.
    #[serde(default)]
    pub description: Option<String>,

    /// Publication date as written.
    #[serde(default, deserialize_with = "deserialize_scalar_string")]
    pub date: Option<String>,

    /// Tags.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub tags: Vec<String>,

    /// Categories.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub categories: Vec<String>,

    /// Featured on the home page.
    #[serde(default)]
    pub featured: bool,

    /// Drafts are left out of the search index.
    #[serde(default)]
    pub draft: bool,
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Split a source file into its frontmatter block and body.
///
/// Both delimiters must be a `---` line on their own (trailing whitespace
/// allowed). Returns `None` when the file does not open with such a block.
pub fn split_frontmatter(source: &str) -> Option<(&str, &str)> {
    let source = source.trim_start_matches('\u{feff}').trim_start();
    let mut lines = source.split_inclusive('\n');

    let opening = lines.next()?;
    if !is_delimiter(opening) {
        return None;
    }

    let start = opening.len();
    let mut offset = start;
    for line in lines {
        if is_delimiter(line) {
            let frontmatter = source[start..offset].trim();
            let body = &source[offset + line.len()..];
            return Some((frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter and body from a source file.
///
/// Files without frontmatter yield default metadata and the full text as body.
pub fn parse_frontmatter(source: &str, path: &Path) -> ContentResult<(Frontmatter, String)> {
    let Some((fm_str, body)) = split_frontmatter(source) else {
        return Ok((Frontmatter::default(), source.to_string()));
    };

    if fm_str.is_empty() {
        return Ok((Frontmatter::default(), body.to_string()));
    }

    let frontmatter: Frontmatter =
        serde_yaml::from_str(fm_str).map_err(|e| ContentError::Frontmatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok((frontmatter, body.to_string()))
}

/// Parse a frontmatter date in any of the accepted forms.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Keep a date string only if it parses; otherwise return an empty string.
pub fn normalize_date(value: Option<&str>) -> String {
    match value {
        Some(v) if parse_date(v).is_some() => v.trim().to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter() {
        let source = "---\ntitle: Hello\n---\nBody text\n";
        let (fm, body) = split_frontmatter(source).unwrap();
        assert_eq!(fm, "title: Hello");
        assert_eq!(body, "Body text\n");
    }

    #[test]
    fn test_split_without_frontmatter() {
        assert!(split_frontmatter("# Just markdown").is_none());
        assert!(split_frontmatter("---\nunterminated").is_none());
    }

    #[test]
    fn test_delimiters_must_be_whole_lines() {
        assert!(split_frontmatter("----\ntitle: Hello\n---\nBody\n").is_none());
        assert!(split_frontmatter("---foo\ntitle: Hello\n---\nBody\n").is_none());
        assert!(split_frontmatter("---\ntitle: Hello\n---foo\nBody\n").is_none());

        let source = "---  \ntitle: Hello\n-----\n---\t\r\nBody ---\n";
        let (fm, body) = split_frontmatter(source).unwrap();
        assert_eq!(fm, "title: Hello\n-----");
        assert_eq!(body, "Body ---\n");
    }

    #[test]
    fn test_parse_full_frontmatter() {
        let source = r#"---
title: "React Testing Guide"
description: Write better tests
date: 2024-03-01
tags: [react, testing]
categories: frontend
featured: true
---
# Heading
"#;
        let (fm, body) = parse_frontmatter(source, Path::new("react.mdx")).unwrap();

        assert_eq!(fm.title.as_deref(), Some("React Testing Guide"));
        assert_eq!(fm.description.as_deref(), Some("Write better tests"));
        assert_eq!(fm.date.as_deref(), Some("2024-03-01"));
        assert_eq!(fm.tags, vec!["react", "testing"]);
        assert_eq!(fm.categories, vec!["frontend"]);
        assert!(fm.featured);
        assert!(!fm.draft);
        assert_eq!(body, "# Heading\n");
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let source = "---\ntitle: [unclosed\n---\nbody";
        let result = parse_frontmatter(source, Path::new("bad.md"));
        assert!(matches!(result, Err(ContentError::Frontmatter { .. })));
    }

    #[test]
    fn test_parse_date_forms() {
        assert!(parse_date("2024-01-15").is_some());
        assert!(parse_date("2024-01-15T10:30:00Z").is_some());
        assert!(parse_date("2024-01-15T10:30:00+02:00").is_some());
        assert!(parse_date("2024-01-15 10:30:00").is_some());
        assert!(parse_date("January 15th").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date(Some("2024-01-15")), "2024-01-15");
        assert_eq!(normalize_date(Some("not a date")), "");
        assert_eq!(normalize_date(None), "");
    }
}
