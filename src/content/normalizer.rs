//! Markup stripping for search documents.
//!
//! Post bodies are MDX/Markdown. Before indexing they are reduced to plain text by an
//! ordered list of regex substitutions. This is a best-effort cleaner, not a parser:
//! later rules see the output of earlier ones, and malformed markup simply passes
//! through.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum excerpt length in characters
const MAX_EXCERPT_LENGTH: usize = 160;

/// Context characters to show before a match
const CONTEXT_CHARS: usize = 60;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));

static IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("image regex"));

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("link regex"));

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("heading regex"));

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold regex"));

static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("italic regex"));

static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("fence regex"));

static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("inline code regex"));

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank line regex"));

/// Clean a raw MDX/Markdown body into plain text for indexing.
///
/// Rules run in this order:
/// 1. drop HTML/JSX tags, including self-closing components
/// 2. drop images `![alt](url)`
/// 3. turn links `[text](url)` into `text`
/// 4. drop heading markers at line start
/// 5. unwrap `**bold**`
/// 6. unwrap `*italic*`
/// 7. drop fenced code blocks with their content
/// 8. unwrap `` `inline code` ``
/// 9. collapse blank line runs into one newline
/// 10. trim
///
/// Never fails; an empty input yields an empty string.
pub fn clean_content(raw: &str) -> String {
    let rules: [(&Lazy<Regex>, &str); 9] = [
        (&TAG, ""),
        (&IMAGE, ""),
        (&LINK, "${1}"),
        (&HEADING, ""),
        (&BOLD, "${1}"),
        (&ITALIC, "${1}"),
        (&CODE_BLOCK, ""),
        (&INLINE_CODE, "${1}"),
        (&BLANK_LINES, "\n"),
    ];

    let mut text = raw.to_string();
    for (pattern, replacement) in rules {
        text = pattern.replace_all(&text, replacement).into_owned();
    }

    text.trim().to_string()
}

/// Build a short excerpt of cleaned content around the first occurrence of `query`.
///
/// Matching is case-insensitive. When the query does not occur verbatim, the excerpt
/// starts at the beginning of the content. Ellipses mark truncated ends.
pub fn excerpt(content: &str, query: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    let needle: Vec<char> = query.trim().to_lowercase().chars().collect();
    let haystack: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    let pos = if needle.is_empty() {
        0
    } else {
        haystack
            .windows(needle.len())
            .position(|window| window == needle.as_slice())
            .unwrap_or(0)
    };

    let start = pos.saturating_sub(CONTEXT_CHARS);
    let end = (start + MAX_EXCERPT_LENGTH).min(chars.len());

    let mut snippet: String = chars[start..end].iter().collect();
    snippet = snippet.split_whitespace().collect::<Vec<_>>().join(" ");

    if start > 0 {
        snippet = format!("...{}", snippet);
    }
    if end < chars.len() {
        snippet.push_str("...");
    }

    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_content(""), "");
        assert_eq!(clean_content("   \n\n  "), "");
    }

    #[test]
    fn test_strips_component_tags() {
        assert_eq!(
            clean_content("Before <Component prop=\"value\" /> after"),
            "Before  after"
        );
        assert_eq!(clean_content("<Callout>Note</Callout>"), "Note");
    }

    #[test]
    fn test_removes_images() {
        assert_eq!(clean_content("![alt](img.png)"), "");
        assert_eq!(clean_content("See ![diagram](d.svg) here"), "See  here");
    }

    #[test]
    fn test_unwraps_links() {
        assert_eq!(clean_content("[text](http://x)"), "text");
        assert_eq!(
            clean_content("Read [the docs](https://docs.rs) first"),
            "Read the docs first"
        );
    }

    #[test]
    fn test_strips_heading_markers() {
        assert_eq!(clean_content("# Title\nBody"), "Title\nBody");
        assert_eq!(clean_content("###### Deep\ntext"), "Deep\ntext");
        // Only at line start
        assert_eq!(clean_content("issue #42 fixed"), "issue #42 fixed");
    }

    #[test]
    fn test_strips_emphasis() {
        assert_eq!(clean_content("**bold** and *italic*"), "bold and italic");
    }

    #[test]
    fn test_removes_fenced_code() {
        let raw = "Intro\n\n```rust\nfn main() {}\n```\n\nOutro";
        assert_eq!(clean_content(raw), "Intro\nOutro");
    }

    #[test]
    fn test_unwraps_inline_code() {
        assert_eq!(clean_content("Call `search()` now"), "Call search() now");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(clean_content("one\n\n\n\ntwo"), "one\ntwo");
        assert_eq!(clean_content("one\n  \n\t\ntwo"), "one\ntwo");
    }

    #[test]
    fn test_image_inside_link_resolved_by_order() {
        // The image goes first, leaving an empty link label that no longer matches
        assert_eq!(clean_content("[![badge](b.svg)](https://ci)"), "[](https://ci)");
    }

    #[test]
    fn test_malformed_markup_passes_through() {
        assert_eq!(clean_content("**unclosed bold"), "**unclosed bold");
        assert_eq!(clean_content("[dangling](link"), "[dangling](link");
    }

    #[test]
    fn test_full_document() {
        let raw = "# Getting Started\n\n<Intro />\n\nThis is **important** and [linked](/x).\n\n```js\nconsole.log(1)\n```\n\nUse `npm`.";
        assert_eq!(
            clean_content(raw),
            "Getting Started\nThis is important and linked.\nUse npm."
        );
    }

    #[test]
    fn test_excerpt_centers_on_match() {
        let content = "a ".repeat(100) + "keyword" + &" b".repeat(100);
        let snippet = excerpt(&content, "KEYWORD");

        assert!(snippet.contains("keyword"));
        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_excerpt_short_content() {
        assert_eq!(excerpt("Short post body", "missing"), "Short post body");
        assert_eq!(excerpt("", "x"), "");
    }
}
