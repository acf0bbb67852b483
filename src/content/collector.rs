//! Content aggregation.
//!
//! Walks the content directory, parses every `.md`/`.mdx` post and produces the
//! document array served at `/api/search`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::content::frontmatter::{normalize_date, parse_date, parse_frontmatter};
use crate::content::normalizer::clean_content;
use crate::error::{ContentError, ContentResult};
use crate::models::Document;

/// File extensions treated as posts.
const POST_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Collects search documents from a directory of posts.
#[derive(Debug, Clone)]
pub struct ContentCollector {
    content_dir: PathBuf,
    include_drafts: bool,
}

impl ContentCollector {
    /// Create a collector for a content directory.
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            include_drafts: false,
        }
    }

    /// Include posts marked `draft: true`.
    #[must_use]
    pub fn with_drafts(mut self, include_drafts: bool) -> Self {
        self.include_drafts = include_drafts;
        self
    }

    /// The directory this collector reads from.
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Collect every post into a document list, newest first.
    ///
    /// Files that fail to parse are logged and skipped. Slugs are unique: the first
    /// file claiming a slug wins.
    pub fn collect(&self) -> ContentResult<Vec<Document>> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_post_files()?;
        info!(count = files.len(), "found post files");

        let mut seen = HashSet::new();
        let mut documents = Vec::with_capacity(files.len());

        for path in &files {
            match self.parse_file(path) {
                Ok(Some(doc)) => {
                    if seen.insert(doc.slug.clone()) {
                        documents.push(doc);
                    } else {
                        warn!(path = %path.display(), slug = %doc.slug, "duplicate slug, skipping");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse post");
                }
            }
        }

        sort_newest_first(&mut documents);

        info!(count = documents.len(), "collected documents");
        Ok(documents)
    }

    /// Find post files below the content directory, in a stable order.
    fn find_post_files(&self) -> ContentResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.content_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let is_post = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| POST_EXTENSIONS.contains(&ext));

            if is_post {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Parse one post. Returns `Ok(None)` for skipped drafts.
    fn parse_file(&self, path: &Path) -> ContentResult<Option<Document>> {
        let source = fs::read_to_string(path)?;
        let (frontmatter, body) = parse_frontmatter(&source, path)?;

        if frontmatter.draft && !self.include_drafts {
            debug!(path = %path.display(), "skipping draft");
            return Ok(None);
        }

        let title = frontmatter
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ContentError::MissingField {
                path: path.to_path_buf(),
                field: "title",
            })?;

        let slug = slug_for(path).ok_or_else(|| ContentError::MissingField {
            path: path.to_path_buf(),
            field: "slug",
        })?;

        if let Some(date) = frontmatter.date.as_deref() {
            if parse_date(date).is_none() {
                warn!(path = %path.display(), date, "unparseable date, leaving empty");
            }
        }

        let mut doc = Document::new(title, slug);
        doc.description = frontmatter.description.filter(|d| !d.trim().is_empty());
        doc.date = normalize_date(frontmatter.date.as_deref());
        doc.content = clean_content(&body);
        doc.featured = frontmatter.featured;
        doc.tags = frontmatter.tags;
        doc.categories = frontmatter.categories;

        Ok(Some(doc))
    }
}

/// Derive a slug from a post path: the file stem, or the parent directory for `index`
/// files (`hello/index.mdx` → `hello`).
pub fn slug_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;

    let slug = if stem == "index" {
        path.parent()?.file_name()?.to_str()?
    } else {
        stem
    };

    Some(slug.to_string())
}

/// Sort by date descending; undated posts go last, ties break on slug.
fn sort_newest_first(documents: &mut [Document]) {
    documents.sort_by(|a, b| {
        let da = parse_date(&a.date);
        let db = parse_date(&b.date);
        db.cmp(&da).then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Serialize documents to the JSON array served at `/api/search`.
pub fn to_search_json(documents: &[Document]) -> ContentResult<String> {
    Ok(serde_json::to_string(documents)?)
}

/// Write the search index JSON to a file, creating parent directories.
pub fn write_search_index(documents: &[Document], path: &Path) -> ContentResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, to_search_json(documents)?)?;
    info!(path = %path.display(), count = documents.len(), "wrote search index");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_file_stem() {
        assert_eq!(
            slug_for(Path::new("posts/react-testing.mdx")).as_deref(),
            Some("react-testing")
        );
    }

    #[test]
    fn test_slug_from_index_file() {
        assert_eq!(
            slug_for(Path::new("posts/node-perf/index.md")).as_deref(),
            Some("node-perf")
        );
    }

    #[test]
    fn test_sort_newest_first() {
        let mut docs = vec![
            Document {
                date: "2023-01-01".to_string(),
                ..Document::new("Old", "old")
            },
            Document::new("Undated", "undated"),
            Document {
                date: "2024-06-01".to_string(),
                ..Document::new("New", "new")
            },
        ];

        sort_newest_first(&mut docs);

        let slugs: Vec<_> = docs.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_to_search_json_is_array() {
        let json = to_search_json(&[Document::new("A", "a")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["url"], "/blog/a");
    }
}
