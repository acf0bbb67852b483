//! Document model representing one searchable blog post.

use serde::{Deserialize, Deserializer, Serialize};

/// URL prefix under which posts are published.
pub const BLOG_URL_PREFIX: &str = "/blog/";

/// Treat `null` like a missing field for list-valued properties.
fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A search record for one post, as served by `/api/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Document {
    /// Post title (required, non-empty)
    pub title: String,

    /// Short summary from frontmatter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Publication date (ISO 8601) or empty
    #[serde(default)]
    pub date: String,

    /// Unique identifier, also the last URL segment
    pub slug: String,

    /// Public URL, `/blog/{slug}`
    #[serde(default)]
    pub url: String,

    /// Normalized plain text of the post body
    #[serde(default)]
    pub content: String,

    /// Whether the post is featured
    #[serde(default)]
    pub featured: bool,

    /// Tags associated with the post
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub tags: Vec<String>,

    /// Categories associated with the post
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub categories: Vec<String>,
}

impl Document {
    /// Create a document with a title and slug; the URL is derived from the slug.
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            title: title.into(),
            url: Self::url_for(&slug),
            slug,
            ..Default::default()
        }
    }

    /// Build the public URL for a slug.
    pub fn url_for(slug: &str) -> String {
        format!("{}{}", BLOG_URL_PREFIX, slug)
    }

    /// Fill in the URL when the record arrived without one.
    pub fn populate_computed_fields(&mut self) {
        if self.url.is_empty() && !self.slug.is_empty() {
            self.url = Self::url_for(&self.slug);
        }
    }

    /// Check whether the post carries a tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Check whether the post belongs to a category (case-insensitive).
    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }
}
