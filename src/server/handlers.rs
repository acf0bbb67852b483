//! MCP tool handlers for the blog search server.
//!
//! This module implements the MCP tools using the rmcp SDK's tool_router pattern.

use crate::content::excerpt;
use crate::models::Document;
use crate::search::SearchHook;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server exposing blog search to AI assistants.
#[derive(Clone)]
pub struct BlogSearchServer {
    hook: Arc<SearchHook>,
    max_results: usize,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for BlogSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "blog-search-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for a personal blog - fuzzy search over posts by title, description, content, tags and categories.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchPostsParams {
    /// Search text; blank returns every post
    pub query: String,
    /// Maximum number of results
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListPostsParams {
    /// Only featured posts
    #[serde(default)]
    pub featured_only: Option<bool>,
    /// Only posts with this tag (case-insensitive)
    #[serde(default)]
    pub tag: Option<String>,
    /// Only posts in this category (case-insensitive)
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchStatusParams {}

fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn post_summary(doc: &Document) -> serde_json::Value {
    serde_json::json!({
        "title": doc.title,
        "slug": doc.slug,
        "url": doc.url,
        "date": doc.date,
        "description": doc.description.as_deref().unwrap_or(""),
        "featured": doc.featured,
        "tags": doc.tags,
        "categories": doc.categories,
    })
}

#[tool_router]
impl BlogSearchServer {
    /// Create a new server over a mounted search hook.
    pub fn new(hook: Arc<SearchHook>, max_results: usize) -> Self {
        Self {
            hook,
            max_results: max_results.max(1),
            tool_router: Self::tool_router(),
        }
    }

    /// Build the `search_posts` response body.
    pub fn search_posts_response(&self, params: &SearchPostsParams) -> serde_json::Value {
        let limit = params
            .limit
            .unwrap_or(self.max_results)
            .clamp(1, self.max_results);
        let snapshot = self.hook.snapshot();
        let results = self.hook.search(&params.query);

        serde_json::json!({
            "query": params.query,
            "loading": snapshot.loading,
            "error": snapshot.error,
            "total_matches": results.len(),
            "results": results.iter().take(limit).map(|doc| {
                let mut summary = post_summary(doc);
                summary["excerpt"] = serde_json::Value::String(excerpt(&doc.content, &params.query));
                summary
            }).collect::<Vec<_>>(),
        })
    }

    /// Build the `list_posts` response body.
    pub fn list_posts_response(&self, params: &ListPostsParams) -> serde_json::Value {
        let posts = self.hook.posts();
        let featured_only = params.featured_only.unwrap_or(false);

        let filtered: Vec<&Document> = posts
            .iter()
            .filter(|doc| !featured_only || doc.featured)
            .filter(|doc| params.tag.as_deref().map_or(true, |tag| doc.has_tag(tag)))
            .filter(|doc| {
                params
                    .category
                    .as_deref()
                    .map_or(true, |category| doc.has_category(category))
            })
            .collect();

        serde_json::json!({
            "count": filtered.len(),
            "posts": filtered.iter().map(|doc| post_summary(doc)).collect::<Vec<_>>(),
        })
    }

    /// Build the `search_status` response body.
    pub fn search_status_response(&self) -> serde_json::Value {
        let snapshot = self.hook.snapshot();

        serde_json::json!({
            "state": self.hook.load_state().label(),
            "loading": snapshot.loading,
            "error": snapshot.error,
            "post_count": snapshot.posts.len(),
            "index_builds": self.hook.index_builds(),
            "metrics": self.hook.metrics().summary(),
        })
    }

    /// Fuzzy search across blog posts.
    #[tool(
        description = "Fuzzy search blog posts by title, description, content, tags and categories. Returns posts best match first with an excerpt around the query. A blank query lists every post."
    )]
    async fn search_posts(
        &self,
        params: Parameters<SearchPostsParams>,
    ) -> Result<CallToolResult, McpError> {
        let response = self.search_posts_response(&params.0);

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&response).map_err(to_mcp_error)?,
        )]))
    }

    /// List posts, optionally filtered.
    #[tool(
        description = "List blog posts newest first, optionally only featured posts or those with a given tag or category"
    )]
    async fn list_posts(
        &self,
        params: Parameters<ListPostsParams>,
    ) -> Result<CallToolResult, McpError> {
        let response = self.list_posts_response(&params.0);

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&response).map_err(to_mcp_error)?,
        )]))
    }

    /// Report whether the search index has loaded.
    #[tool(description = "Report search index status: loading, error message, post count and counters")]
    async fn search_status(
        &self,
        _params: Parameters<SearchStatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let response = self.search_status_response();

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&response).map_err(to_mcp_error)?,
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DocumentSource;
    use crate::error::FetchResult;
    use crate::matching::FuzzyOptions;
    use async_trait::async_trait;

    struct StaticSource(Vec<Document>);

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn fetch_documents(&self) -> FetchResult<Vec<Document>> {
            Ok(self.0.clone())
        }
    }

    fn post(title: &str, slug: &str, tags: &[&str], featured: bool) -> Document {
        let mut doc = Document::new(title, slug);
        doc.tags = tags.iter().map(|t| t.to_string()).collect();
        doc.featured = featured;
        doc.content = format!("{} explained step by step.", title);
        doc
    }

    async fn server(max_results: usize) -> BlogSearchServer {
        let hook = SearchHook::mount(
            Arc::new(StaticSource(vec![
                post("React Testing Guide", "react-testing", &["react", "testing"], true),
                post("Node.js Performance Tips", "node-perf", &["nodejs"], false),
                post("Rust Error Handling", "rust-errors", &["rust"], false),
            ])),
            FuzzyOptions::blog_defaults(),
        );
        hook.wait_until_settled().await;
        BlogSearchServer::new(Arc::new(hook), max_results)
    }

    #[tokio::test]
    async fn test_search_posts_response() {
        let server = server(10).await;
        let response = server.search_posts_response(&SearchPostsParams {
            query: "react".to_string(),
            limit: None,
        });

        assert_eq!(response["loading"], false);
        assert_eq!(response["results"][0]["slug"], "react-testing");
        assert_eq!(response["results"][0]["url"], "/blog/react-testing");
        assert!(response["results"][0]["excerpt"]
            .as_str()
            .unwrap()
            .contains("React"));
    }

    #[tokio::test]
    async fn test_search_limit_capped() {
        let server = server(2).await;
        let response = server.search_posts_response(&SearchPostsParams {
            query: String::new(),
            limit: Some(50),
        });

        assert_eq!(response["total_matches"], 3);
        assert_eq!(response["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_posts_filters() {
        let server = server(10).await;

        let featured = server.list_posts_response(&ListPostsParams {
            featured_only: Some(true),
            ..Default::default()
        });
        assert_eq!(featured["count"], 1);

        let tagged = server.list_posts_response(&ListPostsParams {
            tag: Some("RUST".to_string()),
            ..Default::default()
        });
        assert_eq!(tagged["count"], 1);
        assert_eq!(tagged["posts"][0]["slug"], "rust-errors");

        let all = server.list_posts_response(&ListPostsParams::default());
        assert_eq!(all["count"], 3);
    }

    #[tokio::test]
    async fn test_search_status() {
        let server = server(10).await;
        let status = server.search_status_response();

        assert_eq!(status["state"], "loaded");
        assert_eq!(status["post_count"], 3);
        assert_eq!(status["index_builds"], 1);
        assert!(status["error"].is_null());
    }
}
