//! MCP server for blog search.
//!
//! This module provides the MCP protocol server that exposes the search hook
//! to AI assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::{BlogSearchServer, ListPostsParams, SearchPostsParams};

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the blog search server with stdio transport.
///
/// Communicates via stdin/stdout using the MCP protocol and returns when the
/// client disconnects.
pub async fn run_server(server: BlogSearchServer) -> Result<()> {
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
