//! Blog Search Server - Main entry point
//!
//! Serves fuzzy search over a blog's posts through the Model Context Protocol.
//! `blog-search-server build-index <content-dir> <output.json>` instead writes the
//! search document array the blog serves at `/api/search`.

use anyhow::Result;
use blog_search_server::client::{ContentDirectorySource, DocumentSource, HttpDocumentSource};
use blog_search_server::content::write_search_index;
use blog_search_server::{BlogSearchServer, Config, ContentCollector, FuzzyOptions, Metrics};
use blog_search_server::{SearchClient, SearchHook};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "blog-search-server", version)]
#[command(about = "Fuzzy search over blog posts, served over MCP stdio")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Collect a content directory and write the search JSON served at /api/search
    BuildIndex {
        /// Directory of .md/.mdx posts
        content_dir: PathBuf,
        /// Output file for the search document array
        output: PathBuf,
    },
}

/// `RUST_LOG` wins, then `LOG_LEVEL`, then errors only.
fn log_filter(rust_log: Option<&str>, log_level: Option<&str>) -> EnvFilter {
    rust_log
        .into_iter()
        .chain(log_level)
        .filter(|directives| !directives.trim().is_empty())
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("error"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let rust_log = std::env::var("RUST_LOG").ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), log_level.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    if let Some(Command::BuildIndex {
        content_dir,
        output,
    }) = cli.command
    {
        return build_index(&content_dir, &output);
    }

    let config = match Config::from_env() {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let metrics = Metrics::new();
    let source: Arc<dyn DocumentSource> = match &config.content_dir {
        Some(dir) => {
            info!("Indexing local content directory: {}", dir.display());
            Arc::new(
                ContentDirectorySource::new(ContentCollector::new(dir))
                    .with_metrics(metrics.clone()),
            )
        }
        None => {
            info!(
                "Fetching search index from: {}",
                config.site_url.as_deref().unwrap_or_default()
            );
            Arc::new(HttpDocumentSource::new(
                SearchClient::new(&config).with_metrics(metrics.clone()),
            ))
        }
    };

    let hook = Arc::new(SearchHook::mount_with_metrics(
        source,
        FuzzyOptions::blog_defaults(),
        metrics,
    ));

    let server = BlogSearchServer::new(hook.clone(), config.max_search_results);
    info!(
        "Blog search server initialized (max results: {})",
        config.max_search_results
    );

    info!("Starting MCP server with stdio transport");
    blog_search_server::server::run_server(server).await?;

    hook.unmount();
    info!("Blog search server shutdown complete");
    Ok(())
}

/// Collect a content directory and write the search document array.
fn build_index(content_dir: &Path, output: &Path) -> Result<()> {
    let documents = ContentCollector::new(content_dir).collect()?;
    write_search_index(&documents, output)?;

    info!("Wrote {} documents to {}", documents.len(), output.display());
    Ok(())
}
