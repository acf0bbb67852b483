//! Integration tests for the SearchClient using mockito for HTTP mocking.

use blog_search_server::error::FetchError;
use blog_search_server::SearchClient;
use mockito::Server;

#[test]
fn test_fetch_documents() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/search")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{
                "title": "React Testing Guide",
                "description": "Testing components",
                "date": "2024-03-01",
                "slug": "react-testing",
                "url": "/blog/react-testing",
                "content": "Component tests render a tree.",
                "featured": true,
                "tags": ["react", "testing"],
                "categories": ["frontend"]
            }]"#,
        )
        .create();

    let client = SearchClient::with_base_url(server.url());
    let documents = client.fetch_documents().unwrap();

    mock.assert();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].title, "React Testing Guide");
    assert_eq!(documents[0].description.as_deref(), Some("Testing components"));
    assert!(documents[0].featured);
    assert_eq!(documents[0].categories, vec!["frontend"]);
    assert_eq!(client.metrics().fetches_total(), 1);
    assert_eq!(client.metrics().documents_fetched_total(), 1);
}

#[test]
fn test_fetch_fills_missing_optional_fields() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/search")
        .with_status(200)
        .with_body(r#"[{"title": "Bare", "slug": "bare", "description": null, "tags": null}]"#)
        .create();

    let client = SearchClient::with_base_url(server.url());
    let documents = client.fetch_documents().unwrap();

    mock.assert();
    let doc = &documents[0];
    assert_eq!(doc.url, "/blog/bare");
    assert!(doc.description.is_none());
    assert!(doc.tags.is_empty());
    assert!(doc.categories.is_empty());
    assert!(!doc.featured);
    assert_eq!(doc.date, "");
}

#[test]
fn test_fetch_empty_collection() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/search")
        .with_status(200)
        .with_body("[]")
        .create();

    let client = SearchClient::with_base_url(server.url());
    let documents = client.fetch_documents().unwrap();

    mock.assert();
    assert!(documents.is_empty());
}

#[test]
fn test_http_error_status() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/search")
        .with_status(404)
        .with_body("Not Found")
        .create();

    let client = SearchClient::with_base_url(server.url());
    let err = client.fetch_documents().unwrap_err();

    mock.assert();
    assert!(matches!(err, FetchError::Status { status: 404 }));
    assert_eq!(err.user_message(), "Failed to load search index");
    assert_eq!(client.metrics().fetch_errors_total(), 1);
}

#[test]
fn test_server_error_status() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/search")
        .with_status(500)
        .create();

    let client = SearchClient::with_base_url(server.url());
    let err = client.fetch_documents().unwrap_err();

    mock.assert();
    assert!(matches!(err, FetchError::Status { status: 500 }));
}

#[test]
fn test_malformed_json() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/search")
        .with_status(200)
        .with_body("{not json")
        .create();

    let client = SearchClient::with_base_url(server.url());
    let err = client.fetch_documents().unwrap_err();

    mock.assert();
    assert!(matches!(err, FetchError::Json(_)));
    assert!(!err.user_message().is_empty());
    assert_ne!(err.user_message(), "Failed to load search index");
}

#[test]
fn test_missing_required_field_is_parse_error() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/search")
        .with_status(200)
        .with_body(r#"[{"slug": "no-title"}]"#)
        .create();

    let client = SearchClient::with_base_url(server.url());
    let err = client.fetch_documents().unwrap_err();

    mock.assert();
    assert!(err.user_message().contains("title"));
}

#[test]
fn test_connection_refused() {
    let client = SearchClient::with_base_url("http://127.0.0.1:1".to_string());
    let err = client.fetch_documents().unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
    assert_ne!(err.user_message(), "Failed to load posts");
}
