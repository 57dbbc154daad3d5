//! Meilisearch contract tests.
//!
//! These tests run a [`SearchClient`] against a mock Meilisearch server and
//! verify:
//! - request method, path, headers and JSON body
//! - response normalisation for single and multi-search
//! - error mapping for non-success statuses and malformed bodies
//! - the callback calling convention fires exactly one callback

use search_adapter::{
    ClientConfig, ClientOptions, ConnectionConfig, FilterSet, SearchClient, SearchEndpoint,
    SearchError, SearchResults,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-search-key";

fn client(server: &MockServer) -> SearchClient {
    SearchClient::new(
        "meilisearch",
        ConnectionConfig::new(server.uri(), TOKEN),
        "courses",
    )
    .expect("client")
}

fn meili_page() -> serde_json::Value {
    json!({
        "hits": [{"id": 1, "title": "Rust 101"}],
        "query": "rust",
        "limit": 21,
        "offset": 0,
        "estimatedTotalHits": 5,
        "processingTimeMs": 3
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Request format
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_posts_payload_with_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/courses/search"))
        .and(header("authorization", "Bearer test-search-key"))
        .and(header("content-type", "application/json; charset=UTF-8"))
        .and(body_json(json!({
            "q": "shoes",
            "facets": [],
            "limit": 21,
            "offset": 0,
            "filter": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(meili_page()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).search("shoes", &FilterSet::new()).await;
    assert!(result.is_ok(), "search should succeed: {result:?}");
}

#[tokio::test]
async fn search_sends_filter_expression() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/courses/search"))
        .and(body_json(json!({
            "q": "shoes",
            "facets": [],
            "limit": 21,
            "offset": 0,
            "filter": "color='red' AND category IN [a,b]"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(meili_page()))
        .expect(1)
        .mount(&server)
        .await;

    let filters = FilterSet::new()
        .with("color", "red")
        .with("category", vec!["a", "b"]);
    let result = client(&server).search("shoes", &filters).await;
    assert!(result.is_ok(), "search should succeed: {result:?}");
}

#[tokio::test]
async fn multi_search_posts_inline_index() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/multi-search"))
        .and(header("authorization", "Bearer test-search-key"))
        .and(body_json(json!({
            "queries": [{
                "indexUid": "courses",
                "q": "rust",
                "facets": [],
                "limit": 21,
                "offset": 0,
                "filter": "org='edX'"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "indexUid": "courses",
                "hits": [{"id": "course-v1:edX+Rust"}],
                "limit": 21,
                "offset": 0,
                "estimatedTotalHits": 1,
                "processingTimeMs": 1
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = ClientOptions {
        endpoint: SearchEndpoint::Multi,
        ..Default::default()
    };
    let client = SearchClient::with_options(
        "meilisearch",
        ConnectionConfig::new(server.uri(), TOKEN),
        "courses",
        options,
    )
    .expect("client");

    let page = client
        .search("rust", &FilterSet::new().with("org", "edX"))
        .await
        .expect("search");
    assert_eq!(page.results, vec![json!({"id": "course-v1:edX+Rust"})]);
    assert_eq!(page.total, Some(1));
}

// ────────────────────────────────────────────────────────────────────────────
// Response normalisation
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_normalises_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/courses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meili_page()))
        .mount(&server)
        .await;

    let page = client(&server)
        .search("rust", &FilterSet::new())
        .await
        .expect("search");
    assert_eq!(
        page,
        SearchResults {
            results: vec![json!({"id": 1, "title": "Rust 101"})],
            limit: 21,
            offset: 0,
            total: Some(5),
            took: Some(3),
            max_score: None,
        }
    );
}

#[tokio::test]
async fn missing_optional_fields_stay_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/courses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": []})))
        .mount(&server)
        .await;

    let page = client(&server)
        .search("", &FilterSet::new())
        .await
        .expect("search");
    assert!(page.total.is_none());
    assert!(page.took.is_none());

    let value = serde_json::to_value(&page).expect("serialize");
    assert_eq!(value["total"], serde_json::Value::Null);
    assert_eq!(value["maxScore"], serde_json::Value::Null);
}

// ────────────────────────────────────────────────────────────────────────────
// Error handling
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn non_success_status_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/courses/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "The provided API key is invalid.",
            "code": "invalid_api_key"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .search("rust", &FilterSet::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(err.is_transport());
    assert!(err.to_string().contains("invalid_api_key"));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/courses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .search("rust", &FilterSet::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Parse(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn json_without_hits_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/courses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"limit": 21})))
        .mount(&server)
        .await;

    let err = client(&server)
        .search("rust", &FilterSet::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Parse(_)));
}

#[tokio::test]
async fn unknown_engine_never_touches_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meili_page()))
        .expect(0)
        .mount(&server)
        .await;

    let err = SearchClient::new(
        "solr",
        ConnectionConfig::new(server.uri(), TOKEN),
        "courses",
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::Config(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// Callback convention
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn callback_success_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/courses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meili_page()))
        .mount(&server)
        .await;

    let (tx, rx) = oneshot::channel();
    let errored = Arc::new(AtomicBool::new(false));
    let errored_flag = Arc::clone(&errored);

    let handle = client(&server).search_with_callbacks(
        "rust",
        FilterSet::new(),
        move |page| {
            let _ = tx.send(page);
        },
        move |_err| errored_flag.store(true, Ordering::SeqCst),
    );
    handle.await.expect("task");

    let page = rx.await.expect("success callback fired");
    assert_eq!(page.total, Some(5));
    assert!(!errored.load(Ordering::SeqCst));
}

#[tokio::test]
async fn callback_error_path_on_non_200() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/courses/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let (tx, rx) = oneshot::channel();
    let succeeded = Arc::new(AtomicBool::new(false));
    let succeeded_flag = Arc::clone(&succeeded);

    let handle = client(&server).search_with_callbacks(
        "rust",
        FilterSet::new(),
        move |_page| succeeded_flag.store(true, Ordering::SeqCst),
        move |err| {
            let _ = tx.send(err);
        },
    );
    handle.await.expect("task");

    let err = rx.await.expect("error callback fired");
    assert_eq!(err.status(), Some(500));
    assert!(!succeeded.load(Ordering::SeqCst));
}

// ────────────────────────────────────────────────────────────────────────────
// Health and config-driven construction
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_available() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("authorization", "Bearer test-search-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "available"})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).health().await.expect("health"));
}

#[tokio::test]
async fn health_unexpected_status_body_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "starting"})))
        .mount(&server)
        .await;

    assert!(!client(&server).health().await.expect("health"));
}

#[tokio::test]
async fn health_failure_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).health().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn config_file_drives_search() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/catalog/search"))
        .and(body_json(json!({
            "q": "intro",
            "facets": [],
            "limit": 21,
            "offset": 0,
            "filter": r"title='it\'s'"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(meili_page()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("search.toml");
    std::fs::write(
        &config_path,
        format!(
            "engine = \"meilisearch\"\nindex_uid = \"catalog\"\nescape_filter_values = true\n\n[connection]\nurl = \"{}\"\ntoken = \"{TOKEN}\"\n",
            server.uri()
        ),
    )
    .expect("write config");

    let config = ClientConfig::from_file(&config_path).expect("load config");
    let filters = FilterSet::new().with("title", "it's");
    let page = search_adapter::search(&config, "intro", &filters)
        .await
        .expect("search");
    assert_eq!(page.results.len(), 1);
}
