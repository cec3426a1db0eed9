//! Integration tests for global search: aggregation of the three entity
//! collections, per-item isolation and the query precheck.

use kbank_client::{ApiClient, ApiConfig};
use kbank_core::{EntityKind, Error, Strictness, ValidationScope};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(&server.uri()).expect("mock server uri is valid");
    ApiClient::new(config).expect("client builds")
}

fn combined() -> Value {
    json!({
        "workspaces": [
            {"id": "ab12cd34", "name": "Rust research", "description": ""}
        ],
        "threads": [
            {"id": "t-1", "title": "Rust lifetimes", "workspace_id": "ab12cd34", "tags": ["rust"]},
            {"id": "t-2", "title": null, "workspace_id": "ab12cd34", "tags": []}
        ],
        "documents": [
            {"id": "d-1", "name": "rust-book.pdf", "workspace_id": "ab12cd34", "extension": ".pdf", "status": "indexed"},
            {"name": ["not", "a", "string"], "workspace_id": "ab12cd34"},
            {"id": "d-3", "name": "rustonomicon.md", "workspace_id": "ab12cd34", "extension": null, "status": "ready"}
        ]
    })
}

#[tokio::test]
async fn test_bare_response_drops_malformed_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("q", "rust"))
        .and(query_param("workspace_id", "ab12cd34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(combined()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .search()
        .global("  rust  ", Some("ab12cd34"))
        .await
        .unwrap();

    assert_eq!(outcome.results.workspaces.len(), 1);
    assert_eq!(outcome.results.threads.len(), 2);
    assert_eq!(outcome.results.documents.len(), 2);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, EntityKind::Document);
    assert_eq!(outcome.diagnostics[0].path(), "documents[1]");

    // Unmodeled fields survive validation
    let doc = &outcome.results.documents[0];
    assert_eq!(doc.extra_field("status"), Some(&json!("indexed")));
    assert_eq!(outcome.results.threads[0].display_label(), "Rust lifetimes");
}

#[tokio::test]
async fn test_enveloped_response_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "code": "SUCCESS",
            "message": "ok",
            "data": combined()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server).search().global("rust", None).await.unwrap();

    assert_eq!(outcome.results.len(), 5);
    assert!(!outcome.is_complete());
}

#[tokio::test]
async fn test_strict_mode_fails_on_bad_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(combined()))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search()
        .with_strictness(Strictness::Strict)
        .global("rust", None)
        .await
        .unwrap_err();

    match err {
        Error::Validation(v) => {
            assert!(v.has_path("documents[1].id"));
            assert!(v.has_path("documents[1].name"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_short_query_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(combined()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for query in ["", " ", "r", "  r  "] {
        let err = client.search().global(query, None).await.unwrap_err();
        match err {
            Error::Validation(v) => assert_eq!(v.paths(), vec!["q"], "{:?}", query),
            other => panic!("Expected validation error for {:?}, got {:?}", query, other),
        }
    }
}

#[tokio::test]
async fn test_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workspaces": [],
            "threads": [],
            "documents": []
        })))
        .mount(&server)
        .await;

    let outcome = client_for(&server).search().global("zz", None).await.unwrap();

    assert!(outcome.results.is_empty());
    assert!(outcome.is_complete());
}

async fn search_body(body: Value) -> Error {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    client_for(&server).search().global("rust", None).await.unwrap_err()
}

#[tokio::test]
async fn test_envelope_without_success_flag_is_rejected() {
    let err = search_body(json!({
        "code": "SUCCESS",
        "message": "ok",
        "data": combined()
    }))
    .await;

    match err {
        Error::Validation(v) => {
            assert_eq!(v.paths(), vec!["success"]);
            assert_eq!(v.scope(), ValidationScope::Envelope);
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unrelated_object_is_not_an_empty_result() {
    let err = search_body(json!({"detail": "oops"})).await;

    match err {
        Error::Validation(v) => {
            let mut paths = v.paths();
            paths.sort_unstable();
            assert_eq!(paths, vec!["documents", "threads", "workspaces"]);
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_enveloped_missing_collection_is_payload_error() {
    let err = search_body(json!({
        "success": true,
        "code": "SUCCESS",
        "message": "ok",
        "data": {"workspaces": [], "threads": []}
    }))
    .await;

    match err {
        Error::Validation(v) => {
            assert_eq!(v.paths(), vec!["data.documents"]);
            assert_eq!(v.scope(), ValidationScope::Payload);
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}
