//! Integration tests for workspace operations against a mock backend.
//!
//! Covers envelope unwrapping, payload validation paths, the status-code
//! policy and the local checks that must never reach the network.

use kbank_client::{ApiClient, ApiConfig};
use kbank_core::{CreateWorkspaceInput, Error, TransportError, UpdateWorkspaceInput, ValidationScope};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(&server.uri()).expect("mock server uri is valid");
    ApiClient::new(config).expect("client builds")
}

fn success(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "code": "SUCCESS",
        "message": "ok",
        "data": data
    }))
}

fn workspace(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "embedding_dim": 1536,
        "status": "active",
        "description": null,
        "stats": {"thread_count": 2, "doc_count": 5}
    })
}

#[tokio::test]
async fn test_list_sends_json_content_type_and_validates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .and(header("Content-Type", "application/json"))
        .respond_with(success(json!([
            workspace("ab12cd34", "Research"),
            workspace("zz99yy88", "Personal")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let workspaces = client_for(&server).workspaces().list().await.unwrap();

    assert_eq!(workspaces.len(), 2);
    assert_eq!(workspaces[0].id.as_str(), "ab12cd34");
    assert!(workspaces[0].description.is_null());
    assert_eq!(
        workspaces[1].stats.as_option().and_then(|s| s.doc_count),
        Some(5)
    );
}

#[tokio::test]
async fn test_list_keeps_rows_next_to_seeded_default_workspace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .respond_with(success(json!([
            workspace("default", "Default"),
            workspace("ab12cd34", "Research"),
            workspace("zz99yy88", "Personal")
        ])))
        .mount(&server)
        .await;

    let listing = client_for(&server).workspaces().list().await.unwrap();

    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].id.as_str(), "ab12cd34");
    assert_eq!(listing[1].id.as_str(), "zz99yy88");
    assert_eq!(listing.diagnostics.len(), 1);
    assert_eq!(listing.diagnostics[0].index, 0);
    assert_eq!(listing.diagnostics[0].located().paths(), vec!["[0].id"]);
}

#[tokio::test]
async fn test_list_non_array_payload_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .respond_with(success(json!({"workspaces": []})))
        .mount(&server)
        .await;

    let err = client_for(&server).workspaces().list().await.unwrap_err();

    match err {
        Error::Validation(v) => {
            assert_eq!(v.paths(), vec!["data"]);
            assert_eq!(v.scope(), ValidationScope::Payload);
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_posts_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspaces"))
        .and(body_json(json!({"name": "My Workspace 1.0-beta", "embedding_dim": 1536})))
        .respond_with(success(workspace("ab12cd34", "My Workspace 1.0-beta")))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .workspaces()
        .create(&CreateWorkspaceInput::new("My Workspace 1.0-beta"))
        .await
        .unwrap();

    assert_eq!(created.name, "My Workspace 1.0-beta");
}

#[tokio::test]
async fn test_create_rejected_names_never_reach_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspaces"))
        .respond_with(success(workspace("ab12cd34", "x")))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client
        .workspaces()
        .create(&CreateWorkspaceInput::new("bad/name"))
        .await
        .unwrap_err();
    match err {
        Error::NameRejected { name, illegal } => {
            assert_eq!(name, "bad/name");
            assert_eq!(illegal, vec!['/']);
        }
        other => panic!("Expected NameRejected, got {:?}", other),
    }

    let err = client
        .workspaces()
        .create(&CreateWorkspaceInput::new("x".repeat(51)))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_workspace_scoped_routes_check_id_length() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for bad in ["abc", "abcdefghi", ""] {
        let err = client.workspaces().details(bad).await.unwrap_err();
        match err {
            Error::Validation(v) => assert_eq!(v.paths(), vec!["id"], "{}", bad),
            other => panic!("Expected validation error for {:?}, got {:?}", bad, other),
        }
    }
}

#[tokio::test]
async fn test_details_includes_threads_and_documents() {
    let server = MockServer::start().await;
    let mut detail = workspace("ab12cd34", "Research");
    detail["threads"] = json!([{"id": "t1", "title": "Plans"}]);
    detail["documents"] = json!([]);
    detail["settings"] = json!({"search_limit": 8});
    Mock::given(method("GET"))
        .and(path("/workspaces/ab12cd34/details"))
        .respond_with(success(detail))
        .expect(1)
        .mount(&server)
        .await;

    let detail = client_for(&server).workspaces().details("ab12cd34").await.unwrap();

    assert_eq!(detail.workspace.name, "Research");
    assert_eq!(detail.threads.len(), 1);
    assert_eq!(detail.settings.as_option().unwrap()["search_limit"], 8);
}

#[tokio::test]
async fn test_update_requires_a_field() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/workspaces/ab12cd34"))
        .and(body_json(json!({"description": "Notes on systems"})))
        .respond_with(success(workspace("ab12cd34", "Research")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .workspaces()
        .update("ab12cd34", &UpdateWorkspaceInput::describe("Notes on systems"))
        .await
        .unwrap();

    let err = client
        .workspaces()
        .update("ab12cd34", &UpdateWorkspaceInput::default())
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_delete_returns_ack() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/workspaces/ab12cd34"))
        .and(query_param("vault_delete", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "code": "WORKSPACE_DELETED",
            "message": "Workspace deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .workspaces()
        .delete("ab12cd34", true)
        .await
        .unwrap();

    assert_eq!(ack.code, "WORKSPACE_DELETED");
}

#[tokio::test]
async fn test_failure_envelope_becomes_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspaces/ab12cd34/share-document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "code": "DOCUMENT_NOT_FOUND",
            "message": "Document paper.pdf not found",
            "data": {"source_name": "paper.pdf"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .workspaces()
        .share_document("ab12cd34", "paper.pdf", "zz99yy88")
        .await
        .unwrap_err();

    assert!(err.is_application());
    assert_eq!(err.code(), Some("DOCUMENT_NOT_FOUND"));
}

#[tokio::test]
async fn test_error_status_with_envelope_is_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces/ab12cd34/details"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "code": "NOT_FOUND",
            "message": "Workspace ab12cd34 not found",
            "data": {"workspace_id": "ab12cd34"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).workspaces().details("ab12cd34").await.unwrap_err();

    assert_eq!(err.code(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_error_status_without_envelope_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).workspaces().list().await.unwrap_err();

    assert!(matches!(err, Error::Transport(TransportError::Status(502))));
}

#[tokio::test]
async fn test_success_without_data_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "code": "SUCCESS",
            "message": "ok"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).workspaces().list().await.unwrap_err();

    match err {
        Error::Validation(v) => assert!(v.has_path("data")),
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_envelope_references_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": "yes",
            "code": "SUCCESS",
            "message": "ok",
            "data": []
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).workspaces().list().await.unwrap_err();

    match err {
        Error::Validation(v) => {
            assert!(v.has_path("success"));
            assert_eq!(v.scope(), ValidationScope::Envelope);
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}
