/// End-to-end checks of the response contract: envelope plus entity
/// validation as a caller sees it, without any transport.
///
/// Each test feeds a complete response body through `unwrap_envelope` (or
/// the search aggregator) and asserts on the typed value or on the
/// violation paths reported.
use kbank_core::{
    illegal_chars_found, is_name_valid, unwrap_envelope, validate, AppSettings,
    CreateWorkspaceInput, Error, SearchAggregator, ToolDefinition, ValidationScope, Workspace,
};
use serde_json::{json, Value};

fn envelope(data: Value) -> Value {
    json!({
        "success": true,
        "code": "SUCCESS",
        "message": "ok",
        "data": data
    })
}

#[test]
fn test_valid_payload_round_trips_through_envelope() {
    let data = json!({
        "id": "ab12cd34",
        "name": "Research",
        "embedding_dim": 768,
        "rag_config_hash": "c0ffee",
        "status": "archived",
        "description": "Papers and notes",
        "created_at": "2024-05-01T10:00:00"
    });

    let workspace: Workspace = unwrap_envelope(&envelope(data.clone())).unwrap();

    assert_eq!(serde_json::to_value(&workspace).unwrap(), data);
}

#[test]
fn test_tool_config_round_trips_through_envelope() {
    let data = json!({
        "id": "weather",
        "name": "Weather",
        "description": "Current conditions",
        "type": "mcp",
        "enabled": false,
        "config": {"server": "stdio://weather", "retries": 2, "nested": {"a": [1, null]}}
    });

    let tool: ToolDefinition = unwrap_envelope(&envelope(data.clone())).unwrap();

    assert_eq!(serde_json::to_value(&tool).unwrap(), data);
}

#[test]
fn test_success_flag_must_be_boolean() {
    for body in [
        json!({"code": "SUCCESS", "message": "ok", "data": {}}),
        json!({"success": "true", "code": "SUCCESS", "message": "ok", "data": {}}),
        json!({"success": 1, "code": "SUCCESS", "message": "ok", "data": {}}),
    ] {
        match unwrap_envelope::<Value>(&body).unwrap_err() {
            Error::Validation(v) => {
                assert!(v.has_path("success"), "{}", body);
                assert_eq!(v.scope(), ValidationScope::Envelope);
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}

#[test]
fn test_every_payload_violation_is_reported() {
    let data = json!({
        "llm_provider": "openai",
        "llm_model": 4,
        "embedding_provider": "openai",
        "search_limit": 0,
        "hybrid_alpha": 1.1
    });

    match unwrap_envelope::<AppSettings>(&envelope(data)).unwrap_err() {
        Error::Validation(v) => {
            let mut paths = v.paths();
            paths.sort_unstable();
            assert_eq!(
                paths,
                vec![
                    "data.embedding_model",
                    "data.hybrid_alpha",
                    "data.llm_model",
                    "data.search_limit"
                ]
            );
            assert_eq!(v.scope(), ValidationScope::Payload);
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn test_failure_envelope_carries_backend_code() {
    let body = json!({
        "success": false,
        "code": "WORKSPACE_EXISTS",
        "message": "A workspace named Research already exists"
    });

    let err = unwrap_envelope::<Workspace>(&body).unwrap_err();

    assert!(err.is_application());
    assert_eq!(err.code(), Some("WORKSPACE_EXISTS"));
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn test_workspace_id_length_is_independent_of_content() {
    let base = |id: &str| {
        json!({
            "id": id,
            "name": "Research",
            "embedding_dim": 1536
        })
    };

    for id in ["ab12cd3", "ab12cd345", ""] {
        let err = validate::<Workspace>(&base(id)).unwrap_err();
        assert_eq!(err.paths(), vec!["id"], "{:?}", id);
    }
    for id in ["ab12cd34", "////////", "日本語テキスト漢"] {
        assert!(validate::<Workspace>(&base(id)).is_ok(), "{:?}", id);
    }
}

#[test]
fn test_name_validators_agree() {
    for name in ["plain", "a/b:c", "", "<|>", "tab\there", "naïve?"] {
        assert_eq!(is_name_valid(name), illegal_chars_found(name).is_empty(), "{:?}", name);
    }
    assert_eq!(illegal_chars_found("a/b:c"), vec!['/', ':']);
}

#[test]
fn test_create_workspace_input_name_rules() {
    assert!(CreateWorkspaceInput::new("My Workspace 1.0-beta").validate().is_ok());

    let err = CreateWorkspaceInput::new("bad/name").validate().unwrap_err();
    assert_eq!(err.paths(), vec!["name"]);
}

#[test]
fn test_separately_fetched_collections_aggregate() {
    let workspaces = json!([{"id": "ab12cd34", "name": "Research"}]);
    let threads = json!([{"id": "t-1", "title": "Plans", "workspace_id": "ab12cd34"}]);
    let documents = json!([
        {"id": "d-1", "name": "a.pdf"},
        {"id": "d-2", "name": "b.pdf"},
        {"id": 3, "name": "c.pdf"},
        {"id": "d-4", "name": "d.pdf", "page_count": 12}
    ]);

    let outcome = SearchAggregator::default()
        .from_collections(&workspaces, &threads, &documents)
        .unwrap();

    assert_eq!(outcome.results.documents.len(), 3);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].index, 2);

    // Pass-through fields serialize back out unchanged
    let out = serde_json::to_value(&outcome.results.documents[2]).unwrap();
    assert_eq!(out, json!({"id": "d-4", "name": "d.pdf", "page_count": 12}));
}
