//! HTTP-level tests for OpenAiClient against a mock server.

use std::collections::BTreeMap;

use wiremock::matchers::{
    body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::types::{RunStatus, Upload};

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(OpenAiConfig::new("sk-test").with_base_url(server.uri())).unwrap()
}

fn run_json(status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "run_1",
        "object": "thread.run",
        "thread_id": "thread_1",
        "assistant_id": "asst_1",
        "status": status,
        "last_error": null
    })
}

#[test]
fn url_joins_without_double_slashes() {
    let client =
        OpenAiClient::new(OpenAiConfig::new("sk").with_base_url("http://host/v1/")).unwrap();
    assert_eq!(client.url("/threads"), "http://host/v1/threads");
    assert_eq!(client.url("files/f1"), "http://host/v1/files/f1");
}

#[test]
fn config_debug_redacts_key() {
    let dbg = format!("{:?}", OpenAiConfig::new("sk-secret"));
    assert!(!dbg.contains("sk-secret"));
    assert!(dbg.contains("[REDACTED]"));
}

#[tokio::test]
async fn upload_file_sends_multipart_with_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("openai-beta", "assistants=v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "file-abc",
            "object": "file",
            "bytes": 4,
            "filename": "site.pdf",
            "purpose": "assistants"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let file = client
        .upload_file(&Upload::new("site.pdf", b"%PDF".to_vec()))
        .await
        .unwrap();

    assert_eq!(file.id, "file-abc");
    assert_eq!(file.filename, "site.pdf");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"purpose\""));
    assert!(body.contains("assistants"));
    assert!(body.contains("filename=\"site.pdf\""));
}

#[tokio::test]
async fn create_thread_carries_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/threads"))
        .and(body_partial_json(serde_json::json!({
            "metadata": { "session_id": "sess-1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "thread_1",
            "object": "thread",
            "metadata": { "session_id": "sess-1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut metadata = BTreeMap::new();
    metadata.insert("session_id".to_string(), "sess-1".to_string());

    let thread = client_for(&server).create_thread(&metadata).await.unwrap();
    assert_eq!(thread.id, "thread_1");
}

#[tokio::test]
async fn create_message_attaches_files_for_search() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/threads/thread_1/messages"))
        .and(body_partial_json(serde_json::json!({
            "role": "user",
            "content": "hello",
            "attachments": [
                { "file_id": "file-a", "tools": [{ "type": "file_search" }] },
                { "file_id": "file-b", "tools": [{ "type": "file_search" }] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_1",
            "role": "user",
            "content": [{ "type": "text", "text": { "value": "hello", "annotations": [] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = client_for(&server)
        .create_message("thread_1", "hello", &["file-a".into(), "file-b".into()])
        .await
        .unwrap();
    assert_eq!(message.id, "msg_1");
    assert_eq!(message.content[0].text, "hello");
}

#[tokio::test]
async fn create_message_without_files_omits_attachments() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/threads/thread_1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_2",
            "role": "user",
            "content": []
        })))
        .mount(&server)
        .await;

    client_for(&server)
        .create_message("thread_1", "just text", &[])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("attachments").is_none());
}

#[tokio::test]
async fn run_lifecycle_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/threads/thread_1/runs"))
        .and(body_partial_json(serde_json::json!({ "assistant_id": "asst_1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_json("queued")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/threads/thread_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_json("in_progress")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/threads/thread_1/runs/run_1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_json("cancelling")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let run = client.create_run("thread_1", "asst_1").await.unwrap();
    assert_eq!(run.status, RunStatus::Queued);
    assert_eq!(run.thread_id, "thread_1");

    let run = client.retrieve_run("thread_1", "run_1").await.unwrap();
    assert_eq!(run.status, RunStatus::InProgress);

    let run = client.cancel_run("thread_1", "run_1").await.unwrap();
    assert_eq!(run.status, RunStatus::Cancelling);
}

#[tokio::test]
async fn list_messages_follows_pagination() {
    let server = MockServer::start().await;

    let text = |value: &str| {
        serde_json::json!([{ "type": "text", "text": { "value": value, "annotations": [] } }])
    };

    Mock::given(method("GET"))
        .and(path("/threads/thread_1/messages"))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [
                { "id": "m3", "role": "assistant", "content": text("third") },
                { "id": "m2", "role": "user", "content": text("second") }
            ],
            "first_id": "m3",
            "last_id": "m2",
            "has_more": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/threads/thread_1/messages"))
        .and(query_param("after", "m2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [{ "id": "m1", "role": "user", "content": text("first") }],
            "first_id": "m1",
            "last_id": "m1",
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = client_for(&server).list_messages("thread_1").await.unwrap();
    let ids: Vec<_> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["m3", "m2", "m1"]);
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assistants/asst_1"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .retrieve_assistant("asst_1")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::RateLimited));
}

#[tokio::test]
async fn server_error_includes_status_and_truncated_body() {
    let server = MockServer::start().await;
    let long_body = "x".repeat(500);

    Mock::given(method("GET"))
        .and(path("/files/file-a"))
        .respond_with(ResponseTemplate::new(500).set_body_string(long_body))
        .mount(&server)
        .await;

    let err = client_for(&server).retrieve_file("file-a").await.unwrap_err();
    match err {
        ChatError::ApiError(msg) => {
            assert!(msg.starts_with("HTTP 500"));
            assert!(msg.len() < 260);
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assistants/asst_1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .retrieve_assistant("asst_1")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::ParseError(_)));
}
