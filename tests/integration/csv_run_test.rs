//! CSV End-to-End Tests
//!
//! Full runs through `commands::run`: CSV files on disk, the
//! OpenAI-compatible provider, and a wiremock chat-completions endpoint.

use std::fs;
use std::path::Path;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relabel::commands;
use relabel::storage::read_csv;
use relabel::{LoadSource, RunConfig};

// ============================================================================
// Helpers
// ============================================================================

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "model": "deepseek-r1-distill-qwen-7b",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// Reply `content` to requests whose body mentions `needle`.
async fn reply_for(server: &MockServer, needle: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(needle))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(server)
        .await;
}

/// Everything not matched earlier fails with a server error.
async fn fail_the_rest(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(server)
        .await;
}

fn config(server: &MockServer, dir: &Path, interval: usize) -> RunConfig {
    RunConfig {
        input_path: dir.join("Suicide_Detection.csv"),
        checkpoint_path: dir.join("out").join("relabeled.csv"),
        checkpoint_interval: interval,
        endpoint_url: format!("{}/v1/chat/completions", server.uri()),
        ..Default::default()
    }
}

const INPUT: &str = "\
id,text,class
0,first post,suicide ideation
1,\"second post, with a comma\",NOT SUICIDE IDEATION
2,third post,suicide ideation
";

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_run_writes_checkpoint_and_resumes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Suicide_Detection.csv"), INPUT).unwrap();

    // run 1: third post fails at the endpoint
    let server = MockServer::start().await;
    reply_for(&server, "first post", "Not Suicide Ideation").await;
    reply_for(&server, "second post", "not suicide ideation").await;
    fail_the_rest(&server).await;

    let cfg = config(&server, dir.path(), 1000);
    let summary = commands::run(cfg.clone()).await.unwrap();
    assert_eq!(summary.source, LoadSource::Input);
    assert_eq!(summary.newly_processed, 2);
    assert_eq!(summary.unknown, 1);
    assert_eq!(summary.remaining, 1);

    let out = read_csv(&cfg.checkpoint_path).unwrap();
    assert_eq!(
        out.headers(),
        &["id", "text", "class", "New_Class", "Changed", "Reclassified"]
    );
    assert_eq!(out.cell(0, "New_Class"), Some("not suicide ideation"));
    assert_eq!(out.cell(0, "Changed"), Some("True"));
    assert_eq!(out.cell(1, "text"), Some("second post, with a comma"));
    assert_eq!(out.cell(1, "Changed"), Some("False"));
    assert_eq!(out.cell(2, "Reclassified"), Some("0"));
    // input is never rewritten
    assert_eq!(fs::read_to_string(&cfg.input_path).unwrap(), INPUT);

    // run 2: endpoint healthy, only the third post is sent
    let server = MockServer::start().await;
    reply_for(&server, "third post", "suicide ideation").await;
    fail_the_rest(&server).await;

    let cfg = config(&server, dir.path(), 1000);
    let summary = commands::run(cfg.clone()).await.unwrap();
    assert_eq!(summary.source, LoadSource::Checkpoint);
    assert_eq!(summary.newly_processed, 1);
    assert_eq!(summary.remaining, 0);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    let out = read_csv(&cfg.checkpoint_path).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out.cell(2, "New_Class"), Some("suicide ideation"));
    assert_eq!(out.cell(2, "Changed"), Some("False"));
    assert_eq!(out.cell(2, "Reclassified"), Some("1"));
}

#[tokio::test]
async fn test_completed_dataset_is_not_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Suicide_Detection.csv"), INPUT).unwrap();

    let server = MockServer::start().await;
    reply_for(&server, "post", "suicide ideation").await;

    let cfg = config(&server, dir.path(), 2);
    let first = commands::run(cfg.clone()).await.unwrap();
    assert_eq!(first.newly_processed, 3);
    assert_eq!(first.persists, 2);
    let snapshot = fs::read(&cfg.checkpoint_path).unwrap();

    let second = commands::run(cfg.clone()).await.unwrap();
    assert!(second.skipped_run);
    assert_eq!(second.persists, 0);
    assert_eq!(fs::read(&cfg.checkpoint_path).unwrap(), snapshot);
    // three requests from the first run, none from the second
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_out_of_set_replies_leave_rows_pending() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Suicide_Detection.csv"), INPUT).unwrap();

    let server = MockServer::start().await;
    reply_for(&server, "post", "<think>hmm").await;

    let cfg = config(&server, dir.path(), 1);
    let summary = commands::run(cfg.clone()).await.unwrap();
    assert_eq!(summary.newly_processed, 0);
    assert_eq!(summary.unknown, 3);
    assert_eq!(summary.persists, 1);

    let out = read_csv(&cfg.checkpoint_path).unwrap();
    for row in 0..3 {
        assert_eq!(out.cell(row, "Reclassified"), Some("0"));
        assert_eq!(out.cell(row, "New_Class"), Some(""));
    }
}

#[tokio::test]
async fn test_custom_labels_and_columns() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Suicide_Detection.csv"),
        "body,category,extra\nbuy now,Spam,keep-me\nhello friend,ham,keep-me-too\n",
    )
    .unwrap();

    let server = MockServer::start().await;
    reply_for(&server, "buy now", "spam").await;
    reply_for(&server, "hello friend", "SPAM").await;

    let mut cfg = config(&server, dir.path(), 1000);
    cfg.labels = vec!["spam".to_string(), "ham".to_string()];
    cfg.columns.text = "body".to_string();
    cfg.columns.label = "category".to_string();
    cfg.columns.processed = "done".to_string();

    let summary = commands::run(cfg.clone()).await.unwrap();
    assert_eq!(summary.newly_processed, 2);

    let out = read_csv(&cfg.checkpoint_path).unwrap();
    assert_eq!(out.cell(0, "Changed"), Some("False"));
    assert_eq!(out.cell(1, "Changed"), Some("True"));
    assert_eq!(out.cell(1, "done"), Some("1"));
    assert_eq!(out.cell(1, "extra"), Some("keep-me-too"));

    // the prompt lists the configured labels
    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("'spam' or 'ham'"));
}

#[tokio::test]
async fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;

    let cfg = config(&server, dir.path(), 10);
    let err = commands::run(cfg.clone()).await.unwrap_err();
    assert!(matches!(err, relabel::AppError::Io(_)));
    assert!(!cfg.checkpoint_path.exists());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_status_after_partial_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Suicide_Detection.csv"), INPUT).unwrap();

    let server = MockServer::start().await;
    reply_for(&server, "first post", "not suicide ideation").await;
    fail_the_rest(&server).await;

    let cfg = config(&server, dir.path(), 1000);
    commands::run(cfg.clone()).await.unwrap();

    let status = commands::status(&cfg).unwrap();
    assert_eq!(status.source, LoadSource::Checkpoint);
    assert_eq!(status.total_rows, 3);
    assert_eq!(status.processed, 1);
    assert_eq!(status.pending, 2);
    assert_eq!(status.changed, 1);
}
