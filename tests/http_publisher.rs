//! Integration tests for the HTTP artifact publisher using wiremock
//!
//! These tests verify uploads against mocked storage endpoints, including
//! rejected uploads and missing scripts.

use gluegen::{ArtifactPublisher, HttpArtifactPublisher, PublishError};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{bearer_token, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_script(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("script should be written");
    path
}

/// Successful PUT returns the durable s3:// location
#[tokio::test]
async fn test_upload_returns_s3_location() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "etl.py", "print('etl')");

    Mock::given(method("PUT"))
        .and(path("/my-bucket/glueJobs/etl.py"))
        .and(header("content-type", "application/octet-stream"))
        .and(body_string("print('etl')"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = HttpArtifactPublisher::new(&server.uri(), None).unwrap();
    let uri = publisher
        .publish(&script, "my-bucket", "glueJobs/")
        .await
        .expect("upload should succeed");

    assert_eq!(uri, "s3://my-bucket/glueJobs/etl.py");
}

/// Bearer token is forwarded when configured
#[tokio::test]
async fn test_upload_sends_bearer_token() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "load.py", "pass");

    Mock::given(method("PUT"))
        .and(path("/deploy/jobs/load.py"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let publisher =
        HttpArtifactPublisher::new(&server.uri(), Some("test-token".to_string())).unwrap();
    let uri = publisher.publish(&script, "deploy", "jobs").await.unwrap();

    assert_eq!(uri, "s3://deploy/jobs/load.py");
}

/// 403 response surfaces as a rejected upload
#[tokio::test]
async fn test_403_is_rejected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "etl.py", "print('etl')");

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string("<Error>AccessDenied</Error>"))
        .mount(&server)
        .await;

    let publisher = HttpArtifactPublisher::new(&server.uri(), None).unwrap();
    let err = publisher
        .publish(&script, "restricted", "glueJobs/")
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Rejected { status: 403 }));
}

/// Missing local script never reaches the network
#[tokio::test]
async fn test_missing_script_is_read_error() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let publisher = HttpArtifactPublisher::new(&server.uri(), None).unwrap();
    let err = publisher
        .publish(
            std::path::Path::new("/nonexistent/etl.py"),
            "my-bucket",
            "glueJobs/",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::ReadScript { .. }));
}

/// Unreachable endpoint is a request error
#[tokio::test]
async fn test_unreachable_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "etl.py", "print('etl')");

    let publisher = HttpArtifactPublisher::new("http://127.0.0.1:1", None).unwrap();
    let err = publisher
        .publish(&script, "my-bucket", "glueJobs/")
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Request(_)));
}
