//! Mock HTTP tests for AnalysisClient.
//!
//! These tests cover:
//! - Request formatting (path, headers, JSON body)
//! - Normalization of partial responses
//! - The connection-failed fallback on server and network errors

use std::time::Duration;

use snipcheck::analysis::{AnalysisClient, AnalysisError, AnalysisResult};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AnalysisClient {
    AnalysisClient::with_endpoint(&format!("{}/analyze", server.uri())).unwrap()
}

#[tokio::test]
async fn test_sends_bare_base64_and_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"file": "iVBORw0KGgo=", "type": "image"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"score": 50})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .try_analyze("data:image/png;base64,iVBORw0KGgo=")
        .await
        .unwrap();

    assert_eq!(result.score, 50);
}

#[tokio::test]
async fn test_full_response_is_normalized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "score": 92,
            "label": "Truth",
            "reasoning_points": [
                {"title": "Quote", "detail": "Verified transcript", "bullets": ["Aired 2024"]},
                {"title": "Image"}
            ],
            "sources": [
                "https://www.reuters.com/fact-check/1",
                {"url": "https://apnews.com/2", "site_name": "AP News"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).analyze("AAAA").await;

    assert_eq!(result.score, 92);
    assert_eq!(result.label, "Truth");
    assert_eq!(result.reasoning_points.len(), 2);
    assert_eq!(result.reasoning_points[0].bullets, vec!["Aired 2024"]);
    assert!(result.reasoning_points[1].detail.is_none());
    assert_eq!(result.sources[0].site_name, "reuters.com");
    assert_eq!(result.sources[1].site_name, "AP News");
}

#[tokio::test]
async fn test_empty_object_gets_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).analyze("AAAA").await;
    assert_eq!(result, AnalysisResult::default());
}

#[tokio::test]
async fn test_server_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.try_analyze("AAAA").await.unwrap_err();
    assert!(matches!(err, AnalysisError::Server { status: 500 }));

    let result = client.analyze("AAAA").await;
    assert_eq!(result, AnalysisResult::connection_failed());
}

#[tokio::test]
async fn test_invalid_json_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(matches!(
        client.try_analyze("AAAA").await,
        Err(AnalysisError::Decode(_))
    ));
    assert!(client.analyze("AAAA").await.is_error());
}

#[tokio::test]
async fn test_unreachable_server_falls_back() {
    let client = AnalysisClient::with_timeouts(
        "http://127.0.0.1:9/analyze",
        Duration::from_secs(2),
        Duration::from_secs(1),
    )
    .unwrap();

    let err = client.try_analyze("AAAA").await.unwrap_err();
    assert!(matches!(err, AnalysisError::Http(_)));

    let result = client.analyze("AAAA").await;
    assert_eq!(result.label, "Error");
    assert_eq!(result.reasoning_points[0].title, "Connection Failed");
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"score": 99}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = AnalysisClient::with_timeouts(
        &format!("{}/analyze", mock_server.uri()),
        Duration::from_millis(300),
        Duration::from_secs(1),
    )
    .unwrap();

    let result = client.analyze("AAAA").await;
    assert!(result.is_error());
}

#[tokio::test]
async fn test_numeric_label_is_not_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "score": 90,
            "label": 5,
            "sources": ["https://apnews.com/1"]
        })))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).try_analyze("AAAA").await.unwrap();
    assert_eq!(result.score, 90);
    assert_eq!(result.label, "5");
    assert!(!result.is_error());
}
