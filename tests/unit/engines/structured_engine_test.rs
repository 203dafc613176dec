// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use privacylens::domain::models::content::FetchMethod;
use privacylens::engines::structured_engine::StructuredScrapeEngine;
use privacylens::engines::traits::{FetchError, PolicyFetcher};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(server: &MockServer) -> StructuredScrapeEngine {
    StructuredScrapeEngine::new(
        "fc-test-key".to_string(),
        server.uri(),
        Duration::from_secs(2),
    )
}

fn long_markdown() -> String {
    "# Privacy Policy\n\nWe collect personal information as described below. ".repeat(10)
}

#[tokio::test]
async fn test_enveloped_response_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(header("Authorization", "Bearer fc-test-key"))
        .and(body_partial_json(serde_json::json!({
            "formats": ["markdown"],
            "onlyMainContent": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "markdown": long_markdown(),
                "metadata": {"title": "Privacy Policy"},
            },
        })))
        .mount(&server)
        .await;

    let content = engine(&server)
        .fetch("https://example.com/privacy")
        .await
        .unwrap();

    assert_eq!(content.method, FetchMethod::StructuredScrape);
    assert_eq!(content.title.as_deref(), Some("Privacy Policy"));
    assert!(content.raw_text.contains("personal information"));
}

#[tokio::test]
async fn test_bare_response_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "markdown": long_markdown(),
        })))
        .mount(&server)
        .await;

    let content = engine(&server)
        .fetch("https://example.com/privacy")
        .await
        .unwrap();

    assert_eq!(content.method, FetchMethod::StructuredScrape);
    assert!(content.title.is_none());
}

#[tokio::test]
async fn test_unknown_envelope_fails_loudly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "html": "<p>not the contract we know</p>",
        })))
        .mount(&server)
        .await;

    let err = engine(&server)
        .fetch("https://example.com/privacy")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::BadEnvelope));
}

#[tokio::test]
async fn test_short_markdown_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "markdown": "too short",
        })))
        .mount(&server)
        .await;

    let err = engine(&server)
        .fetch("https://example.com/privacy")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::ContentTooShort { .. }));
}

#[tokio::test]
async fn test_service_error_status_is_propagated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = engine(&server)
        .fetch("https://example.com/privacy")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::BadStatus(502)));
}
