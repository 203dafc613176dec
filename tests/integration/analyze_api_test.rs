// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    build_test_app, completion_body, policy_page_html, reference_scoring_json, test_settings,
};
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_invalid_url_returns_400() {
    let scoring = MockServer::start().await;
    let app = build_test_app(test_settings(&scoring.uri(), "sk-test"));

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({"url": "exa mple.com"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid_url");
    assert!(body["message"].as_str().unwrap().contains("whitespace"));
}

#[tokio::test]
async fn test_missing_url_returns_400() {
    let scoring = MockServer::start().await;
    let app = build_test_app(test_settings(&scoring.uri(), "sk-test"));

    let response = app.server.post("/v1/analyze").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "invalid_url");
}

#[tokio::test]
async fn test_full_pipeline_with_reference_scores() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(policy_page_html()))
        .mount(&site)
        .await;

    let scoring = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(&reference_scoring_json())),
        )
        .mount(&scoring)
        .await;

    let app = build_test_app(test_settings(&scoring.uri(), "sk-test"));
    let target = format!("{}/privacy", site.uri());

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({"url": target}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    let data = &body["data"];
    // (9*30 + 8*25 + 7*20 + 9*15 + 8*7 + 9*3) / 100 = 8.28
    assert_eq!(data["overallScore"], 8.28);
    assert_eq!(data["grade"], "B+");
    assert_eq!(data["riskLevel"], "LOW");
    assert_eq!(data["scraperUsed"], "fetch");
    assert_eq!(data["hostname"], "127.0.0.1");
    assert_eq!(data["categories"]["data_collection"]["score"], 9.0);
    assert_eq!(data["positivePractices"][0], "short retention windows");
    assert!(data["contentLength"].as_u64().unwrap() > 500);
}

#[tokio::test]
async fn test_non_policy_content_returns_invalid_content() {
    let site = MockServer::start().await;
    // Long enough to clear the fetch threshold, but no policy language
    // and below the 500-char validation minimum for the raw-HTTP path.
    let lorem = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do ".repeat(5);
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_string(format!("<html><body>{}</body></html>", lorem)))
        .mount(&site)
        .await;

    let scoring = MockServer::start().await;
    let app = build_test_app(test_settings(&scoring.uri(), "sk-test"));

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({"url": format!("{}/privacy", site.uri())}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "invalid_content");
}

#[tokio::test]
async fn test_exhausted_strategies_return_400_with_attempts() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let scoring = MockServer::start().await;
    let app = build_test_app(test_settings(&scoring.uri(), "sk-test"));

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({"url": format!("{}/privacy", site.uri())}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "content_extraction_failed");
    assert!(body["message"].as_str().unwrap().contains("fetch"));
}

#[tokio::test]
async fn test_scoring_rate_limit_maps_to_429() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(policy_page_html()))
        .mount(&site)
        .await;

    let scoring = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&scoring)
        .await;

    let app = build_test_app(test_settings(&scoring.uri(), "sk-test"));

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({"url": format!("{}/privacy", site.uri())}))
        .await;

    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "rate_limited");
}

#[tokio::test]
async fn test_malformed_scoring_reply_recovers_on_retry() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(policy_page_html()))
        .mount(&site)
        .await;

    let scoring = MockServer::start().await;
    // First reply is missing the categories key; the retry gets valid JSON.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"overall_score": 8.3, "risk_level": "LOW"}"#,
        )))
        .up_to_n_times(1)
        .mount(&scoring)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(&reference_scoring_json())),
        )
        .mount(&scoring)
        .await;

    let app = build_test_app(test_settings(&scoring.uri(), "sk-test"));

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({"url": format!("{}/privacy", site.uri())}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["overallScore"], 8.28);
}

#[tokio::test]
async fn test_two_malformed_scoring_replies_return_500() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(policy_page_html()))
        .mount(&site)
        .await;

    let scoring = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"overall_score": 8.3, "risk_level": "LOW"}"#,
        )))
        .mount(&scoring)
        .await;

    let app = build_test_app(test_settings(&scoring.uri(), "sk-test"));

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({"url": format!("{}/privacy", site.uri())}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "analysis_parse_error");
}

#[tokio::test]
async fn test_pipeline_budget_maps_to_504() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(policy_page_html())
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&site)
        .await;

    let scoring = MockServer::start().await;
    let mut settings = test_settings(&scoring.uri(), "sk-test");
    settings.fetcher.pipeline_timeout_secs = 1;
    let app = build_test_app(settings);

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({"url": format!("{}/privacy", site.uri())}))
        .await;

    assert_eq!(response.status_code(), StatusCode::GATEWAY_TIMEOUT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "timeout");
}

#[tokio::test]
async fn test_health_and_version_endpoints() {
    let scoring = MockServer::start().await;
    let app = build_test_app(test_settings(&scoring.uri(), "sk-test"));

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.text(), "OK");

    let version = app.server.get("/v1/version").await;
    assert_eq!(version.status_code(), StatusCode::OK);
    assert_eq!(version.text(), env!("CARGO_PKG_VERSION"));
}
