// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use privacylens::domain::models::content::CandidateSource;
use privacylens::engines::discovery::PolicyDiscovery;
use privacylens::utils::errors::AnalysisError;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn discovery() -> PolicyDiscovery {
    PolicyDiscovery::new("privacylens-test/0.1".to_string(), Duration::from_secs(2))
}

#[tokio::test]
async fn test_homepage_anchor_wins_over_path_probing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a href="/about">About</a>
                <a href="/privacy">Privacy Policy</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let candidate = discovery().locate(&base).await.unwrap();

    assert_eq!(candidate.source, CandidateSource::HomepageLink);
    assert_eq!(candidate.url.path(), "/privacy");
}

#[tokio::test]
async fn test_common_path_probe_when_homepage_has_no_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><a href=\"/jobs\">Jobs</a></body></html>"),
        )
        .mount(&server)
        .await;
    // /privacy does not exist, /privacy-policy does
    Mock::given(method("HEAD"))
        .and(path("/privacy-policy"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let candidate = discovery().locate(&base).await.unwrap();

    assert_eq!(candidate.source, CandidateSource::CommonPath);
    assert_eq!(candidate.url.path(), "/privacy-policy");
}

#[tokio::test]
async fn test_falls_back_to_homepage_when_nothing_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>hi</body></html>"))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let candidate = discovery().locate(&base).await.unwrap();

    assert_eq!(candidate.source, CandidateSource::UserSupplied);
    assert_eq!(candidate.url, base);
}

#[tokio::test]
async fn test_direct_policy_url_skips_discovery() {
    // No server at all: a URL with a path must not touch the network.
    let base = Url::parse("https://example.com/legal/privacy").unwrap();
    let candidate = discovery().locate(&base).await.unwrap();

    assert_eq!(candidate.source, CandidateSource::UserSupplied);
    assert_eq!(candidate.url, base);
}

#[tokio::test]
async fn test_unreachable_domain_is_discovery_failure() {
    // Nothing listens on this port.
    let base = Url::parse("http://127.0.0.1:9").unwrap();
    let err = discovery().locate(&base).await.unwrap_err();
    assert!(matches!(err, AnalysisError::DiscoveryFailed(_)));
}
