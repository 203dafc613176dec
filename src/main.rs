// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use axum::Extension;
use privacylens::config::settings::Settings;
use privacylens::domain::services::analysis_service::AnalysisService;
use privacylens::domain::services::policy_scorer::PolicyScorer;
use privacylens::engines::browser_engine::BrowserEngine;
use privacylens::engines::chain::EngineChain;
use privacylens::engines::discovery::PolicyDiscovery;
use privacylens::engines::http_engine::HttpFetchEngine;
use privacylens::engines::structured_engine::StructuredScrapeEngine;
use privacylens::engines::traits::PolicyFetcher;
use privacylens::infrastructure::key_health::{KeyHealthCache, ScoringKey};
use privacylens::infrastructure::scoring::completion_client::OpenRouterClient;
use privacylens::infrastructure::scoring::credits_probe::KeyStatusClient;
use privacylens::presentation::routes;
use privacylens::utils::telemetry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting privacylens...");

    // Initialize Prometheus Metrics
    privacylens::infrastructure::metrics::init_metrics();

    // 2. Load configuration (fails fast when no scoring key is configured)
    let settings = Arc::new(Settings::new().context("configuration")?);
    info!("Configuration loaded");

    // 3. Initialize scoring credential pool
    let scoring_keys: Vec<ScoringKey> = settings
        .scoring
        .keys()
        .into_iter()
        .map(|(label, secret)| ScoringKey { label, secret })
        .collect();
    let probe = Arc::new(KeyStatusClient::new(settings.scoring.api_base_url.clone()));
    let key_health = Arc::new(KeyHealthCache::new(
        scoring_keys,
        probe,
        Duration::from_secs(settings.key_health.ttl_secs),
    ));
    info!("Credential health cache initialized");

    // 4. Initialize fetch engines in strict fallback order
    let mut engines: Vec<Arc<dyn PolicyFetcher>> = Vec::new();
    if let Some(extraction_key) = settings.extraction.api_key.clone() {
        engines.push(Arc::new(StructuredScrapeEngine::new(
            extraction_key,
            settings.extraction.api_base_url.clone(),
            Duration::from_secs(settings.fetcher.fetch_timeout_secs),
        )));
    } else {
        info!("No extraction service key configured, structured scrape strategy disabled");
    }
    engines.push(Arc::new(BrowserEngine::new(
        Duration::from_millis(settings.fetcher.browser_settle_ms),
        Duration::from_secs(settings.fetcher.browser_timeout_secs),
    )));
    engines.push(Arc::new(HttpFetchEngine::new(
        settings.identity.user_agent.clone(),
        Duration::from_secs(settings.fetcher.fetch_timeout_secs),
    )));
    let chain = EngineChain::new(engines);

    let discovery = PolicyDiscovery::new(
        settings.identity.user_agent.clone(),
        Duration::from_secs(settings.fetcher.probe_timeout_secs),
    );

    // 5. Initialize scoring service
    let completion_client = Arc::new(OpenRouterClient::new(
        settings.scoring.api_base_url.clone(),
        settings.scoring.model.clone(),
        settings.scoring.max_tokens,
        settings.scoring.temperature,
        settings.identity.site_url.clone(),
        settings.identity.site_name.clone(),
    ));
    let scorer = PolicyScorer::new(completion_client, key_health.clone());

    let analysis_service = Arc::new(AnalysisService::new(discovery, chain, scorer));
    info!("Analysis pipeline assembled");

    // 6. Start HTTP server
    let app = routes::routes()
        .layer(Extension(analysis_service))
        .layer(Extension(key_health))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
