// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Extension;
use axum_test::TestServer;
use privacylens::config::settings::{
    ExtractionSettings, FetcherSettings, IdentitySettings, KeyHealthSettings, ScoringSettings,
    ServerSettings, Settings,
};
use privacylens::domain::services::analysis_service::AnalysisService;
use privacylens::domain::services::policy_scorer::PolicyScorer;
use privacylens::engines::chain::EngineChain;
use privacylens::engines::discovery::PolicyDiscovery;
use privacylens::engines::http_engine::HttpFetchEngine;
use privacylens::engines::traits::PolicyFetcher;
use privacylens::infrastructure::key_health::{KeyHealthCache, ScoringKey};
use privacylens::infrastructure::scoring::completion_client::OpenRouterClient;
use privacylens::infrastructure::scoring::credits_probe::KeyStatusClient;
use privacylens::presentation::routes;
use std::sync::Arc;
use std::time::Duration;

/// 组装好的被测应用
pub struct TestApp {
    pub server: TestServer,
    pub key_health: Arc<KeyHealthCache>,
}

/// 测试用配置：评分服务与密钥状态端点都指向同一个mock服务器
pub fn test_settings(scoring_base_url: &str, api_keys: &str) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        scoring: ScoringSettings {
            api_keys: api_keys.to_string(),
            model: "test-model".to_string(),
            api_base_url: scoring_base_url.to_string(),
            max_tokens: 2000,
            temperature: 0.1,
        },
        extraction: ExtractionSettings {
            api_key: None,
            api_base_url: "https://api.firecrawl.dev".to_string(),
        },
        fetcher: FetcherSettings {
            probe_timeout_secs: 2,
            fetch_timeout_secs: 2,
            browser_timeout_secs: 2,
            browser_settle_ms: 0,
            pipeline_timeout_secs: 10,
        },
        identity: IdentitySettings {
            user_agent: "privacylens-test/0.1".to_string(),
            site_url: "https://privacylens.test".to_string(),
            site_name: "PrivacyLens".to_string(),
        },
        key_health: KeyHealthSettings { ttl_secs: 3600 },
    }
}

/// 组装一个只带原始HTTP获取引擎的被测应用
///
/// 浏览器与结构化提取策略需要真实的外部进程/服务，
/// 集成测试用最后一级策略走通整条流水线
pub fn build_test_app(settings: Settings) -> TestApp {
    let settings = Arc::new(settings);

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

    let engines: Vec<Arc<dyn PolicyFetcher>> = vec![Arc::new(HttpFetchEngine::new(
        settings.identity.user_agent.clone(),
        Duration::from_secs(settings.fetcher.fetch_timeout_secs),
    ))];
    let chain = EngineChain::new(engines);

    let discovery = PolicyDiscovery::new(
        settings.identity.user_agent.clone(),
        Duration::from_secs(settings.fetcher.probe_timeout_secs),
    );

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

    let app = routes::routes()
        .layer(Extension(analysis_service))
        .layer(Extension(key_health.clone()))
        .layer(Extension(settings));

    TestApp {
        server: TestServer::new(app).expect("test server"),
        key_health,
    }
}

/// 一份超过500字符、命中政策关键词的HTML页面
pub fn policy_page_html() -> String {
    let body = "We explain our data collection practices, the cookies we set, and the \
        circumstances under which personal information is shared with any third party. "
        .repeat(8);
    format!(
        "<html><head><title>Acme Privacy Policy</title></head><body><main>{}</main></body></html>",
        body
    )
}

/// 评分服务chat-completions响应体
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
}

/// 参考场景的类别分数 (9/8/7/9/8/9 → 8.28)
pub fn reference_scoring_json() -> String {
    r#"{
        "overall_score": 8.3,
        "risk_level": "LOW",
        "regulatory_compliance": {
            "gdpr": "largely compliant",
            "ccpa": "compliant",
            "dpdp": "unclear"
        },
        "categories": {
            "data_collection": {"score": 9, "reasoning": "collection is minimal"},
            "data_sharing": {"score": 8, "reasoning": "no data sales"},
            "user_rights": {"score": 7, "reasoning": "deletion requires email"},
            "security_measures": {"score": 9, "reasoning": "encryption in transit and at rest"},
            "compliance_framework": {"score": 8, "reasoning": "DPO and legal bases named"},
            "transparency": {"score": 9, "reasoning": "plain language"}
        },
        "privacy_grade": "B+",
        "executive_summary": "A solid, readable policy.",
        "critical_findings": [],
        "positive_practices": ["short retention windows"],
        "recommendations": ["document sub-processors"]
    }"#
    .to_string()
}
