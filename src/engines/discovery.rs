// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::content::{CandidateSource, PolicyCandidate};
use crate::utils::errors::AnalysisError;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// 锚点文本/链接匹配的隐私关键词
const LINK_KEYWORDS: [&str; 6] = [
    "privacy",
    "policy",
    "data-protection",
    "datenschutz",
    "gdpr",
    "ccpa",
];

/// 常见隐私政策路径，按命中概率排列
const COMMON_POLICY_PATHS: [&str; 20] = [
    "/privacy",
    "/privacy-policy",
    "/privacy_policy",
    "/privacypolicy",
    "/legal/privacy",
    "/legal/privacy-policy",
    "/policies/privacy",
    "/privacy-notice",
    "/privacy-statement",
    "/data-protection",
    "/about/privacy",
    "/help/privacy",
    "/site/privacy",
    "/corporate/privacy",
    "/info/privacy",
    "/privacy.html",
    "/privacy.php",
    "/en/privacy",
    "/gdpr",
    "/legal",
];

/// 政策链接发现
///
/// 只对裸域名启动：先扫描首页锚点，再探测常见路径，两个子步骤
/// 严格先后执行；都落空时回退到域名本身，交给内容阶段从首页提取。
pub struct PolicyDiscovery {
    user_agent: String,
    probe_timeout: Duration,
}

impl PolicyDiscovery {
    pub fn new(user_agent: String, probe_timeout: Duration) -> Self {
        Self {
            user_agent,
            probe_timeout,
        }
    }

    /// 为校验过的URL定位政策候选
    ///
    /// # 参数
    ///
    /// * `base` - 规范化后的绝对URL
    ///
    /// # 返回值
    ///
    /// * `Ok(PolicyCandidate)` - 候选URL及其来源
    /// * `Err(AnalysisError::DiscoveryFailed)` - 首页完全无法访问
    pub async fn locate(&self, base: &Url) -> Result<PolicyCandidate, AnalysisError> {
        // A URL with a path is taken as a direct policy link
        if base.path() != "/" && !base.path().is_empty() {
            return Ok(PolicyCandidate {
                url: base.clone(),
                source: CandidateSource::UserSupplied,
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.probe_timeout)
            .build()
            .map_err(|e| AnalysisError::Internal(e.to_string()))?;

        // 1. Homepage anchor scan
        match client.get(base.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                let html = response
                    .text()
                    .await
                    .map_err(|e| AnalysisError::DiscoveryFailed(e.to_string()))?;
                if let Some(link) = scan_links(&html, base) {
                    info!(url = %link, "privacy link found on homepage");
                    return Ok(PolicyCandidate {
                        url: link,
                        source: CandidateSource::HomepageLink,
                    });
                }
            }
            Ok(response) => {
                debug!(status = %response.status(), "homepage returned non-success, probing paths");
            }
            Err(e) if e.is_connect() || e.is_timeout() => {
                // The domain itself is unreachable; probing paths on it is pointless.
                return Err(AnalysisError::DiscoveryFailed(format!(
                    "could not reach {}: {}",
                    base, e
                )));
            }
            Err(e) => {
                debug!(error = %e, "homepage fetch failed, probing paths");
            }
        }

        // 2. Common path probing
        if let Some(candidate) = self.probe_common_paths(&client, base).await {
            return Ok(candidate);
        }

        // 3. Fall back to the homepage itself
        debug!(url = %base, "no policy link located, falling back to the homepage");
        Ok(PolicyCandidate {
            url: base.clone(),
            source: CandidateSource::UserSupplied,
        })
    }

    /// 用HEAD等价的轻量检查逐个探测常见路径
    async fn probe_common_paths(
        &self,
        client: &reqwest::Client,
        base: &Url,
    ) -> Option<PolicyCandidate> {
        for path in COMMON_POLICY_PATHS {
            let Ok(target) = base.join(path) else {
                continue;
            };

            let exists = match client.head(target.clone()).send().await {
                Ok(response) if response.status().is_success() => true,
                Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
                    // Some servers reject HEAD; fall back to a GET check
                    matches!(client.get(target.clone()).send().await, Ok(r) if r.status().is_success())
                }
                _ => false,
            };

            if exists {
                info!(url = %target, "privacy policy found at common path");
                return Some(PolicyCandidate {
                    url: target,
                    source: CandidateSource::CommonPath,
                });
            }
        }
        None
    }
}

/// 在首页HTML中扫描指向隐私政策的锚点
///
/// `Html`不是`Send`，解析必须在无await的同步辅助函数中完成
fn scan_links(html: &str, base: &Url) -> Option<Url> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").ok()?;

    for element in document.select(&anchors) {
        let href = element.value().attr("href")?.to_lowercase();
        let text = element.text().collect::<Vec<_>>().join(" ").to_lowercase();

        let matched = LINK_KEYWORDS
            .iter()
            .any(|k| href.contains(k) || text.contains(k));
        if !matched {
            continue;
        }

        if let Ok(resolved) = base.join(element.value().attr("href")?) {
            return Some(resolved);
        }
    }

    None
}
