// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

/// 单个凭证的配额快照
#[derive(Debug, Clone, Default)]
pub struct KeyQuota {
    /// 剩余额度；服务未声明上限时为`None`
    pub credits: Option<f64>,
    /// 剩余的速率限制请求数
    pub rate_limit_remaining: Option<u64>,
}

/// 凭证状态探测特质
///
/// 仅被凭证健康缓存使用；测试用可计数的假实现验证single-flight
#[async_trait]
pub trait CreditsProbe: Send + Sync {
    /// 查询一个凭证的账户/额度状态
    async fn probe(&self, api_key: &str) -> Result<KeyQuota>;
}

/// 评分服务密钥状态客户端
///
/// 调用服务的密钥状态端点，宽容地遍历响应结构：
/// `data.limit`/`data.usage`给出剩余额度，
/// `data.rate_limit.requests`给出剩余请求数
pub struct KeyStatusClient {
    http: reqwest::Client,
    base_url: String,
}

impl KeyStatusClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CreditsProbe for KeyStatusClient {
    async fn probe(&self, api_key: &str) -> Result<KeyQuota> {
        let response = self
            .http
            .get(format!("{}/auth/key", self.base_url))
            .bearer_auth(api_key)
            .send()
            .await
            .context("key status request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("key status endpoint returned {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("key status response was not JSON")?;
        let data = &body["data"];

        let credits = match (data["limit"].as_f64(), data["usage"].as_f64()) {
            (Some(limit), Some(usage)) => Some((limit - usage).max(0.0)),
            _ => None,
        };
        let rate_limit_remaining = data["rate_limit"]["requests"].as_u64();

        Ok(KeyQuota {
            credits,
            rate_limit_remaining,
        })
    }
}
