// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// 补全调用错误类型
#[derive(Error, Debug)]
pub enum CompletionError {
    /// 评分服务限流 (429)
    #[error("scoring service rate limited")]
    RateLimited,
    /// 请求超时
    #[error("scoring request timed out")]
    Timeout,
    /// 请求失败
    #[error("scoring request failed: {0}")]
    Http(String),
    /// 响应形状异常
    #[error("unexpected scoring response shape: {0}")]
    InvalidResponse(String),
}

/// 文本补全服务特质
///
/// 评分器只依赖这个最小接口，测试用假实现替换真实服务
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 执行一次chat-completion调用，返回助手的文本回复
    async fn complete(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
    ) -> Result<String, CompletionError>;
}

/// OpenRouter风格的补全客户端
///
/// # 配置
///
/// 模型、基础URL、令牌预算和温度来自`Settings`的scoring段；
/// 站点身份标头来自identity段
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    site_url: String,
    site_name: String,
}

impl OpenRouterClient {
    pub fn new(
        base_url: String,
        model: String,
        max_tokens: u32,
        temperature: f64,
        site_url: String,
        site_name: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_tokens,
            temperature,
            site_url,
            site_name,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    /// 调用评分服务的chat-completions端点
    ///
    /// # 参数
    ///
    /// * `api_key` - 本次调用使用的凭证（由评分器从凭证池选出）
    /// * `system` - 固定的评分量表指令
    /// * `user` - 政策文本与响应形状要求
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 助手回复的原始文本
    /// * `Err(CompletionError)` - 限流、超时或响应异常
    async fn complete(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
    ) -> Result<String, CompletionError> {
        let request_body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.site_name)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Http(e.to_string())
                }
            })?;

        if response.status().as_u16() == 429 {
            return Err(CompletionError::RateLimited);
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Http(format!(
                "{} - {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                CompletionError::InvalidResponse("no choices[0].message.content".to_string())
            })
    }
}
