// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::content::{FetchMethod, FetchedContent};
use crate::engines::traits::{FetchError, PolicyFetcher, MIN_FETCH_LEN};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// 结构化提取引擎
///
/// 调用外部内容提取API，请求仅含主要内容的markdown。
/// API的响应信封有两种可能形状，用untagged联合一次解析，
/// 两种都不匹配时报错而不是猜测字段。
pub struct StructuredScrapeEngine {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

/// 提取服务文档元数据
#[derive(Debug, Deserialize, Default)]
struct DocumentMetadata {
    title: Option<String>,
}

/// 提取服务返回的文档
#[derive(Debug, Deserialize)]
struct ScrapeDocument {
    markdown: String,
    #[serde(default)]
    metadata: DocumentMetadata,
}

/// 提取服务的两种响应信封形状
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScrapeEnvelope {
    /// 形状A：`{"success": true, "data": {...}}`
    Enveloped { success: bool, data: ScrapeDocument },
    /// 形状B：文档对象直接位于顶层
    Bare(ScrapeDocument),
}

impl StructuredScrapeEngine {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl PolicyFetcher for StructuredScrapeEngine {
    /// 通过提取服务获取政策内容
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedContent)` - markdown文本长度达标的内容
    /// * `Err(FetchError)` - 请求失败、信封无法识别或内容太短
    async fn fetch(&self, url: &str) -> Result<FetchedContent, FetchError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let response = client
            .post(format!("{}/v1/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "url": url,
                "formats": ["markdown"],
                "onlyMainContent": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        let envelope: ScrapeEnvelope =
            serde_json::from_str(&body).map_err(|_| FetchError::BadEnvelope)?;

        let document = match envelope {
            ScrapeEnvelope::Enveloped { success: true, data } => data,
            ScrapeEnvelope::Enveloped { success: false, .. } => {
                return Err(FetchError::Other(
                    "extraction service reported failure".to_string(),
                ));
            }
            ScrapeEnvelope::Bare(document) => document,
        };

        let text = document.markdown.trim().to_string();
        if text.len() < MIN_FETCH_LEN {
            return Err(FetchError::ContentTooShort {
                len: text.len(),
                min: MIN_FETCH_LEN,
            });
        }

        Ok(FetchedContent::new(
            url,
            document.metadata.title,
            text,
            FetchMethod::StructuredScrape,
        ))
    }

    fn method(&self) -> FetchMethod {
        FetchMethod::StructuredScrape
    }
}
