// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::content::{FetchMethod, FetchedContent};
use crate::engines::traits::{FetchError, PolicyFetcher, MIN_FETCH_LEN};
use crate::utils::text_processing;
use async_trait::async_trait;
use std::time::Duration;

/// 原始HTTP获取引擎
///
/// 最后一级回退：直接GET页面，正则剥离标签后取纯文本
pub struct HttpFetchEngine {
    user_agent: String,
    timeout: Duration,
}

impl HttpFetchEngine {
    pub fn new(user_agent: String, timeout: Duration) -> Self {
        Self {
            user_agent,
            timeout,
        }
    }
}

#[async_trait]
impl PolicyFetcher for HttpFetchEngine {
    /// 执行原始HTTP获取
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedContent)` - 剥离标签后长度达标的纯文本
    /// * `Err(FetchError)` - 请求失败、状态码异常或内容太短
    async fn fetch(&self, url: &str) -> Result<FetchedContent, FetchError> {
        // Each request gets a fresh client for cookie isolation
        let client = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()?;

        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus(response.status().as_u16()));
        }

        let html = response.text().await?;
        let title = text_processing::extract_title(&html);
        let text = text_processing::html_to_text(&html);

        if text.len() < MIN_FETCH_LEN {
            return Err(FetchError::ContentTooShort {
                len: text.len(),
                min: MIN_FETCH_LEN,
            });
        }

        Ok(FetchedContent::new(
            url,
            title,
            text,
            FetchMethod::RawHttp,
        ))
    }

    fn method(&self) -> FetchMethod {
        FetchMethod::RawHttp
    }
}
