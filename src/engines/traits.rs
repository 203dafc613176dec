// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::content::{FetchMethod, FetchedContent};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 任何策略返回的文本低于此长度即视为获取失败
pub const MIN_FETCH_LEN: usize = 100;

/// 获取引擎错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("HTTP status {0}")]
    BadStatus(u16),
    /// 超时
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    /// 内容太短
    #[error("Content too short: {len} chars (minimum {min})")]
    ContentTooShort { len: usize, min: usize },
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// 提取服务响应不匹配任何已知信封形状
    #[error("Unrecognized response envelope from extraction service")]
    BadEnvelope,
    /// 其他错误
    #[error("{0}")]
    Other(String),
}

/// 政策内容获取引擎特质
///
/// 每个实现对应一种获取策略；失败的细节留在`FetchError`里，
/// 由回退链决定是否继续尝试下一个策略
#[async_trait]
pub trait PolicyFetcher: Send + Sync {
    /// 获取指定URL的政策文本
    async fn fetch(&self, url: &str) -> Result<FetchedContent, FetchError>;

    /// 本引擎对应的获取方式
    fn method(&self) -> FetchMethod;
}
