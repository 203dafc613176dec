// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use url::Url;

/// 内容获取方式
///
/// 三种策略按可靠性递减、成本递减排列，严格顺序回退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMethod {
    /// 结构化提取服务（服务端渲染并返回主要内容的markdown）
    StructuredScrape,
    /// 无头浏览器抓取
    HeadlessBrowser,
    /// 原始HTTP GET
    RawHttp,
}

impl FetchMethod {
    /// 结果记录中使用的策略名称
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMethod::StructuredScrape => "scrape",
            FetchMethod::HeadlessBrowser => "browser",
            FetchMethod::RawHttp => "fetch",
        }
    }

    /// 内容校验使用的最小长度
    ///
    /// 结构化提取只返回主要内容，阈值放宽到100字符；
    /// 浏览器和原始HTTP路径要求500字符。
    pub fn min_content_len(&self) -> usize {
        match self {
            FetchMethod::StructuredScrape => 100,
            FetchMethod::HeadlessBrowser | FetchMethod::RawHttp => 500,
        }
    }
}

impl std::fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 一次获取尝试的产物
///
/// 生命周期限于单次分析调用，评分完成后即丢弃
#[derive(Debug, Clone)]
pub struct FetchedContent {
    pub url: String,
    pub title: Option<String>,
    pub raw_text: String,
    pub hostname: String,
    pub method: FetchMethod,
}

impl FetchedContent {
    pub fn new(url: &str, title: Option<String>, raw_text: String, method: FetchMethod) -> Self {
        let hostname = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_default();
        Self {
            url: url.to_string(),
            title,
            raw_text,
            hostname,
            method,
        }
    }
}

/// 政策候选URL的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// 首页锚点扫描命中
    HomepageLink,
    /// 常见路径探测命中
    CommonPath,
    /// 用户直接提供（或回退到用户提供的域名本身）
    UserSupplied,
}

impl CandidateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateSource::HomepageLink => "homepage-link",
            CandidateSource::CommonPath => "common-path",
            CandidateSource::UserSupplied => "user-supplied",
        }
    }
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 发现阶段产出的政策候选URL
#[derive(Debug, Clone)]
pub struct PolicyCandidate {
    pub url: Url,
    pub source: CandidateSource,
}
