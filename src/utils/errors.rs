// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// 分析流水线错误类型
///
/// 每个变体对应一个面向用户的错误类别，并映射到固定的HTTP状态码
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// 用户输入的URL格式无效
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// 无法定位隐私政策页面
    #[error("Could not locate a privacy policy: {0}")]
    DiscoveryFailed(String),

    /// 所有内容获取策略都已失败
    #[error("All fetch strategies failed (attempted: {})", attempted.join(", "))]
    ContentExtractionFailed { attempted: Vec<String> },

    /// 获取到的内容不像隐私政策
    #[error("Fetched content does not look like a privacy policy: {0}")]
    InvalidContent(String),

    /// 评分服务限流
    #[error("Scoring service rate limited, retry after a short delay")]
    UpstreamRateLimited,

    /// 评分服务返回了无法解析的结构
    #[error("Scoring response could not be parsed: {0}")]
    AnalysisParseError(String),

    /// 超时
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// 缺少必需的配置项
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 其他内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// 机器可读的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidUrl(_) => "invalid_url",
            AnalysisError::DiscoveryFailed(_) => "discovery_failed",
            AnalysisError::ContentExtractionFailed { .. } => "content_extraction_failed",
            AnalysisError::InvalidContent(_) => "invalid_content",
            AnalysisError::UpstreamRateLimited => "rate_limited",
            AnalysisError::AnalysisParseError(_) => "analysis_parse_error",
            AnalysisError::Timeout(_) => "timeout",
            AnalysisError::Configuration(_) => "configuration_error",
            AnalysisError::Internal(_) => "internal_error",
        }
    }

    /// 映射到HTTP状态码
    ///
    /// # 返回值
    ///
    /// 用户输入类错误返回400，限流返回429，超时返回504，其余返回500
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::InvalidUrl(_)
            | AnalysisError::DiscoveryFailed(_)
            | AnalysisError::ContentExtractionFailed { .. }
            | AnalysisError::InvalidContent(_) => StatusCode::BAD_REQUEST,
            AnalysisError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            AnalysisError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AnalysisError::AnalysisParseError(_)
            | AnalysisError::Configuration(_)
            | AnalysisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "success": false,
            "error": self.code(),
            "message": self.to_string(),
        });

        // Internal detail is only exposed in debug builds.
        if cfg!(debug_assertions) {
            body["detail"] = serde_json::json!(format!("{:?}", self));
        }

        (self.status_code(), Json(body)).into_response()
    }
}
