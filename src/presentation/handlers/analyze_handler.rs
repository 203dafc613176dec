// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

use crate::{
    application::dto::analyze_request::AnalyzeRequestDto,
    config::settings::Settings,
    domain::services::analysis_service::AnalysisService,
    utils::errors::AnalysisError,
};

/// 处理隐私政策分析请求
///
/// 整条流水线受硬性时间预算约束：超出预算时放弃在途操作并
/// 返回504。丢弃流水线future会级联取消当前在途的获取策略，
/// 包括终止无头浏览器会话。
pub async fn analyze(
    Extension(service): Extension<Arc<AnalysisService>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<AnalyzeRequestDto>,
) -> impl IntoResponse {
    let budget = Duration::from_secs(settings.fetcher.pipeline_timeout_secs);

    match tokio::time::timeout(budget, service.analyze(&payload.url)).await {
        Ok(Ok(result)) => {
            metrics::counter!("analyses_total", "outcome" => "ok").increment(1);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": true,
                    "data": result,
                })),
            )
                .into_response()
        }
        Ok(Err(err)) => {
            metrics::counter!("analyses_total", "outcome" => err.code()).increment(1);
            match err.status_code() {
                StatusCode::INTERNAL_SERVER_ERROR => {
                    error!(url = %payload.url, error = %err, "analysis failed");
                }
                _ => {
                    warn!(url = %payload.url, error = %err, "analysis rejected");
                }
            }
            err.into_response()
        }
        Err(_) => {
            metrics::counter!("analyses_total", "outcome" => "timeout").increment(1);
            warn!(url = %payload.url, budget_secs = budget.as_secs(), "analysis timed out");
            AnalysisError::Timeout(format!(
                "analysis exceeded the {}s budget",
                budget.as_secs()
            ))
            .into_response()
        }
    }
}
