// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::models::credential::OverallHealth;
use crate::infrastructure::key_health::KeyHealthCache;

/// 凭证状态查询参数
#[derive(Debug, Deserialize)]
pub struct CreditsQuery {
    /// 为true时忽略TTL强制刷新
    #[serde(default)]
    pub refresh: bool,
    /// 输出格式；`text`返回单行摘要，其余返回JSON
    pub format: Option<String>,
}

/// 凭证状态端点
///
/// 返回脱敏的凭证池快照与聚合计数，绝不包含密钥原文。
/// 缓存为空或过期时惰性刷新；`?refresh=true`立即刷新。
pub async fn credits_status(
    Extension(cache): Extension<Arc<KeyHealthCache>>,
    Query(query): Query<CreditsQuery>,
) -> impl IntoResponse {
    cache.ensure_fresh(query.refresh).await;

    let keys = cache.get_all();
    let total_keys = keys.len();
    let available_keys = keys.iter().filter(|k| k.is_available).count();
    let total_credits: f64 = keys.iter().filter_map(|k| k.credits).sum();
    let total_rate_limit_remaining: u64 =
        keys.iter().filter_map(|k| k.rate_limit_remaining).sum();
    let overall_health = OverallHealth::from_counts(total_keys, available_keys);

    if query.format.as_deref() == Some("text") {
        return format!(
            "{}: {}/{} keys available, {:.2} credits remaining",
            overall_health, available_keys, total_keys, total_credits
        )
        .into_response();
    }

    Json(serde_json::json!({
        "success": true,
        "totalKeys": total_keys,
        "availableKeys": available_keys,
        "totalCredits": total_credits,
        "totalRateLimitRemaining": total_rate_limit_remaining,
        "overallHealth": overall_health,
        "keys": keys,
    }))
    .into_response()
}
