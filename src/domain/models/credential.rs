// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 单个评分服务凭证的可用性/配额快照
///
/// `name`是配置顺序生成的标签，绝不携带密钥本身
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub name: String,
    pub is_available: bool,
    pub credits: Option<f64>,
    pub rate_limit_remaining: Option<u64>,
    pub last_checked: DateTime<Utc>,
    pub error: Option<String>,
}

/// 凭证池整体健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Operational,
    Degraded,
    Outage,
}

impl OverallHealth {
    /// 从凭证计数推导整体健康状态
    ///
    /// 全部可用为operational，全部不可用为outage，其余为degraded
    pub fn from_counts(total: usize, available: usize) -> Self {
        if total > 0 && available == total {
            OverallHealth::Operational
        } else if available == 0 {
            OverallHealth::Outage
        } else {
            OverallHealth::Degraded
        }
    }
}

impl std::fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OverallHealth::Operational => "operational",
            OverallHealth::Degraded => "degraded",
            OverallHealth::Outage => "outage",
        };
        write!(f, "{}", label)
    }
}
