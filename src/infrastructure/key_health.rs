// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::credential::CredentialStatus;
use crate::infrastructure::scoring::credits_probe::CreditsProbe;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 一个已配置的评分服务凭证
#[derive(Debug, Clone)]
pub struct ScoringKey {
    /// 日志和状态端点使用的标签
    pub label: String,
    /// 密钥本身，绝不出现在日志或快照里
    pub secret: String,
}

/// 凭证健康缓存
///
/// 进程级共享状态：维护每个评分凭证的可用性/配额快照。
/// 缓存超过TTL视为过期，读取时惰性刷新，或由调用方显式刷新。
/// 并发刷新由`refresh_gate`串行化：等待者拿到锁后若发现别人
/// 已经刷新完成就直接返回，N个并发请求只触发每个凭证一次探测。
pub struct KeyHealthCache {
    keys: Vec<ScoringKey>,
    probe: Arc<dyn CreditsProbe>,
    ttl: ChronoDuration,
    statuses: DashMap<String, CredentialStatus>,
    last_refresh: parking_lot::RwLock<Option<DateTime<Utc>>>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl KeyHealthCache {
    pub fn new(keys: Vec<ScoringKey>, probe: Arc<dyn CreditsProbe>, ttl: Duration) -> Self {
        Self {
            keys,
            probe,
            ttl: ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::hours(4)),
            statuses: DashMap::new(),
            last_refresh: parking_lot::RwLock::new(None),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// 缓存是否过期
    ///
    /// 从未刷新过也视为过期
    pub fn is_stale(&self) -> bool {
        match *self.last_refresh.read() {
            None => true,
            Some(at) => Utc::now() - at > self.ttl,
        }
    }

    /// 返回当前快照，无副作用
    ///
    /// 条目按配置顺序排列；尚未探测过的凭证不在快照中
    pub fn get_all(&self) -> Vec<CredentialStatus> {
        self.keys
            .iter()
            .filter_map(|key| self.statuses.get(&key.label).map(|s| s.clone()))
            .collect()
    }

    /// 按需刷新
    ///
    /// # 参数
    ///
    /// * `force` - 为true时忽略TTL强制刷新
    pub async fn ensure_fresh(&self, force: bool) {
        if force || self.is_stale() {
            self.refresh_all().await;
        }
    }

    /// 刷新所有凭证的状态
    ///
    /// 单个凭证的探测失败只把该凭证标记为不可用并记录错误，
    /// 不会中断其余凭证的刷新。
    pub async fn refresh_all(&self) {
        let entered_at = Utc::now();
        let _gate = self.refresh_gate.lock().await;

        // A refresh that completed while this caller waited on the gate
        // satisfies the request; do not fire a second round of probes.
        if let Some(at) = *self.last_refresh.read() {
            if at >= entered_at {
                debug!("credential refresh already completed by a concurrent caller");
                return;
            }
        }

        info!(keys = self.keys.len(), "refreshing scoring credential status");

        let probes = self.keys.iter().map(|key| {
            let probe = self.probe.clone();
            async move { (key, probe.probe(&key.secret).await) }
        });
        let results = futures::future::join_all(probes).await;

        let now = Utc::now();
        for (key, result) in results {
            let status = match result {
                Ok(quota) => CredentialStatus {
                    name: key.label.clone(),
                    is_available: true,
                    credits: quota.credits,
                    rate_limit_remaining: quota.rate_limit_remaining,
                    last_checked: now,
                    error: None,
                },
                Err(e) => {
                    warn!(credential = %key.label, error = %e, "credential status probe failed");
                    CredentialStatus {
                        name: key.label.clone(),
                        is_available: false,
                        credits: None,
                        rate_limit_remaining: None,
                        last_checked: now,
                        error: Some(e.to_string()),
                    }
                }
            };
            self.statuses.insert(key.label.clone(), status);
        }

        *self.last_refresh.write() = Some(now);
    }

    /// 为评分调用选出一个可用凭证
    ///
    /// 从未探测过的凭证默认可用。按配置顺序返回第一个可用项。
    pub fn select_available(&self) -> Option<ScoringKey> {
        self.keys
            .iter()
            .find(|key| {
                self.statuses
                    .get(&key.label)
                    .map(|status| status.is_available)
                    .unwrap_or(true)
            })
            .cloned()
    }

    /// 把一个凭证标记为限流不可用
    pub fn mark_rate_limited(&self, label: &str) {
        self.statuses.insert(
            label.to_string(),
            CredentialStatus {
                name: label.to_string(),
                is_available: false,
                credits: None,
                rate_limit_remaining: Some(0),
                last_checked: Utc::now(),
                error: Some("rate limited".to_string()),
            },
        );
    }

    /// 是否还有可用凭证
    pub fn has_available(&self) -> bool {
        self.select_available().is_some()
    }
}
