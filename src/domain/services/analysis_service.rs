// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::analysis::AnalysisResult;
use crate::domain::services::{
    content_validator, policy_scorer::PolicyScorer, result_assembler, score_aggregator,
    url_validator,
};
use crate::engines::chain::EngineChain;
use crate::engines::discovery::PolicyDiscovery;
use crate::utils::errors::AnalysisError;
use tracing::{info, instrument};
use url::Url;

/// 分析服务
///
/// 串起整条流水线：URL校验 → 政策链接发现 → 三级回退获取 →
/// 内容校验 → 评分 → 聚合 → 装配。每次调用独占自己的中间产物，
/// 不依赖跨请求的可变状态。
pub struct AnalysisService {
    discovery: PolicyDiscovery,
    chain: EngineChain,
    scorer: PolicyScorer,
}

impl AnalysisService {
    pub fn new(discovery: PolicyDiscovery, chain: EngineChain, scorer: PolicyScorer) -> Self {
        Self {
            discovery,
            chain,
            scorer,
        }
    }

    /// 分析一个站点的隐私政策
    ///
    /// # 参数
    ///
    /// * `raw_url` - 用户提交的原始输入（域名或完整政策URL）
    ///
    /// # 返回值
    ///
    /// * `Ok(AnalysisResult)` - 完整的评分结果
    /// * `Err(AnalysisError)` - 流水线任一阶段的类别化错误
    #[instrument(skip(self))]
    pub async fn analyze(&self, raw_url: &str) -> Result<AnalysisResult, AnalysisError> {
        let validation = url_validator::validate(raw_url);
        if !validation.valid {
            return Err(AnalysisError::InvalidUrl(
                validation
                    .error
                    .unwrap_or_else(|| "URL is not valid".to_string()),
            ));
        }
        let normalized = validation
            .url
            .ok_or_else(|| AnalysisError::InvalidUrl("URL is not valid".to_string()))?;

        let base = Url::parse(&normalized)
            .map_err(|e| AnalysisError::InvalidUrl(e.to_string()))?;

        let candidate = self.discovery.locate(&base).await?;
        info!(
            url = %candidate.url,
            source = %candidate.source,
            "policy candidate selected"
        );

        let content = self.chain.fetch(candidate.url.as_str()).await?;
        content_validator::validate(&content)?;

        let scored = self.scorer.score(&content.raw_text).await?;
        let aggregate = score_aggregator::compute(&scored.categories, Some(&scored.risk_level));

        info!(
            overall = aggregate.overall,
            grade = aggregate.grade,
            risk = %aggregate.risk_level,
            scraper = content.method.as_str(),
            "analysis complete"
        );

        Ok(result_assembler::assemble(content, scored, aggregate))
    }
}
