// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::analysis::{AnalysisResult, ScoredAnalysis};
use crate::domain::models::content::FetchedContent;
use crate::domain::services::score_aggregator::Aggregate;
use chrono::Utc;

/// 把获取元数据、校验过的评分和聚合结果合并成最终记录
///
/// 总分与等级取聚合器的确定性计算值；类别评分、法规符合性
/// 和文字结论保持评分服务给出的原样。返回后记录归调用方所有。
pub fn assemble(
    content: FetchedContent,
    scored: ScoredAnalysis,
    aggregate: Aggregate,
) -> AnalysisResult {
    AnalysisResult {
        url: content.url,
        hostname: content.hostname,
        timestamp: Utc::now(),
        scraper_used: content.method.as_str().to_string(),
        content_length: content.raw_text.len(),
        overall_score: aggregate.overall,
        grade: aggregate.grade.to_string(),
        risk_level: aggregate.risk_level,
        regulatory_compliance: scored.regulatory_compliance,
        categories: scored.categories,
        critical_findings: scored.critical_findings,
        positive_practices: scored.positive_practices,
        recommendations: scored.recommendations,
        executive_summary: scored.executive_summary,
    }
}
