// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 评分量表类别
///
/// 六个固定的加权隐私实践维度，权重之和为100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricCategory {
    DataCollection,
    DataSharing,
    UserRights,
    SecurityMeasures,
    ComplianceFramework,
    Transparency,
}

impl RubricCategory {
    pub const ALL: [RubricCategory; 6] = [
        RubricCategory::DataCollection,
        RubricCategory::DataSharing,
        RubricCategory::UserRights,
        RubricCategory::SecurityMeasures,
        RubricCategory::ComplianceFramework,
        RubricCategory::Transparency,
    ];

    /// 固定的整数权重 (30/25/20/15/7/3)
    pub fn weight(&self) -> u32 {
        match self {
            RubricCategory::DataCollection => 30,
            RubricCategory::DataSharing => 25,
            RubricCategory::UserRights => 20,
            RubricCategory::SecurityMeasures => 15,
            RubricCategory::ComplianceFramework => 7,
            RubricCategory::Transparency => 3,
        }
    }

    /// 评分服务JSON契约中使用的键名
    pub fn key(&self) -> &'static str {
        match self {
            RubricCategory::DataCollection => "data_collection",
            RubricCategory::DataSharing => "data_sharing",
            RubricCategory::UserRights => "user_rights",
            RubricCategory::SecurityMeasures => "security_measures",
            RubricCategory::ComplianceFramework => "compliance_framework",
            RubricCategory::Transparency => "transparency",
        }
    }
}

/// 单个类别的评估
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAssessment {
    /// 1-10分
    pub score: f64,
    /// 评分依据
    pub reasoning: String,
}

/// 六个类别的完整评估
///
/// 所有字段必填；缺失任一类别在反序列化时即失败，
/// 不会默默以零分补齐
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCategories {
    pub data_collection: CategoryAssessment,
    pub data_sharing: CategoryAssessment,
    pub user_rights: CategoryAssessment,
    pub security_measures: CategoryAssessment,
    pub compliance_framework: CategoryAssessment,
    pub transparency: CategoryAssessment,
}

impl ScoredCategories {
    pub fn get(&self, category: RubricCategory) -> &CategoryAssessment {
        match category {
            RubricCategory::DataCollection => &self.data_collection,
            RubricCategory::DataSharing => &self.data_sharing,
            RubricCategory::UserRights => &self.user_rights,
            RubricCategory::SecurityMeasures => &self.security_measures,
            RubricCategory::ComplianceFramework => &self.compliance_framework,
            RubricCategory::Transparency => &self.transparency,
        }
    }

    /// 按固定类别顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = (RubricCategory, &CategoryAssessment)> {
        RubricCategory::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

/// 法规符合性摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryCompliance {
    pub gdpr: String,
    pub ccpa: String,
    pub dpdp: String,
}

/// 风险等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "EXEMPLARY")]
    Exemplary,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "MODERATE-HIGH")]
    ModerateHigh,
    #[serde(rename = "HIGH")]
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Exemplary => "EXEMPLARY",
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::ModerateHigh => "MODERATE-HIGH",
            RiskLevel::High => "HIGH",
        }
    }

    /// 宽容地解析评分服务声明的风险标签
    ///
    /// 无法识别的标签返回`None`，由聚合器从总分推导
    pub fn parse(label: &str) -> Option<RiskLevel> {
        match label.trim().to_uppercase().replace('_', "-").as_str() {
            "EXEMPLARY" => Some(RiskLevel::Exemplary),
            "LOW" => Some(RiskLevel::Low),
            "MODERATE" | "MEDIUM" => Some(RiskLevel::Moderate),
            "MODERATE-HIGH" => Some(RiskLevel::ModerateHigh),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 评分服务返回并通过模式校验的结构化评估
///
/// 字段值保持服务给出的原样；总分与等级由聚合器另行计算
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredAnalysis {
    pub overall_score: f64,
    pub risk_level: String,
    pub regulatory_compliance: RegulatoryCompliance,
    pub categories: ScoredCategories,
    pub privacy_grade: String,
    pub executive_summary: String,
    #[serde(default)]
    pub critical_findings: Vec<String>,
    #[serde(default)]
    pub positive_practices: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// 最终分析结果
///
/// 由结果装配器创建，返回后归调用方所有，本服务不再持有
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    pub hostname: String,
    pub timestamp: DateTime<Utc>,
    pub scraper_used: String,
    pub content_length: usize,
    pub overall_score: f64,
    pub grade: String,
    pub risk_level: RiskLevel,
    pub regulatory_compliance: RegulatoryCompliance,
    pub categories: ScoredCategories,
    pub critical_findings: Vec<String>,
    pub positive_practices: Vec<String>,
    pub recommendations: Vec<String>,
    pub executive_summary: String,
}
