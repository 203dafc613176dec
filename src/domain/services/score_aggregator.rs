// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::analysis::{RiskLevel, ScoredCategories};

/// 等级阈值表，按下界降序排列
///
/// 表必须单调且覆盖整个[1,10]区间：任意总分恰好落入一个等级，
/// 总分上升时等级不会下降。低于最后一档的总分得F。
const GRADE_TABLE: [(f64, &str); 10] = [
    (9.5, "A+"),
    (9.0, "A"),
    (8.5, "A-"),
    (8.0, "B+"),
    (7.0, "B"),
    (6.5, "B-"),
    (6.0, "C+"),
    (5.0, "C"),
    (4.5, "C-"),
    (4.0, "D"),
];

/// 聚合结果
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// 加权总分，1-10，保留两位小数
    pub overall: f64,
    /// 字母等级
    pub grade: &'static str,
    /// 风险等级
    pub risk_level: RiskLevel,
}

/// 从类别分数计算加权总分、字母等级和风险等级
///
/// `overall = Σ(score_i × weight_i) / 100`。评分服务声明的风险标签
/// 能识别时原样采用，否则从总分推导。纯函数：相同输入恒产出相同结果。
pub fn compute(categories: &ScoredCategories, declared_risk: Option<&str>) -> Aggregate {
    let weighted: f64 = categories
        .iter()
        .map(|(category, assessment)| assessment.score * category.weight() as f64)
        .sum();
    let overall = (weighted / 100.0 * 100.0).round() / 100.0;

    let risk_level = declared_risk
        .and_then(RiskLevel::parse)
        .unwrap_or_else(|| derive_risk(overall));

    Aggregate {
        overall,
        grade: grade_for(overall),
        risk_level,
    }
}

/// 查表得到字母等级
pub fn grade_for(overall: f64) -> &'static str {
    GRADE_TABLE
        .iter()
        .find(|(min, _)| overall >= *min)
        .map(|(_, grade)| *grade)
        .unwrap_or("F")
}

/// 从总分推导风险等级
pub fn derive_risk(overall: f64) -> RiskLevel {
    if overall >= 9.0 {
        RiskLevel::Exemplary
    } else if overall >= 7.5 {
        RiskLevel::Low
    } else if overall >= 6.0 {
        RiskLevel::Moderate
    } else if overall >= 4.5 {
        RiskLevel::ModerateHigh
    } else {
        RiskLevel::High
    }
}
