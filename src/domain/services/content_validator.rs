// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::content::FetchedContent;
use crate::utils::errors::AnalysisError;

/// 隐私政策文本应至少命中其中一个关键词
const POLICY_KEYWORDS: [&str; 5] = [
    "privacy",
    "personal information",
    "data collection",
    "cookies",
    "third party",
];

/// 校验获取到的文本是否像一份隐私政策
///
/// 长度阈值随获取方式变化（结构化提取100字符，其余500字符）。
/// 校验失败产生`InvalidContent`，与获取失败区分开，
/// 调用方据此提示"这不像一份政策"而不是"无法访问页面"。
pub fn validate(content: &FetchedContent) -> Result<(), AnalysisError> {
    let text = content.raw_text.trim();
    let min_len = content.method.min_content_len();

    if text.is_empty() {
        return Err(AnalysisError::InvalidContent(
            "the fetched page contained no text".to_string(),
        ));
    }

    if text.len() < min_len {
        return Err(AnalysisError::InvalidContent(format!(
            "only {} characters of text were found (minimum {})",
            text.len(),
            min_len
        )));
    }

    let lowered = text.to_lowercase();
    if !POLICY_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Err(AnalysisError::InvalidContent(
            "no privacy-policy language was found on the page".to_string(),
        ));
    }

    Ok(())
}
