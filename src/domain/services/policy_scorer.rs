// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::analysis::ScoredAnalysis;
use crate::infrastructure::key_health::KeyHealthCache;
use crate::infrastructure::scoring::completion_client::{CompletionClient, CompletionError};
use crate::utils::errors::AnalysisError;
use crate::utils::json_extract;
use std::sync::Arc;
use tracing::{info, warn};

/// 送入评分服务的政策文本上限（字符）
const MAX_POLICY_CHARS: usize = 16_000;

/// 解析/校验失败后的最大重试次数
const MAX_PARSE_RETRIES: u32 = 1;

/// 固定的评分量表指令
const RUBRIC_SYSTEM_PROMPT: &str = "You are a privacy-policy auditor. Score the policy the user \
provides against six fixed categories, each on a 1-10 scale where 1 means the policy is silent or \
actively hostile to the user and 10 means best-in-class practice:\n\
\n\
1. data_collection (weight 30): what personal data is collected and whether collection is \
minimized and purpose-bound (GDPR Art. 5, DPDP Sec. 6).\n\
2. data_sharing (weight 25): disclosure to third parties, data sales, and onward-transfer \
safeguards (CCPA Sec. 1798.115, GDPR Art. 44-49).\n\
3. user_rights (weight 20): access, deletion, portability, objection, and how easily they can be \
exercised (GDPR Art. 15-22, CCPA Sec. 1798.105-125).\n\
4. security_measures (weight 15): technical and organizational safeguards, encryption, breach \
response (GDPR Art. 32).\n\
5. compliance_framework (weight 7): named regulations, DPO contact, supervisory authority, legal \
bases (GDPR Art. 13-14).\n\
6. transparency (weight 3): readability, structure, change notification, and contact channels.\n\
\n\
Anchor the scores: 1-3 poor or silent, 4-6 partial, 7-8 solid, 9-10 exemplary. Respond with a \
single JSON object and no other text, in exactly this shape:\n\
{\n\
  \"overall_score\": <number 1-10>,\n\
  \"risk_level\": \"EXEMPLARY\" | \"LOW\" | \"MODERATE\" | \"MODERATE-HIGH\" | \"HIGH\",\n\
  \"regulatory_compliance\": {\"gdpr\": \"...\", \"ccpa\": \"...\", \"dpdp\": \"...\"},\n\
  \"categories\": {\n\
    \"data_collection\": {\"score\": <number>, \"reasoning\": \"...\"},\n\
    \"data_sharing\": {\"score\": <number>, \"reasoning\": \"...\"},\n\
    \"user_rights\": {\"score\": <number>, \"reasoning\": \"...\"},\n\
    \"security_measures\": {\"score\": <number>, \"reasoning\": \"...\"},\n\
    \"compliance_framework\": {\"score\": <number>, \"reasoning\": \"...\"},\n\
    \"transparency\": {\"score\": <number>, \"reasoning\": \"...\"}\n\
  },\n\
  \"privacy_grade\": \"A+\" .. \"F\",\n\
  \"executive_summary\": \"...\",\n\
  \"critical_findings\": [\"...\"],\n\
  \"positive_practices\": [\"...\"],\n\
  \"recommendations\": [\"...\"]\n\
}";

/// 政策评分器
///
/// 组装量表提示词，经凭证池调用评分服务，把自由文本回复
/// 解析、修复并校验成结构化评估。
///
/// 单次评分的状态机：`Idle → Prompting → AwaitingResponse → Parsing →
/// {Validated | ParseFailed | RateLimited}`。`RateLimited`在还有
/// 可用凭证时轮换重试，否则终止；`ParseFailed`重试一次后终止。
pub struct PolicyScorer {
    client: Arc<dyn CompletionClient>,
    keys: Arc<KeyHealthCache>,
}

impl PolicyScorer {
    pub fn new(client: Arc<dyn CompletionClient>, keys: Arc<KeyHealthCache>) -> Self {
        Self { client, keys }
    }

    /// 为政策文本打分
    ///
    /// # 参数
    ///
    /// * `policy_text` - 通过内容校验的政策正文
    ///
    /// # 返回值
    ///
    /// * `Ok(ScoredAnalysis)` - 通过模式校验的结构化评估，
    ///   分数保持服务给出的原样
    /// * `Err(AnalysisError)` - 限流（凭证耗尽）、解析失败（重试后）
    ///   或传输错误
    pub async fn score(&self, policy_text: &str) -> Result<ScoredAnalysis, AnalysisError> {
        let user_prompt = build_user_prompt(policy_text);
        let mut parse_failures = 0u32;

        loop {
            let Some(key) = self.keys.select_available() else {
                return Err(AnalysisError::UpstreamRateLimited);
            };

            match self
                .client
                .complete(&key.secret, RUBRIC_SYSTEM_PROMPT, &user_prompt)
                .await
            {
                Ok(reply) => match parse_reply(&reply) {
                    Ok(scored) => {
                        info!(credential = %key.label, "scoring reply validated");
                        return Ok(scored);
                    }
                    Err(reason) => {
                        warn!(
                            credential = %key.label,
                            attempt = parse_failures + 1,
                            reason = %reason,
                            "scoring reply failed validation"
                        );
                        metrics::counter!("scoring_retries_total").increment(1);
                        if parse_failures >= MAX_PARSE_RETRIES {
                            return Err(AnalysisError::AnalysisParseError(reason));
                        }
                        parse_failures += 1;
                    }
                },
                Err(CompletionError::RateLimited) => {
                    warn!(credential = %key.label, "credential rate limited, rotating");
                    self.keys.mark_rate_limited(&key.label);
                    if !self.keys.has_available() {
                        return Err(AnalysisError::UpstreamRateLimited);
                    }
                }
                Err(CompletionError::Timeout) => {
                    return Err(AnalysisError::Timeout("scoring service call".to_string()));
                }
                Err(e) => {
                    return Err(AnalysisError::Internal(format!(
                        "scoring service call failed: {}",
                        e
                    )));
                }
            }
        }
    }
}

/// 组装用户侧提示词，政策文本截断到上限
fn build_user_prompt(policy_text: &str) -> String {
    format!(
        "Score the following privacy policy. Reply with the JSON object only.\n\n---\n{}\n---",
        truncate_chars(policy_text, MAX_POLICY_CHARS)
    )
}

/// 按字符数安全截断，避免在UTF-8边界中间切开
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// 从回复文本解析并校验结构化评估
fn parse_reply(reply: &str) -> Result<ScoredAnalysis, String> {
    let json = json_extract::first_json_object(reply)
        .ok_or_else(|| "no balanced JSON object in reply".to_string())?;

    let scored: ScoredAnalysis =
        serde_json::from_str(json).map_err(|e| format!("schema validation failed: {}", e))?;

    for (category, assessment) in scored.categories.iter() {
        if !(1.0..=10.0).contains(&assessment.score) {
            return Err(format!(
                "category {} score {} outside [1,10]",
                category.key(),
                assessment.score
            ));
        }
    }

    Ok(scored)
}
