// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::content::FetchedContent;
use crate::engines::traits::PolicyFetcher;
use crate::utils::errors::AnalysisError;
use std::sync::Arc;
use tracing::{info, warn};

/// 引擎回退链
///
/// 按构造顺序严格串行地尝试各获取策略。三种策略代表成本与可靠性
/// 递增的权衡，前一个策略确定失败后下一个才会启动，绝不并发。
/// 每个策略的失败只在本地转为回退，全部耗尽后才聚合成单个错误。
pub struct EngineChain {
    engines: Vec<Arc<dyn PolicyFetcher>>,
}

impl EngineChain {
    /// 创建新的引擎回退链
    ///
    /// # 参数
    ///
    /// * `engines` - 按优先级排列的引擎列表
    pub fn new(engines: Vec<Arc<dyn PolicyFetcher>>) -> Self {
        Self { engines }
    }

    /// 依次尝试各策略获取政策内容
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedContent)` - 第一个成功策略的结果
    /// * `Err(AnalysisError::ContentExtractionFailed)` - 全部策略失败，
    ///   错误中列出尝试过的策略名
    pub async fn fetch(&self, url: &str) -> Result<FetchedContent, AnalysisError> {
        let mut attempted = Vec::new();

        for engine in &self.engines {
            let name = engine.method().as_str();
            match engine.fetch(url).await {
                Ok(content) => {
                    info!(
                        engine = name,
                        url = url,
                        chars = content.raw_text.len(),
                        "fetch strategy succeeded"
                    );
                    return Ok(content);
                }
                Err(e) => {
                    warn!(
                        engine = name,
                        url = url,
                        error = %e,
                        "fetch strategy failed, falling through"
                    );
                    metrics::counter!("fetch_strategy_fallbacks_total", "engine" => name)
                        .increment(1);
                    attempted.push(name.to_string());
                }
            }
        }

        Err(AnalysisError::ContentExtractionFailed { attempted })
    }
}
