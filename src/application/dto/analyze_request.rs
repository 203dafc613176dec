// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 分析请求体
///
/// `url`缺失时反序列化为空串，由URL校验统一拒绝并返回400，
/// 而不是落入框架默认的拒绝处理
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequestDto {
    #[serde(default)]
    pub url: String,
}
