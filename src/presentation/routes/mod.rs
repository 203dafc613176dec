// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::{analyze_handler, credits_handler};
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// 处理器依赖的服务通过`Extension`层注入，由`main`或测试装配
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route("/v1/analyze", post(analyze_handler::analyze))
        .route("/v1/credits", get(credits_handler::credits_status))
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
