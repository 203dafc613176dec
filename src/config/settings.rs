// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、评分服务、内容提取服务、获取策略和凭证健康缓存的所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 评分服务配置
    pub scoring: ScoringSettings,
    /// 结构化内容提取服务配置
    pub extraction: ExtractionSettings,
    /// 内容获取策略配置
    pub fetcher: FetcherSettings,
    /// 出站请求身份配置
    pub identity: IdentitySettings,
    /// 凭证健康缓存配置
    pub key_health: KeyHealthSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 评分服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    /// 逗号分隔的API密钥列表（至少一个）
    pub api_keys: String,
    /// 使用的模型名称
    pub model: String,
    /// 评分服务API基础URL
    pub api_base_url: String,
    /// 响应令牌预算
    pub max_tokens: u32,
    /// 采样温度（低温度保证趋向确定性的评分）
    pub temperature: f64,
}

impl ScoringSettings {
    /// 拆分配置的API密钥列表
    ///
    /// # 返回值
    ///
    /// `(标签, 密钥)` 对的列表；标签用于日志与状态端点，绝不暴露密钥本身
    pub fn keys(&self) -> Vec<(String, String)> {
        self.api_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .enumerate()
            .map(|(i, key)| (format!("scoring-key-{}", i + 1), key.to_string()))
            .collect()
    }
}

/// 结构化内容提取服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// 提取服务API密钥；缺省时跳过结构化提取策略
    pub api_key: Option<String>,
    /// 提取服务API基础URL
    pub api_base_url: String,
}

/// 内容获取策略配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherSettings {
    /// 路径探测超时时间（秒）
    pub probe_timeout_secs: u64,
    /// 结构化提取与原始HTTP获取超时时间（秒）
    pub fetch_timeout_secs: u64,
    /// 无头浏览器策略超时时间（秒）
    pub browser_timeout_secs: u64,
    /// 浏览器DOM就绪后的固定沉降延迟（毫秒）
    pub browser_settle_ms: u64,
    /// 整条分析流水线的硬性预算（秒）
    pub pipeline_timeout_secs: u64,
}

/// 出站请求身份配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySettings {
    /// 出站请求的User-Agent
    pub user_agent: String,
    /// 评分服务要求的站点URL标头
    pub site_url: String,
    /// 评分服务要求的站点名称标头
    pub site_name: String,
}

/// 凭证健康缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct KeyHealthSettings {
    /// 缓存过期时间（秒）
    pub ttl_secs: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值。缺少评分服务密钥时立即失败，
    /// 返回带说明的配置错误而不是在首次请求时才暴露。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败或缺少必需项
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default scoring service settings
            .set_default("scoring.api_keys", "")?
            .set_default("scoring.model", "anthropic/claude-3.5-sonnet")?
            .set_default("scoring.api_base_url", "https://openrouter.ai/api/v1")?
            .set_default("scoring.max_tokens", 2000)?
            .set_default("scoring.temperature", 0.1)?
            // Default extraction service settings
            .set_default("extraction.api_base_url", "https://api.firecrawl.dev")?
            // Default fetcher settings
            .set_default("fetcher.probe_timeout_secs", 8)?
            .set_default("fetcher.fetch_timeout_secs", 15)?
            .set_default("fetcher.browser_timeout_secs", 30)?
            .set_default("fetcher.browser_settle_ms", 2000)?
            .set_default("fetcher.pipeline_timeout_secs", 60)?
            // Default identity settings
            .set_default(
                "identity.user_agent",
                "Mozilla/5.0 (compatible; privacylens/0.1; +https://privacylens.dev)",
            )?
            .set_default("identity.site_url", "https://privacylens.dev")?
            .set_default("identity.site_name", "PrivacyLens")?
            // Default key health cache settings (4 hours)
            .set_default("key_health.ttl_secs", 14_400)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PRIVACYLENS").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 校验已加载的配置
    fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.keys().is_empty() {
            return Err(ConfigError::Message(
                "no scoring service API key configured; set PRIVACYLENS__SCORING__API_KEYS \
                 to a comma-separated list of at least one key"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
