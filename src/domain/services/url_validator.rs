// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// URL校验结果
///
/// 校验失败返回结构化的`{valid:false, error}`而不是抛错，
/// 调用方可以直接把`error`展示给用户
#[derive(Debug, Clone, PartialEq)]
pub struct UrlValidation {
    pub valid: bool,
    pub url: Option<String>,
    pub error: Option<String>,
}

impl UrlValidation {
    fn ok(url: String) -> Self {
        Self {
            valid: true,
            url: Some(url),
            error: None,
        }
    }

    fn rejected(reason: &str) -> Self {
        Self {
            valid: false,
            url: None,
            error: Some(reason.to_string()),
        }
    }
}

/// 规范化并校验用户输入的URL
///
/// 接受裸域名（自动补全`https://`）或完整的http(s) URL；
/// 拒绝空输入、含空白字符的输入、无scheme但带路径的输入
/// 以及缺少TLD结构（无点号）的主机名。成功时去掉末尾斜杠。
pub fn validate(input: &str) -> UrlValidation {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return UrlValidation::rejected("URL must not be empty");
    }

    if trimmed.chars().any(char::is_whitespace) {
        return UrlValidation::rejected("URL must not contain whitespace");
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        return UrlValidation::rejected("only http:// and https:// URLs are supported");
    } else if trimmed.contains('/') {
        return UrlValidation::rejected(
            "a URL with a path must start with http:// or https://",
        );
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = match Url::parse(&candidate) {
        Ok(url) => url,
        Err(e) => return UrlValidation::rejected(&format!("URL could not be parsed: {}", e)),
    };

    let Some(host) = parsed.host_str() else {
        return UrlValidation::rejected("URL has no host");
    };
    if !host.contains('.') {
        return UrlValidation::rejected("host must include a domain with a dot (e.g. example.com)");
    }

    let normalized = parsed.to_string().trim_end_matches('/').to_string();
    UrlValidation::ok(normalized)
}
