// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// 从HTML中提取`<title>`文本
pub fn extract_title(html: &str) -> Option<String> {
    TITLE_RE.captures(html).and_then(|caps| {
        let title = collapse_whitespace(caps.get(1)?.as_str());
        if title.is_empty() {
            None
        } else {
            Some(html_escape::decode_html_entities(&title).into_owned())
        }
    })
}

/// 将HTML降级为纯文本
///
/// 按顺序剥离脚本、样式、注释和剩余标签，解码HTML实体，
/// 最后压缩空白字符。用于原始HTTP获取策略的内容清洗。
pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, " ");
    let without_styles = STYLE_RE.replace_all(&without_scripts, " ");
    let without_comments = COMMENT_RE.replace_all(&without_styles, " ");
    let without_tags = TAG_RE.replace_all(&without_comments, " ");
    let decoded = html_escape::decode_html_entities(without_tags.as_ref()).into_owned();
    collapse_whitespace(&decoded)
}

/// 压缩连续空白为单个空格并去掉首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}
