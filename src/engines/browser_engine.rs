// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::content::{FetchMethod, FetchedContent};
use crate::engines::traits::{FetchError, PolicyFetcher, MIN_FETCH_LEN};
use crate::utils::text_processing;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;

/// 页面内执行的提取脚本
///
/// 先移除非正文元素，再按优先级搜索正文容器，取第一个文本超过
/// 500字符的容器；全部不满足时退回body全文。
const EXTRACT_SCRIPT: &str = r#"
(() => {
    const doomed = [
        'script', 'style', 'noscript', 'nav', 'header', 'footer', 'aside',
        '[role="banner"]', '[role="navigation"]', '[role="contentinfo"]',
        '[role="complementary"]',
    ];
    for (const sel of doomed) {
        document.querySelectorAll(sel).forEach((el) => el.remove());
    }

    const containers = [
        'main', '[role="main"]', '.content', '.policy-content',
        '.privacy-policy', 'article', '#content', '.main-content',
        '.page-content',
    ];
    let text = '';
    for (const sel of containers) {
        const el = document.querySelector(sel);
        if (el && el.innerText && el.innerText.length > 500) {
            text = el.innerText;
            break;
        }
    }
    if (!text) {
        text = document.body ? document.body.innerText : '';
    }
    return { title: document.title || null, text };
})()
"#;

/// 浏览器内提取脚本的返回值
#[derive(Debug, Deserialize)]
struct ExtractedDom {
    title: Option<String>,
    text: String,
}

/// 无头浏览器引擎
///
/// 基于chromiumoxide的第二级回退策略，用于JS渲染的页面。
/// 浏览器实例归单次调用独占：无论成功、内容太短还是异常，
/// 控制权返回调用方之前都会关闭浏览器。
pub struct BrowserEngine {
    settle: Duration,
    timeout: Duration,
}

impl BrowserEngine {
    pub fn new(settle: Duration, timeout: Duration) -> Self {
        Self { settle, timeout }
    }

    async fn extract(browser: &Browser, url: &str, settle: Duration) -> Result<FetchedContent, FetchError> {
        // new_page navigates and waits for the load event
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        // Fixed settle delay for late-rendering content
        tokio::time::sleep(settle).await;

        let evaluation = page
            .evaluate(EXTRACT_SCRIPT)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        let extracted: ExtractedDom = evaluation
            .into_value()
            .map_err(|e| FetchError::Browser(format!("extract script returned bad value: {}", e)))?;

        let _ = page.close().await;

        let text = text_processing::collapse_whitespace(&extracted.text);
        if text.len() < MIN_FETCH_LEN {
            return Err(FetchError::ContentTooShort {
                len: text.len(),
                min: MIN_FETCH_LEN,
            });
        }

        Ok(FetchedContent::new(
            url,
            extracted.title,
            text,
            FetchMethod::HeadlessBrowser,
        ))
    }
}

#[async_trait]
impl PolicyFetcher for BrowserEngine {
    /// 执行无头浏览器抓取
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedContent)` - 正文容器提取出的文本
    /// * `Err(FetchError)` - 启动失败、导航失败、超时或内容太短
    async fn fetch(&self, url: &str) -> Result<FetchedContent, FetchError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(FetchError::Browser)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let outcome = tokio::time::timeout(
            self.timeout,
            Self::extract(&browser, url, self.settle),
        )
        .await;

        // Teardown runs before the outcome is inspected, so every exit
        // path (success, short content, error, timeout) releases the
        // browser. If the whole future is dropped mid-flight, the owned
        // child process is killed when `browser` drops.
        let _ = browser.close().await;
        let _ = browser.wait().await;
        events.abort();

        match outcome {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }

    fn method(&self) -> FetchMethod {
        FetchMethod::HeadlessBrowser
    }
}
