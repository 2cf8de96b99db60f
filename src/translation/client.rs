//! 翻译后端客户端
//!
//! [`TranslateBackend`] 是调度器与具体翻译服务之间的接缝，
//! 生产环境使用 DeepLX 兼容 API，测试中可以注入桩实现。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::TranslatorConfig;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译后端接口
///
/// 实现者负责一次完整的文本翻译调用，不负责限速和并发控制，
/// 那是 [`RateLimitedTranslator`](crate::translation::RateLimitedTranslator) 的事情。
#[async_trait]
pub trait TranslateBackend: Send + Sync + 'static {
    /// 将文本翻译到目标语言
    async fn translate_text(&self, text: &str, target_lang: &str) -> TranslationResult<String>;
}

/// DeepLX 兼容 API 的请求体
#[derive(Debug, Serialize)]
struct DeepLxRequest {
    text: String,
    source_lang: String,
    target_lang: String,
}

/// DeepLX 兼容 API 的响应体
#[derive(Debug, Deserialize)]
struct DeepLxResponse {
    code: i32,
    #[serde(default)]
    data: String,
}

/// 调用 DeepLX 兼容翻译 API 的 HTTP 客户端
pub struct DeepLxClient {
    http: reqwest::Client,
    api_url: String,
}

impl DeepLxClient {
    /// 按配置创建客户端，超时作用于单次 HTTP 请求
    pub fn new(config: &TranslatorConfig) -> TranslationResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl TranslateBackend for DeepLxClient {
    async fn translate_text(&self, text: &str, target_lang: &str) -> TranslationResult<String> {
        let request = DeepLxRequest {
            text: text.to_string(),
            source_lang: "auto".to_string(),
            target_lang: target_lang.to_uppercase(),
        };

        let response = self.http.post(&self.api_url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::ApiStatus {
                code: i32::from(status.as_u16()),
            });
        }

        let body: DeepLxResponse = response.json().await?;
        if body.code != 200 {
            return Err(TranslationError::ApiStatus { code: body.code });
        }
        if body.data.is_empty() {
            return Err(TranslationError::InvalidResponse(
                "translation API returned empty data".to_string(),
            ));
        }

        Ok(body.data)
    }
}
