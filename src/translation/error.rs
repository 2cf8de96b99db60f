//! 翻译模块错误类型
//!
//! 这里的错误只在调度器内部流转，调度器将其吸收并降级为原文回退，
//! 不会沿 API 路径向上传播。

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 网络错误
    #[error("网络错误: {0}")]
    Network(String),

    /// 请求超时
    #[error("请求超时: {0}")]
    Timeout(String),

    /// 翻译 API 返回了非成功状态码
    #[error("翻译 API 返回状态码 {code}")]
    ApiStatus { code: i32 },

    /// 响应内容无法使用
    #[error("响应无效: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranslationError::Timeout(err.to_string())
        } else if err.is_decode() {
            TranslationError::InvalidResponse(err.to_string())
        } else {
            TranslationError::Network(err.to_string())
        }
    }
}

/// 翻译 Result 类型
pub type TranslationResult<T> = Result<T, TranslationError>;
