//! 服务级错误类型
//!
//! 聚合各子系统的错误，供启动流程和顶层调用方使用。
//! 翻译失败与缓存失败在各自模块内部被吸收，通常不会出现在这里。

use thiserror::Error;

/// 服务级错误
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] crate::env::EnvError),

    /// 持久化存储错误
    #[error("存储错误: {0}")]
    Store(#[from] crate::storage::StoreError),

    /// 翻译后端错误
    #[error("翻译错误: {0}")]
    Translation(#[from] crate::translation::TranslationError),

    /// 缓存后端错误
    #[error("缓存错误: {0}")]
    Cache(#[from] crate::cache::CacheError),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// Web 服务器错误
    #[error("Web 服务器错误: {0}")]
    Web(String),
}

/// 服务级 Result
pub type ServiceResult<T> = Result<T, ServiceError>;
