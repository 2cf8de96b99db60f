//! 缓存后端接缝
//!
//! [`CacheBackend`] 抽象一个已连接的键值后端，[`CacheConnector`]
//! 负责建立连接。两者分离后，缓存层的连接状态机可以在测试中
//! 注入会失败的连接器来验证旁路行为。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// 缓存错误类型
#[derive(Debug, Error)]
pub enum CacheError {
    /// Redis 协议或连接错误
    #[error("Redis 错误: {0}")]
    Redis(#[from] redis::RedisError),

    /// 缓存值序列化失败
    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 其他后端错误
    #[error("缓存后端错误: {0}")]
    Backend(String),
}

/// 缓存 Result 类型
pub type CacheResult<T> = Result<T, CacheError>;

/// 已连接的键值后端
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// 读取键对应的值
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// 写入键值并设置过期时间
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// 删除一组键，返回实际删除的数量
    async fn delete(&self, keys: &[String]) -> CacheResult<u64>;

    /// 删除匹配模式的所有键，返回实际删除的数量
    async fn delete_matching(&self, pattern: &str) -> CacheResult<u64>;

    /// 连通性检查
    async fn ping(&self) -> CacheResult<()>;
}

/// 缓存后端连接器
#[async_trait]
pub trait CacheConnector: Send + Sync + 'static {
    /// 建立一个可用的后端连接
    async fn connect(&self) -> CacheResult<Arc<dyn CacheBackend>>;
}
