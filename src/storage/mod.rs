//! 持久化存储
//!
//! [`FaqStore`] 是服务层与持久化之间的接缝。生产实现基于 MongoDB，
//! 测试使用内存实现（带读取计数，便于验证缓存命中时不会触达存储）。

pub mod memory;
pub mod mongo;

pub use memory::MemoryFaqStore;
pub use mongo::MongoFaqStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::FaqRecord;

/// 存储错误类型
#[derive(Debug, Error)]
pub enum StoreError {
    /// MongoDB 驱动错误
    #[error("MongoDB 错误: {0}")]
    Database(#[from] mongodb::error::Error),

    /// 存储不可用
    #[error("存储不可用: {0}")]
    Unavailable(String),
}

/// 存储 Result 类型
pub type StoreResult<T> = Result<T, StoreError>;

/// FAQ 记录的持久化接口
#[async_trait]
pub trait FaqStore: Send + Sync + 'static {
    /// 按创建时间从新到旧返回全部记录
    async fn find_all(&self) -> StoreResult<Vec<FaqRecord>>;

    /// 按标识查找记录
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<FaqRecord>>;

    /// 保存记录，已存在时整体替换
    async fn save(&self, record: &FaqRecord) -> StoreResult<()>;

    /// 按标识删除记录，返回被删除的记录
    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<FaqRecord>>;

    /// 连通性检查
    async fn ping(&self) -> StoreResult<()>;
}
