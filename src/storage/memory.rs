//! 内存存储实现
//!
//! 行为与 MongoDB 实现一致的测试替身。`read_count` 统计数据路径
//! 上的读取次数，缓存命中是否真正避开了存储由它来证明。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::FaqRecord;
use crate::storage::{FaqStore, StoreResult};

/// 内存 FAQ 存储
#[derive(Default)]
pub struct MemoryFaqStore {
    records: RwLock<HashMap<String, FaqRecord>>,
    reads: AtomicU64,
}

impl MemoryFaqStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 至今发生的读取次数（find_all 与 find_by_id 都计入）
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// 当前记录数
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl FaqStore for MemoryFaqStore {
    async fn find_all(&self) -> StoreResult<Vec<FaqRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let records = self.records.read().await;
        let mut all: Vec<FaqRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<FaqRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn save(&self, record: &FaqRecord) -> StoreResult<()> {
        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<FaqRecord>> {
        let mut records = self.records.write().await;
        Ok(records.remove(id))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
