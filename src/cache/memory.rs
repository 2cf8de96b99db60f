//! 内存缓存后端
//!
//! 无外部依赖的后端实现，用于本地开发和测试。过期检查发生在
//! 读取时，过期条目会留在表中直到被覆盖或删除。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::backend::{CacheBackend, CacheConnector, CacheResult};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

/// 内存键值后端
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前未过期的条目数
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.value.clone())),
            _ => Ok(None),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + ttl)
        };
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<u64> {
        let mut entries = self.entries.write().await;
        let mut removed = 0;
        for key in keys {
            if entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn delete_matching(&self, pattern: &str) -> CacheResult<u64> {
        // 只支持尾部通配，与缓存层使用的 "prefix*" 模式对应
        let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
        let mut entries = self.entries.write().await;
        let matched: Vec<String> = entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        for key in &matched {
            entries.remove(key);
        }
        Ok(matched.len() as u64)
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }
}

/// 总是返回同一个内存后端的连接器
pub struct MemoryConnector {
    backend: Arc<MemoryBackend>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
        }
    }

    /// 共享底层后端，测试可以直接检查其内容
    pub fn backend(&self) -> Arc<MemoryBackend> {
        Arc::clone(&self.backend)
    }
}

impl Default for MemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheConnector for MemoryConnector {
    async fn connect(&self) -> CacheResult<Arc<dyn CacheBackend>> {
        Ok(self.backend() as Arc<dyn CacheBackend>)
    }
}
