//! 缓存层
//!
//! 旁路缓存（cache-aside）实现，核心约定是缓存故障对调用方不可见：
//! 后端不可用、读写出错、序列化失败都只会产生日志，读取路径随即
//! 旁路到底层存储。后端连接在首次使用时才建立，带有限次数的重试，
//! 全部失败后本进程内不再尝试。
//!
//! 连接状态机：
//!
//! ```text
//! Uninitialized --首个调用者--> Connecting --成功--> Ready
//!                                   |
//!                                   +----全部重试失败----> Failed (进程内终态)
//! ```
//!
//! 处于 Connecting 与 Failed 状态时所有操作立即旁路，不排队等待。

pub mod backend;
pub mod memory;
pub mod redis;

pub use backend::{CacheBackend, CacheConnector, CacheError, CacheResult};
pub use memory::{MemoryBackend, MemoryConnector};
pub use self::redis::{RedisBackend, RedisConnector};

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::CacheConfig;

/// 缓存键，由资源类型与语言派生
///
/// 键本身不含配置的全局前缀，前缀在落到后端时由缓存层统一添加。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey(String);

impl CacheKey {
    /// 某一语言下 FAQ 列表投影的键
    pub fn faq_list(lang: &str) -> Self {
        CacheKey(format!("faq:list:{}", lang))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 后端连接状态
enum BackendState {
    Uninitialized,
    Connecting,
    Ready(std::sync::Arc<dyn CacheBackend>),
    Failed,
}

impl BackendState {
    fn name(&self) -> &'static str {
        match self {
            BackendState::Uninitialized => "uninitialized",
            BackendState::Connecting => "connecting",
            BackendState::Ready(_) => "ready",
            BackendState::Failed => "failed",
        }
    }
}

/// 缓存层累计计数
#[derive(Debug, Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    bypasses: AtomicU64,
    stores: AtomicU64,
    invalidations: AtomicU64,
}

/// 缓存层计数快照
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
    /// 命中次数
    pub hits: u64,
    /// 未命中次数
    pub misses: u64,
    /// 旁路次数（后端不可用或读取出错）
    pub bypasses: u64,
    /// 成功写入次数
    pub stores: u64,
    /// 显式失效删除的条目数
    pub invalidations: u64,
}

/// 旁路缓存层
///
/// 始终放在 `Arc` 后面共享。读取入口是 [`get_or_populate`]，
/// 写路径通过 [`invalidate`] 主动删除受影响的投影。
///
/// [`get_or_populate`]: CacheAsideLayer::get_or_populate
/// [`invalidate`]: CacheAsideLayer::invalidate
pub struct CacheAsideLayer {
    connector: std::sync::Arc<dyn CacheConnector>,
    state: RwLock<BackendState>,
    enabled: bool,
    ttl: Duration,
    key_prefix: String,
    connect_retries: usize,
    retry_delay: Duration,
    stats: CacheStats,
}

impl CacheAsideLayer {
    pub fn new(connector: std::sync::Arc<dyn CacheConnector>, config: &CacheConfig) -> Self {
        if !config.enabled {
            tracing::info!("缓存已禁用，所有读取直接访问存储");
        }
        Self {
            connector,
            state: RwLock::new(BackendState::Uninitialized),
            enabled: config.enabled,
            ttl: config.ttl,
            key_prefix: config.key_prefix.clone(),
            connect_retries: config.connect_retries,
            retry_delay: config.retry_delay,
            stats: CacheStats::default(),
        }
    }

    /// 读取缓存值，未命中时调用 `load` 取数并回填
    ///
    /// 后端不可用或读取出错时直接返回 `load` 的结果，对调用方来说
    /// 与缓存不存在时完全一致。只有 `load` 本身的错误会向上传播。
    pub async fn get_or_populate<T, F, Fut, E>(&self, key: &CacheKey, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(backend) = self.acquire_backend().await else {
            self.stats.bypasses.fetch_add(1, Ordering::Relaxed);
            return load().await;
        };

        let full_key = self.full_key(key);

        match backend.get(&full_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    self.stats.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!("缓存条目 '{}' 损坏，删除后按未命中处理: {}", full_key, e);
                    if let Err(e) = backend.delete(std::slice::from_ref(&full_key)).await {
                        tracing::warn!("删除损坏条目 '{}' 失败: {}", full_key, e);
                    }
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("缓存读取 '{}' 失败，旁路访问存储: {}", full_key, e);
                self.stats.bypasses.fetch_add(1, Ordering::Relaxed);
                return load().await;
            }
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        let value = load().await?;

        match serde_json::to_string(&value) {
            Ok(raw) => match backend.set_with_ttl(&full_key, &raw, self.ttl).await {
                Ok(()) => {
                    self.stats.stores.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!("缓存写入 '{}' 失败，忽略: {}", full_key, e);
                }
            },
            Err(e) => {
                tracing::warn!("缓存值序列化失败，跳过写入 '{}': {}", full_key, e);
            }
        }

        Ok(value)
    }

    /// 删除一组键对应的缓存条目
    ///
    /// 删除失败只记录日志，过期的条目最终由 TTL 清理。
    pub async fn invalidate(&self, keys: &[CacheKey]) {
        let Some(backend) = self.acquire_backend().await else {
            return;
        };
        let full_keys: Vec<String> = keys.iter().map(|k| self.full_key(k)).collect();
        match backend.delete(&full_keys).await {
            Ok(removed) => {
                self.stats.invalidations.fetch_add(removed, Ordering::Relaxed);
                tracing::debug!("已失效 {} 个缓存条目", removed);
            }
            Err(e) => {
                tracing::warn!("缓存失效失败，等待 TTL 过期: {}", e);
            }
        }
    }

    /// 清空本服务前缀下的所有缓存条目
    pub async fn clear_all(&self) -> CacheResult<u64> {
        let Some(backend) = self.acquire_backend().await else {
            return Err(CacheError::Backend(
                "cache backend is not ready".to_string(),
            ));
        };
        let pattern = format!("{}*", self.key_prefix);
        let removed = backend.delete_matching(&pattern).await?;
        tracing::info!("已清空 {} 个缓存条目", removed);
        Ok(removed)
    }

    /// 后端是否处于可用状态
    pub async fn is_ready(&self) -> bool {
        matches!(&*self.state.read().await, BackendState::Ready(_))
    }

    /// 当前连接状态名，用于健康检查与统计接口
    ///
    /// 不触发连接：禁用时返回 "disabled"，未初始化时返回
    /// "uninitialized"。
    pub async fn state_name(&self) -> &'static str {
        if !self.enabled {
            return "disabled";
        }
        self.state.read().await.name()
    }

    /// 读取计数快照
    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            bypasses: self.stats.bypasses.load(Ordering::Relaxed),
            stores: self.stats.stores.load(Ordering::Relaxed),
            invalidations: self.stats.invalidations.load(Ordering::Relaxed),
        }
    }

    fn full_key(&self, key: &CacheKey) -> String {
        format!("{}{}", self.key_prefix, key.as_str())
    }

    /// 取得可用后端，必要时执行首次连接
    ///
    /// 返回 `None` 表示本次操作应当旁路。连接由第一个走到
    /// Uninitialized 的调用者内联执行，期间到达的其他调用者
    /// 看到 Connecting 状态后立即旁路，不会排队等待。
    async fn acquire_backend(&self) -> Option<std::sync::Arc<dyn CacheBackend>> {
        if !self.enabled {
            return None;
        }

        {
            let state = self.state.read().await;
            match &*state {
                BackendState::Ready(backend) => return Some(std::sync::Arc::clone(backend)),
                BackendState::Connecting | BackendState::Failed => return None,
                BackendState::Uninitialized => {}
            }
        }

        {
            let mut state = self.state.write().await;
            match &*state {
                BackendState::Ready(backend) => return Some(std::sync::Arc::clone(backend)),
                BackendState::Connecting | BackendState::Failed => return None,
                BackendState::Uninitialized => *state = BackendState::Connecting,
            }
        }

        match self.connect_with_retry().await {
            Some(backend) => {
                let mut state = self.state.write().await;
                *state = BackendState::Ready(std::sync::Arc::clone(&backend));
                tracing::info!("缓存后端就绪");
                Some(backend)
            }
            None => {
                let mut state = self.state.write().await;
                *state = BackendState::Failed;
                tracing::error!("缓存后端初始化失败，本进程内不再重试，所有读取旁路存储");
                None
            }
        }
    }

    /// 执行连接，失败后按配置的间隔重试有限次
    async fn connect_with_retry(&self) -> Option<std::sync::Arc<dyn CacheBackend>> {
        let attempts = self.connect_retries + 1;
        for attempt in 1..=attempts {
            match self.connector.connect().await {
                Ok(backend) => return Some(backend),
                Err(e) => {
                    tracing::warn!("缓存后端连接失败 (尝试 {}/{}): {}", attempt, attempts, e);
                    if attempt < attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    /// 永远连接失败的连接器，记录尝试次数
    struct FailingConnector {
        attempts: AtomicUsize,
    }

    impl FailingConnector {
        fn new() -> Self {
            Self {
                attempts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CacheConnector for FailingConnector {
        async fn connect(&self) -> CacheResult<Arc<dyn CacheBackend>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(CacheError::Backend("connection refused".to_string()))
        }
    }

    fn test_config(enabled: bool) -> CacheConfig {
        CacheConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            enabled,
            ttl: Duration::from_secs(3600),
            key_prefix: "test:".to_string(),
            connect_retries: 2,
            retry_delay: Duration::ZERO,
        }
    }

    async fn load_list(counter: &AtomicUsize) -> Result<Vec<String>, String> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["a".to_string(), "b".to_string()])
    }

    /// 首次读取回填缓存，之后的读取命中且不再调用取数闭包
    #[tokio::test]
    async fn test_populate_then_hit() {
        let connector = MemoryConnector::new();
        let layer = CacheAsideLayer::new(Arc::new(connector), &test_config(true));
        let key = CacheKey::faq_list("en");
        let loads = AtomicUsize::new(0);

        let first = layer.get_or_populate(&key, || load_list(&loads)).await.unwrap();
        let second = layer.get_or_populate(&key, || load_list(&loads)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(loads.load(Ordering::SeqCst), 1, "Second read is served from cache");

        let stats = layer.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.stores, 1);
        assert!(layer.is_ready().await);
        assert_eq!(layer.state_name().await, "ready");
    }

    /// 禁用缓存时每次读取都走取数闭包
    #[tokio::test]
    async fn test_disabled_cache_always_loads() {
        let connector = MemoryConnector::new();
        let layer = CacheAsideLayer::new(Arc::new(connector), &test_config(false));
        let key = CacheKey::faq_list("en");
        let loads = AtomicUsize::new(0);

        layer.get_or_populate(&key, || load_list(&loads)).await.unwrap();
        layer.get_or_populate(&key, || load_list(&loads)).await.unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert_eq!(layer.state_name().await, "disabled");
        assert_eq!(layer.stats().bypasses, 2);
    }

    /// 连接重试耗尽后进入 Failed，之后不再尝试连接
    #[tokio::test]
    async fn test_failed_connection_gives_up_for_process_lifetime() {
        let connector = Arc::new(FailingConnector::new());
        let layer = CacheAsideLayer::new(
            Arc::clone(&connector) as Arc<dyn CacheConnector>,
            &test_config(true),
        );
        let key = CacheKey::faq_list("en");
        let loads = AtomicUsize::new(0);

        let value = layer.get_or_populate(&key, || load_list(&loads)).await.unwrap();
        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            connector.attempts.load(Ordering::SeqCst),
            3,
            "1 initial attempt + 2 retries"
        );
        assert_eq!(layer.state_name().await, "failed");

        layer.get_or_populate(&key, || load_list(&loads)).await.unwrap();
        assert_eq!(
            connector.attempts.load(Ordering::SeqCst),
            3,
            "Failed state never reconnects"
        );
        assert_eq!(loads.load(Ordering::SeqCst), 2, "Every read is served by the loader");
    }

    /// 损坏的缓存条目被删除并按未命中处理
    #[tokio::test]
    async fn test_corrupt_entry_is_discarded() {
        let connector = MemoryConnector::new();
        let backend = connector.backend();
        let layer = CacheAsideLayer::new(Arc::new(connector), &test_config(true));
        let key = CacheKey::faq_list("en");
        let loads = AtomicUsize::new(0);

        backend
            .set_with_ttl("test:faq:list:en", "{not json", Duration::from_secs(60))
            .await
            .unwrap();

        let value = layer.get_or_populate(&key, || load_list(&loads)).await.unwrap();
        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        let raw = backend.get("test:faq:list:en").await.unwrap();
        assert_eq!(
            raw.as_deref(),
            Some(r#"["a","b"]"#),
            "Corrupt entry is replaced by the fresh value"
        );
    }

    /// 显式失效后下一次读取重新取数
    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let connector = MemoryConnector::new();
        let layer = CacheAsideLayer::new(Arc::new(connector), &test_config(true));
        let key = CacheKey::faq_list("en");
        let loads = AtomicUsize::new(0);

        layer.get_or_populate(&key, || load_list(&loads)).await.unwrap();
        layer.invalidate(std::slice::from_ref(&key)).await;
        layer.get_or_populate(&key, || load_list(&loads)).await.unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert_eq!(layer.stats().invalidations, 1);
    }

    /// clear_all 只清掉本前缀下的键
    #[tokio::test]
    async fn test_clear_all_respects_prefix() {
        let connector = MemoryConnector::new();
        let backend = connector.backend();
        let layer = CacheAsideLayer::new(Arc::new(connector), &test_config(true));
        let loads = AtomicUsize::new(0);

        layer
            .get_or_populate(&CacheKey::faq_list("en"), || load_list(&loads))
            .await
            .unwrap();
        backend
            .set_with_ttl("unrelated:key", "x", Duration::ZERO)
            .await
            .unwrap();

        let removed = layer.clear_all().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(backend.get("unrelated:key").await.unwrap(), Some("x".to_string()));
    }
}
