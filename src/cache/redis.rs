//! Redis 缓存后端
//!
//! 基于 `ConnectionManager` 的异步实现，每个操作克隆一份连接句柄。
//! 连接断开后 manager 会自动重连，这里不做额外的重试。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;

use crate::cache::backend::{CacheBackend, CacheConnector, CacheError, CacheResult};
use crate::config::CacheConfig;

/// Redis 连接器
pub struct RedisConnector {
    config: CacheConfig,
}

impl RedisConnector {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CacheConnector for RedisConnector {
    async fn connect(&self) -> CacheResult<Arc<dyn CacheBackend>> {
        let client = redis::Client::open(self.config.url.as_str())?;
        let manager = client.get_connection_manager().await?;

        // 建连后立即验证一次连通性
        let mut conn = manager.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong != "PONG" {
            return Err(CacheError::Backend(format!(
                "unexpected PING reply: {}",
                pong
            )));
        }

        tracing::info!("Redis 缓存后端连接成功");
        Ok(Arc::new(RedisBackend { manager }))
    }
}

/// 已连接的 Redis 后端
pub struct RedisBackend {
    manager: ConnectionManager,
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        let secs = ttl.as_secs();
        if secs > 0 {
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(secs)
                .arg(value)
                .query_async(&mut conn)
                .await?;
        } else {
            let _: () = redis::cmd("SET")
                .arg(key)
                .arg(value)
                .query_async(&mut conn)
                .await?;
        }
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.manager.clone();
        let mut cmd = redis::cmd("DEL");
        for key in keys {
            cmd.arg(key);
        }
        let removed: u64 = cmd.query_async(&mut conn).await?;
        Ok(removed)
    }

    async fn delete_matching(&self, pattern: &str) -> CacheResult<u64> {
        let mut conn = self.manager.clone();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let mut cmd = redis::cmd("DEL");
        for key in &keys {
            cmd.arg(key);
        }
        let removed: u64 = cmd.query_async(&mut conn).await?;
        Ok(removed)
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
