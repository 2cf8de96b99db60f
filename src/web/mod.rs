//! Web 服务器模块
//!
//! 提供多语言 FAQ 的 REST API

pub mod error;
pub mod handlers;
pub mod routes;
pub mod types;

pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::cache::{CacheAsideLayer, RedisConnector};
use crate::config::WebConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::service::FaqService;
use crate::storage::MongoFaqStore;
use crate::translation::{DeepLxClient, RateLimitedTranslator};

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig) -> Self {
        Self { config }
    }

    /// 启动 Web 服务器
    ///
    /// 存储连接失败会让启动失败；缓存后端则到首次使用时才连接，
    /// 其可用性不影响启动。
    pub async fn start(&self) -> ServiceResult<()> {
        let store = MongoFaqStore::connect(&self.config.mongo).await?;
        if let Err(e) = store.ensure_indexes().await {
            tracing::warn!("创建索引失败，列表查询可能变慢: {}", e);
        }

        let backend = DeepLxClient::new(&self.config.translator)?;
        let translator =
            RateLimitedTranslator::spawn(Arc::new(backend), self.config.translator.min_spacing);

        let connector = RedisConnector::new(self.config.cache.clone());
        let cache = Arc::new(CacheAsideLayer::new(
            Arc::new(connector),
            &self.config.cache,
        ));

        let service = Arc::new(FaqService::new(
            Arc::new(store),
            cache,
            translator,
            self.config.languages.clone(),
        ));

        let app_state = Arc::new(AppState { service });
        let app = create_router(app_state);

        let listener = tokio::net::TcpListener::bind(self.config.listen_address()).await?;
        tracing::info!("FAQ 服务监听于 http://{}", self.config.listen_address());

        axum::serve(listener, app)
            .await
            .map_err(|e| ServiceError::Web(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}
