//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::handlers::{
    cache_stats, clear_cache, create_faq, delete_faq, get_faq, health_check, list_faqs,
    translation_stats, update_faq,
};
use crate::web::types::AppState;

/// 创建全部路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // FAQ 资源
        .route("/api/faqs", get(list_faqs).post(create_faq))
        .route(
            "/api/faqs/:id",
            get(get_faq).put(update_faq).delete(delete_faq),
        )
        // 运维接口
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/cache/clear", post(clear_cache))
        .route("/api/translation/stats", get(translation_stats))
}
