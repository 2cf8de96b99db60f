//! 运维统计处理器

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::translation::TranslatorStatsSnapshot;
use crate::web::types::{AppState, CacheStatsResponse, ClearCacheResponse};

/// GET /api/cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    let cache = state.service.cache();
    let snapshot = cache.stats();

    Json(CacheStatsResponse {
        state: cache.state_name().await.to_string(),
        hits: snapshot.hits,
        misses: snapshot.misses,
        bypasses: snapshot.bypasses,
        stores: snapshot.stores,
        invalidations: snapshot.invalidations,
    })
}

/// POST /api/cache/clear
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ClearCacheResponse> {
    match state.service.cache().clear_all().await {
        Ok(removed) => Json(ClearCacheResponse {
            success: true,
            removed,
            message: format!("Cleared {} cache entries", removed),
        }),
        Err(e) => {
            tracing::warn!("清理缓存失败: {}", e);
            Json(ClearCacheResponse {
                success: false,
                removed: 0,
                message: "Cache backend is not ready".to_string(),
            })
        }
    }
}

/// GET /api/translation/stats
pub async fn translation_stats(State(state): State<Arc<AppState>>) -> Json<TranslatorStatsSnapshot> {
    Json(state.service.translator_stats())
}
