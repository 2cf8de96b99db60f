//! 健康检查处理器

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::web::types::{AppState, HealthResponse};

/// GET /health
///
/// MongoDB 做真实的连通性探测；缓存只报告当前状态机状态，
/// 不会因为健康检查而触发首次连接。
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mongodb = match state.service.ping_store().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!("健康检查: MongoDB 不可达: {}", e);
            "down"
        }
    };
    let redis = state.service.cache().state_name().await;

    let status = if mongodb == "up" { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        mongodb: mongodb.to_string(),
        redis: redis.to_string(),
    })
}
