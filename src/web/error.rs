//! API 错误响应
//!
//! 错误分三类对外暴露：输入错误 400、未找到 404、其余一律 500。
//! 翻译失败和缓存故障在下层已经降级，永远不会走到这里。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::storage::StoreError;

/// 处理器统一的错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 请求输入不合法，附带逐项错误说明
    Validation(Vec<String>),
    /// 目标记录不存在
    NotFound,
    /// 内部错误，细节只进日志，不回给客户端
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": true,
                    "message": "Validation failed",
                    "errors": errors,
                })),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": true,
                    "message": "FAQ not found",
                })),
            )
                .into_response(),
            ApiError::Internal(detail) => {
                tracing::error!("请求处理失败: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": true,
                        "message": "An unexpected error occurred",
                    })),
                )
                    .into_response()
            }
        }
    }
}
