//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::service::FaqService;

/// 应用状态
pub struct AppState {
    pub service: Arc<FaqService>,
}

/// 语言查询参数
#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// 创建或更新 FAQ 的请求体
///
/// 字段都是可选的，缺失与空白在处理器中统一校验并返回 400，
/// 而不是让反序列化失败产生 422。
#[derive(Debug, Deserialize)]
pub struct UpsertFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    /// 编辑文本所属的语言，缺省为规范语言
    pub language: Option<String>,
}

/// 删除成功的响应
#[derive(Debug, Serialize)]
pub struct DeleteFaqResponse {
    pub message: String,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub mongodb: String,
    pub redis: String,
}

/// 缓存统计响应
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    /// 后端连接状态名
    pub state: String,
    pub hits: u64,
    pub misses: u64,
    pub bypasses: u64,
    pub stores: u64,
    pub invalidations: u64,
}

/// 缓存清理响应
#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub success: bool,
    pub removed: u64,
    pub message: String,
}
