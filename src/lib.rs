//! # PolyFAQ
//!
//! 多语言 FAQ 服务：以规范语言维护问答文本，自动为配置的目标语言
//! 同步译文，并通过 REST API 对外提供按语言投影的读取。
//!
//! ## 模块组织
//!
//! - `model` - FAQ 记录与语言投影
//! - `storage` - MongoDB 持久化与内存测试实现
//! - `cache` - 旁路缓存层，带连接状态机与故障旁路
//! - `translation` - 限速翻译调度器与译文同步引擎
//! - `service` - 业务操作的组合层
//! - `web` - REST API 服务器
//! - `config` / `env` - 类型安全的配置系统

pub mod cache;
pub mod config;
pub mod env;
pub mod error;
pub mod model;
pub mod service;
pub mod storage;
pub mod translation;
pub mod web;

// Re-export commonly used items for convenience
pub use cache::{CacheAsideLayer, CacheKey};
pub use error::{ServiceError, ServiceResult};
pub use model::{FaqRecord, FaqView, TranslatedText};
pub use service::FaqService;
pub use storage::{FaqStore, MongoFaqStore};
pub use translation::{RateLimitedTranslator, TranslationOutcome, TranslationSyncEngine};
