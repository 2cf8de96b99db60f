//! 翻译模块
//!
//! 分为三层：
//! - **client**: 翻译后端接缝与 DeepLX 兼容 HTTP 客户端
//! - **limiter**: 单槽 FIFO 限速调度器，吸收所有后端错误
//! - **sync**: 按语言同步 FAQ 记录译文的引擎
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use polyfaq::config::TranslatorConfig;
//! use polyfaq::translation::{DeepLxClient, RateLimitedTranslator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TranslatorConfig::default();
//! let client = DeepLxClient::new(&config)?;
//! let translator = RateLimitedTranslator::spawn(Arc::new(client), config.min_spacing);
//!
//! // 永不失败：后端出错时返回原文
//! let outcome = translator.translate("Hello", "hi").await;
//! println!("{}", outcome.text());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod limiter;
pub mod sync;

pub use client::{DeepLxClient, TranslateBackend};
pub use error::{TranslationError, TranslationResult};
pub use limiter::{RateLimitedTranslator, TranslationOutcome, TranslatorStatsSnapshot};
pub use sync::{FaqEdit, SyncReport, TranslationSyncEngine};
