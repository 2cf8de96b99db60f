//! 限速翻译调度器
//!
//! 所有翻译调用汇入同一条 FIFO 队列，由单个调度任务逐个派发：
//! 任意时刻最多一个请求在途，相邻两次派发的起始时刻至少间隔
//! `min_spacing`。调用方拿到的永远是文本，后端失败时降级为原文，
//! 错误在这里记录日志后即被吸收。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::translation::client::TranslateBackend;

/// 一次翻译调用的结果文本
///
/// 两个变体都携带可直接使用的文本，标签只说明文本的来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// 后端成功返回的译文
    Translated(String),
    /// 后端失败，回退为未经修改的原文
    FallenBack(String),
}

impl TranslationOutcome {
    /// 借用结果文本
    pub fn text(&self) -> &str {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::FallenBack(text) => text,
        }
    }

    /// 取出结果文本
    pub fn into_text(self) -> String {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::FallenBack(text) => text,
        }
    }

    /// 是否为原文回退
    pub fn is_fallback(&self) -> bool {
        matches!(self, TranslationOutcome::FallenBack(_))
    }
}

/// 队列中的一项翻译任务
struct TranslationJob {
    text: String,
    target_lang: String,
    reply: oneshot::Sender<TranslationOutcome>,
}

/// 调度器累计计数
#[derive(Debug, Default)]
struct TranslatorStats {
    submitted: AtomicU64,
    translated: AtomicU64,
    fallen_back: AtomicU64,
}

/// 调度器计数快照
#[derive(Debug, Clone, Serialize)]
pub struct TranslatorStatsSnapshot {
    /// 已提交的翻译调用数
    pub submitted: u64,
    /// 后端成功返回译文的次数
    pub translated: u64,
    /// 降级为原文回退的次数
    pub fallen_back: u64,
}

impl TranslatorStats {
    fn snapshot(&self) -> TranslatorStatsSnapshot {
        TranslatorStatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            translated: self.translated.load(Ordering::Relaxed),
            fallen_back: self.fallen_back.load(Ordering::Relaxed),
        }
    }
}

/// 限速翻译调度器句柄
///
/// 克隆开销很小，所有克隆共享同一条队列和同一个调度任务。
/// 最后一个句柄释放后队列关闭，调度任务随之退出。
#[derive(Clone)]
pub struct RateLimitedTranslator {
    queue: mpsc::UnboundedSender<TranslationJob>,
    stats: Arc<TranslatorStats>,
}

impl RateLimitedTranslator {
    /// 启动调度任务并返回句柄
    pub fn spawn(backend: Arc<dyn TranslateBackend>, min_spacing: Duration) -> Self {
        let (queue, rx) = mpsc::unbounded_channel();
        tokio::spawn(dispatch_loop(backend, rx, min_spacing));
        Self {
            queue,
            stats: Arc::new(TranslatorStats::default()),
        }
    }

    /// 翻译一段文本，永不失败
    ///
    /// 任何环节出错（后端失败、调度任务退出）都记录日志并返回原文。
    pub async fn translate(&self, text: &str, target_lang: &str) -> TranslationOutcome {
        self.stats.submitted.fetch_add(1, Ordering::Relaxed);

        let (reply, receiver) = oneshot::channel();
        let job = TranslationJob {
            text: text.to_string(),
            target_lang: target_lang.to_string(),
            reply,
        };

        if self.queue.send(job).is_err() {
            tracing::warn!("翻译调度任务已退出，返回原文");
            self.stats.fallen_back.fetch_add(1, Ordering::Relaxed);
            return TranslationOutcome::FallenBack(text.to_string());
        }

        let outcome = match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!("翻译调度任务丢弃了应答，返回原文");
                TranslationOutcome::FallenBack(text.to_string())
            }
        };

        match &outcome {
            TranslationOutcome::Translated(_) => {
                self.stats.translated.fetch_add(1, Ordering::Relaxed);
            }
            TranslationOutcome::FallenBack(_) => {
                self.stats.fallen_back.fetch_add(1, Ordering::Relaxed);
            }
        }
        outcome
    }

    /// 读取计数快照
    pub fn stats(&self) -> TranslatorStatsSnapshot {
        self.stats.snapshot()
    }
}

/// 调度循环：逐个取任务，按最小间隔派发
///
/// 间隔以派发起始时刻计算。后端调用在循环内同步等待完成，
/// 因此在途请求数不会超过 1。
async fn dispatch_loop(
    backend: Arc<dyn TranslateBackend>,
    mut rx: mpsc::UnboundedReceiver<TranslationJob>,
    min_spacing: Duration,
) {
    let mut last_dispatch: Option<Instant> = None;

    while let Some(job) = rx.recv().await {
        if let Some(prev) = last_dispatch {
            tokio::time::sleep_until(prev + min_spacing).await;
        }
        last_dispatch = Some(Instant::now());

        let TranslationJob {
            text,
            target_lang,
            reply,
        } = job;

        let outcome = match backend.translate_text(&text, &target_lang).await {
            Ok(translated) => TranslationOutcome::Translated(translated),
            Err(e) => {
                tracing::warn!("翻译到 '{}' 失败，返回原文: {}", target_lang, e);
                TranslationOutcome::FallenBack(text)
            }
        };

        // 调用方可能已放弃等待，发送失败不影响调度
        let _ = reply.send(outcome);
    }
}
