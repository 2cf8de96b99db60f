//! 翻译同步引擎
//!
//! 一次编辑只携带一种语言的问答文本，引擎负责把这条编辑应用到
//! 记录上，并为配置的其余语言生成译文。编辑文本先落入记录，
//! 之后才发起翻译，翻译全部失败时记录仍然保有编辑内容。

use crate::config::LanguageConfig;
use crate::model::FaqRecord;
use crate::translation::limiter::{RateLimitedTranslator, TranslationOutcome};

/// 一次单语言编辑
#[derive(Debug, Clone)]
pub struct FaqEdit {
    /// 编辑文本所属的语言
    pub language: String,
    pub question: String,
    pub answer: String,
}

/// 一次同步的翻译结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// 成功翻译的字段数
    pub translated: usize,
    /// 回退为原文的字段数
    pub fallen_back: usize,
}

impl SyncReport {
    fn count(&mut self, outcome: &TranslationOutcome) {
        match outcome {
            TranslationOutcome::Translated(_) => self.translated += 1,
            TranslationOutcome::FallenBack(_) => self.fallen_back += 1,
        }
    }
}

/// 翻译同步引擎
///
/// 持有调度器句柄和语言配置，本身无状态，可随意克隆。
#[derive(Clone)]
pub struct TranslationSyncEngine {
    translator: RateLimitedTranslator,
    languages: LanguageConfig,
}

impl TranslationSyncEngine {
    pub fn new(translator: RateLimitedTranslator, languages: LanguageConfig) -> Self {
        Self {
            translator,
            languages,
        }
    }

    /// 将一次编辑应用到记录，并同步其余语言的译文
    ///
    /// 流程分三步：
    /// 1. 编辑文本按语言写入记录（规范语言进主字段，其余进映射）；
    /// 2. 对配置中除编辑语言外的每种语言，并发翻译问题与答案，
    ///    等待全部完成；
    /// 3. 把每种语言的结果文本写回记录。失败的字段写回原文，
    ///    单个语言的失败不影响其他语言。
    ///
    /// 调用方负责在此之后持久化记录，本函数不触碰存储。
    pub async fn apply_edit(&self, record: &mut FaqRecord, edit: &FaqEdit) -> SyncReport {
        record.apply_text(&edit.language, &edit.question, &edit.answer);

        let targets: Vec<String> = self
            .languages
            .all()
            .filter(|lang| **lang != edit.language)
            .cloned()
            .collect();

        let jobs = targets.into_iter().map(|lang| {
            let translator = self.translator.clone();
            async move {
                let (question, answer) = futures::join!(
                    translator.translate(&edit.question, &lang),
                    translator.translate(&edit.answer, &lang),
                );
                (lang, question, answer)
            }
        });
        let results = futures::future::join_all(jobs).await;

        let mut report = SyncReport::default();
        for (lang, question, answer) in results {
            report.count(&question);
            report.count(&answer);
            record.apply_text(&lang, question.text(), answer.text());
        }

        tracing::debug!(
            "记录 {} 的 '{}' 编辑已同步: {} 个字段翻译成功, {} 个回退",
            record.id,
            edit.language,
            report.translated,
            report.fallen_back
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::client::TranslateBackend;
    use crate::translation::error::{TranslationError, TranslationResult};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct UppercaseBackend;

    #[async_trait]
    impl TranslateBackend for UppercaseBackend {
        async fn translate_text(&self, text: &str, _target_lang: &str) -> TranslationResult<String> {
            Ok(text.to_uppercase())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl TranslateBackend for FailingBackend {
        async fn translate_text(&self, _text: &str, _target_lang: &str) -> TranslationResult<String> {
            Err(TranslationError::Network("connection refused".to_string()))
        }
    }

    /// 只对孟加拉语失败的桩后端
    struct BengaliFailsBackend;

    #[async_trait]
    impl TranslateBackend for BengaliFailsBackend {
        async fn translate_text(&self, text: &str, target_lang: &str) -> TranslationResult<String> {
            if target_lang == "bn" {
                Err(TranslationError::ApiStatus { code: 503 })
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    fn engine_with(backend: Arc<dyn TranslateBackend>) -> TranslationSyncEngine {
        let translator = RateLimitedTranslator::spawn(backend, Duration::ZERO);
        let languages = LanguageConfig::new("en", vec!["hi".to_string(), "bn".to_string()]);
        TranslationSyncEngine::new(translator, languages)
    }

    /// 规范语言编辑写入主字段，并向所有目标语言扇出
    #[tokio::test]
    async fn test_canonical_edit_fans_out_to_targets() {
        let engine = engine_with(Arc::new(UppercaseBackend));
        let mut record = FaqRecord::new("en");
        let edit = FaqEdit {
            language: "en".to_string(),
            question: "What is this?".to_string(),
            answer: "A service.".to_string(),
        };

        let report = engine.apply_edit(&mut record, &edit).await;

        assert_eq!(record.question, "What is this?", "Edited text stays exact");
        assert_eq!(record.answer, "A service.");
        assert_eq!(record.translations.len(), 2);
        assert_eq!(record.translations["hi"].question, "WHAT IS THIS?");
        assert_eq!(record.translations["bn"].answer, "A SERVICE.");
        assert!(!record.translations.contains_key("en"));
        assert_eq!(report, SyncReport { translated: 4, fallen_back: 0 });
    }

    /// 非规范语言编辑先落入映射，再向包括规范语言在内的其余语言扇出
    #[tokio::test]
    async fn test_non_canonical_edit_updates_map_and_canonical() {
        let engine = engine_with(Arc::new(UppercaseBackend));
        let mut record = FaqRecord::new("en");
        record.apply_text("en", "old question", "old answer");

        let edit = FaqEdit {
            language: "hi".to_string(),
            question: "hindi question".to_string(),
            answer: "hindi answer".to_string(),
        };
        engine.apply_edit(&mut record, &edit).await;

        assert_eq!(
            record.translations["hi"].question, "hindi question",
            "Edited language keeps the exact text, never a round-trip translation"
        );
        assert_eq!(record.translations["hi"].answer, "hindi answer");
        assert_eq!(record.question, "HINDI QUESTION", "Canonical fields get translated");
        assert_eq!(record.translations["bn"].question, "HINDI QUESTION");
        assert!(!record.translations.contains_key("en"));
    }

    /// 后端全部失败时，所有语言持有编辑原文
    #[tokio::test]
    async fn test_total_failure_leaves_source_text_everywhere() {
        let engine = engine_with(Arc::new(FailingBackend));
        let mut record = FaqRecord::new("en");
        let edit = FaqEdit {
            language: "en".to_string(),
            question: "Q1".to_string(),
            answer: "A1".to_string(),
        };

        let report = engine.apply_edit(&mut record, &edit).await;

        assert_eq!(record.question, "Q1");
        assert_eq!(record.translations["hi"].question, "Q1");
        assert_eq!(record.translations["hi"].answer, "A1");
        assert_eq!(record.translations["bn"].question, "Q1");
        assert_eq!(report, SyncReport { translated: 0, fallen_back: 4 });
    }

    /// 单个语言失败不影响其他语言的译文
    #[tokio::test]
    async fn test_per_language_isolation() {
        let engine = engine_with(Arc::new(BengaliFailsBackend));
        let mut record = FaqRecord::new("en");
        let edit = FaqEdit {
            language: "en".to_string(),
            question: "hello".to_string(),
            answer: "world".to_string(),
        };

        let report = engine.apply_edit(&mut record, &edit).await;

        assert_eq!(record.translations["hi"].question, "HELLO");
        assert_eq!(record.translations["bn"].question, "hello", "Failed language falls back");
        assert_eq!(report, SyncReport { translated: 2, fallen_back: 2 });
    }
}
