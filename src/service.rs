//! FAQ 业务服务
//!
//! 把存储、缓存层和翻译同步引擎组合成对外的业务操作。写路径的
//! 顺序固定：先在内存中完成编辑与译文同步，然后一次性持久化，
//! 最后让受影响的列表投影失效。

use std::sync::Arc;

use crate::cache::{CacheAsideLayer, CacheKey};
use crate::config::LanguageConfig;
use crate::model::{FaqDetail, FaqRecord, FaqView};
use crate::storage::{FaqStore, StoreResult};
use crate::translation::{
    FaqEdit, RateLimitedTranslator, TranslationSyncEngine, TranslatorStatsSnapshot,
};

/// FAQ 业务服务
pub struct FaqService {
    store: Arc<dyn FaqStore>,
    cache: Arc<CacheAsideLayer>,
    engine: TranslationSyncEngine,
    translator: RateLimitedTranslator,
    languages: LanguageConfig,
}

impl FaqService {
    pub fn new(
        store: Arc<dyn FaqStore>,
        cache: Arc<CacheAsideLayer>,
        translator: RateLimitedTranslator,
        languages: LanguageConfig,
    ) -> Self {
        let engine = TranslationSyncEngine::new(translator.clone(), languages.clone());
        Self {
            store,
            cache,
            engine,
            translator,
            languages,
        }
    }

    /// 把请求中的语言参数归一化为配置集合内的语言
    ///
    /// 大小写不敏感；缺失或不在集合内时落到规范语言。写路径也用
    /// 同样的归一，因此列表失效只需覆盖配置集合内的键。
    fn resolve_lang(&self, requested: Option<&str>) -> String {
        let Some(requested) = requested else {
            return self.languages.canonical.clone();
        };
        let normalized = requested.trim().to_lowercase();
        if self.languages.supports(&normalized) {
            normalized
        } else {
            tracing::debug!(
                "请求的语言 '{}' 不在配置集合内，使用规范语言 '{}'",
                requested,
                self.languages.canonical
            );
            self.languages.canonical.clone()
        }
    }

    /// 某一语言下的 FAQ 列表，从新到旧
    ///
    /// 唯一走缓存的读取。缓存不可用时直接访问存储，调用方无感知。
    pub async fn list_faqs(&self, lang: Option<&str>) -> StoreResult<Vec<FaqView>> {
        let lang = self.resolve_lang(lang);
        let key = CacheKey::faq_list(&lang);
        let store = Arc::clone(&self.store);

        self.cache
            .get_or_populate(&key, move || async move {
                let records = store.find_all().await?;
                let views = records.iter().map(|r| r.view_for(&lang)).collect();
                Ok(views)
            })
            .await
    }

    /// 按标识读取单条 FAQ，语言投影规则与列表一致
    pub async fn get_faq(&self, id: &str, lang: Option<&str>) -> StoreResult<Option<FaqView>> {
        let lang = self.resolve_lang(lang);
        let record = self.store.find_by_id(id).await?;
        Ok(record.map(|r| r.view_for(&lang)))
    }

    /// 创建一条 FAQ，返回完整记录
    ///
    /// 编辑语言任意，规范文本与各语言译文由同步引擎填好后才落库。
    pub async fn create_faq(
        &self,
        question: &str,
        answer: &str,
        language: Option<&str>,
    ) -> StoreResult<FaqDetail> {
        let lang = self.resolve_lang(language);
        let mut record = FaqRecord::new(self.languages.canonical.clone());
        let edit = FaqEdit {
            language: lang,
            question: question.to_string(),
            answer: answer.to_string(),
        };

        self.engine.apply_edit(&mut record, &edit).await;
        self.store.save(&record).await?;
        self.invalidate_lists().await;

        tracing::info!("FAQ {} 已创建", record.id);
        Ok(record.detail())
    }

    /// 更新一条 FAQ，返回完整记录，记录不存在时返回 `None`
    pub async fn update_faq(
        &self,
        id: &str,
        question: &str,
        answer: &str,
        language: Option<&str>,
    ) -> StoreResult<Option<FaqDetail>> {
        let lang = self.resolve_lang(language);
        let Some(mut record) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        let edit = FaqEdit {
            language: lang.clone(),
            question: question.to_string(),
            answer: answer.to_string(),
        };

        self.engine.apply_edit(&mut record, &edit).await;
        self.store.save(&record).await?;
        self.invalidate_lists().await;

        tracing::info!("FAQ {} 已更新 (语言 '{}')", id, lang);
        Ok(Some(record.detail()))
    }

    /// 删除一条 FAQ，返回是否确有删除
    pub async fn delete_faq(&self, id: &str) -> StoreResult<bool> {
        let removed = self.store.delete_by_id(id).await?;
        if removed.is_some() {
            self.invalidate_lists().await;
            tracing::info!("FAQ {} 已删除", id);
        }
        Ok(removed.is_some())
    }

    /// 存储连通性检查
    pub async fn ping_store(&self) -> StoreResult<()> {
        self.store.ping().await
    }

    /// 缓存层句柄，统计与运维接口使用
    pub fn cache(&self) -> &CacheAsideLayer {
        &self.cache
    }

    /// 翻译调度器计数快照
    pub fn translator_stats(&self) -> TranslatorStatsSnapshot {
        self.translator.stats()
    }

    /// 删除所有语言的列表投影缓存
    ///
    /// 写操作完成后调用，读取到过期列表的窗口由此消除。
    async fn invalidate_lists(&self) {
        let keys: Vec<CacheKey> = self
            .languages
            .all()
            .map(|lang| CacheKey::faq_list(lang))
            .collect();
        self.cache.invalidate(&keys).await;
    }
}
