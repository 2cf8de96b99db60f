//! FAQ 数据模型
//!
//! 一条 FAQ 记录以规范语言保存主问答文本，其余语言的译文保存在
//! `translations` 映射中。映射的键永远不包含规范语言，该约束由
//! [`FaqRecord::apply_text`] 的写入路径保证。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 某一语言下的问答文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedText {
    pub question: String,
    pub answer: String,
}

/// 一条多语言 FAQ 记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqRecord {
    /// 记录标识，随机生成，对调用方不透明
    #[serde(rename = "_id")]
    pub id: String,
    /// 规范语言代码，主字段中的文本属于该语言
    pub canonical_lang: String,
    /// 规范语言的问题文本
    pub question: String,
    /// 规范语言的答案文本
    pub answer: String,
    /// 其余语言的译文，键为语言代码，不含规范语言
    #[serde(default)]
    pub translations: HashMap<String, TranslatedText>,
    /// 创建时间
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// 最后更新时间
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl FaqRecord {
    /// 创建一条空记录，文本由后续的 `apply_text` 写入
    pub fn new(canonical_lang: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            canonical_lang: canonical_lang.into(),
            question: String::new(),
            answer: String::new(),
            translations: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 将某一语言的问答文本写入记录
    ///
    /// 规范语言写入主字段，其余语言写入 `translations` 映射。
    /// 这是记录文本唯一的写入口，规范语言因此不会出现在映射中。
    pub fn apply_text(&mut self, lang: &str, question: &str, answer: &str) {
        if lang == self.canonical_lang {
            self.question = question.to_string();
            self.answer = answer.to_string();
        } else {
            self.translations.insert(
                lang.to_string(),
                TranslatedText {
                    question: question.to_string(),
                    answer: answer.to_string(),
                },
            );
        }
        self.updated_at = Utc::now();
    }

    /// 读取某一语言的问答文本
    ///
    /// 映射中没有对应译文时回退到规范语言的主字段。
    pub fn text_for(&self, lang: &str) -> (&str, &str) {
        if lang == self.canonical_lang {
            return (&self.question, &self.answer);
        }
        match self.translations.get(lang) {
            Some(text) => (&text.question, &text.answer),
            None => (&self.question, &self.answer),
        }
    }

    /// 生成某一语言下的对外视图
    pub fn view_for(&self, lang: &str) -> FaqView {
        let (question, answer) = self.text_for(lang);
        FaqView {
            id: self.id.clone(),
            language: lang.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    /// 生成完整记录的对外形式，写操作的响应体使用
    ///
    /// 与存储形式的区别只在时间戳的序列化（JSON 中是 RFC 3339
    /// 字符串而非 BSON 日期）。
    pub fn detail(&self) -> FaqDetail {
        FaqDetail {
            id: self.id.clone(),
            canonical_lang: self.canonical_lang.clone(),
            question: self.question.clone(),
            answer: self.answer.clone(),
            translations: self.translations.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// FAQ 在某一语言下的对外投影
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqView {
    pub id: String,
    /// 实际投影使用的语言
    pub language: String,
    pub question: String,
    pub answer: String,
}

/// 完整 FAQ 记录的对外形式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqDetail {
    pub id: String,
    pub canonical_lang: String,
    pub question: String,
    pub answer: String,
    pub translations: HashMap<String, TranslatedText>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
