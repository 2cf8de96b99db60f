//! 服务配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use std::time::Duration;

use crate::env::{EnvError, EnvResult, EnvVar};

/// MongoDB 配置
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB 连接字符串
    pub connection_string: String,
    /// 数据库名称
    pub database_name: String,
    /// 集合名称
    pub collection_name: String,
}

impl MongoConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::mongodb;

        Ok(Self {
            connection_string: mongodb::ConnectionString::get()?,
            database_name: mongodb::DatabaseName::get()?,
            collection_name: mongodb::CollectionName::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.connection_string.is_empty() {
            return Err(EnvError {
                variable: "MONGODB_URL".to_string(),
                message: "Connection string cannot be empty".to_string(),
            });
        }

        if self.database_name.is_empty() {
            return Err(EnvError {
                variable: "MONGODB_DATABASE".to_string(),
                message: "Database name cannot be empty".to_string(),
            });
        }

        if self.collection_name.is_empty() {
            return Err(EnvError {
                variable: "MONGODB_COLLECTION".to_string(),
                message: "Collection name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("Failed to load MongoDB config from environment: {}. Using defaults.", e);
            Self {
                connection_string: "mongodb://localhost:27017".to_string(),
                database_name: "faq_db".to_string(),
                collection_name: "faqs".to_string(),
            }
        })
    }
}

/// 缓存层配置
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis 连接地址
    pub url: String,
    /// 是否启用缓存（禁用时所有读取直接走数据路径）
    pub enabled: bool,
    /// 缓存条目的固定 TTL
    pub ttl: Duration,
    /// 缓存键前缀
    pub key_prefix: String,
    /// 后端初始化失败后的重试次数
    pub connect_retries: usize,
    /// 重试之间的等待时长
    pub retry_delay: Duration,
}

impl CacheConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::cache;

        Ok(Self {
            url: cache::Url::get()?,
            enabled: cache::Enabled::get()?,
            ttl: cache::Ttl::get()?,
            key_prefix: cache::KeyPrefix::get()?,
            connect_retries: cache::ConnectRetries::get()?,
            retry_delay: cache::RetryDelay::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.enabled && self.url.is_empty() {
            return Err(EnvError {
                variable: "REDIS_URL".to_string(),
                message: "Redis URL cannot be empty while the cache is enabled".to_string(),
            });
        }

        if self.ttl.is_zero() {
            return Err(EnvError {
                variable: "POLYFAQ_CACHE_TTL".to_string(),
                message: "TTL cannot be zero".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("Failed to load cache config from environment: {}. Using defaults.", e);
            Self {
                url: "redis://127.0.0.1:6379".to_string(),
                enabled: true,
                ttl: Duration::from_secs(3600),
                key_prefix: "polyfaq:".to_string(),
                connect_retries: 3,
                retry_delay: Duration::from_secs(5),
            }
        })
    }
}

/// 翻译调度配置
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// 翻译 API 地址
    pub api_url: String,
    /// 两次调度之间的最小间隔
    pub min_spacing: Duration,
    /// 单次 HTTP 请求超时（传输层，调度器本身不限时）
    pub request_timeout: Duration,
}

impl TranslatorConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::translation;

        Ok(Self {
            api_url: translation::ApiUrl::get()?,
            min_spacing: translation::MinSpacingMs::get()?,
            request_timeout: translation::RequestTimeout::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.api_url.is_empty() {
            return Err(EnvError {
                variable: "POLYFAQ_TRANSLATION_API_URL".to_string(),
                message: "API URL cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to load translator config from environment: {}. Using defaults.",
                e
            );
            Self {
                api_url: "http://localhost:1188/translate".to_string(),
                min_spacing: Duration::from_millis(1000),
                request_timeout: Duration::from_secs(10),
            }
        })
    }
}

/// 语言配置：规范语言 + 同步翻译的目标语言集合
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// 规范语言（文本存放在记录主字段中的语言）
    pub canonical: String,
    /// 其余需要维护翻译的语言
    pub targets: Vec<String>,
}

impl LanguageConfig {
    pub fn new(canonical: impl Into<String>, targets: Vec<String>) -> Self {
        Self {
            canonical: canonical.into(),
            targets,
        }
    }

    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::languages;

        Ok(Self {
            canonical: languages::Canonical::get()?,
            targets: languages::Targets::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.targets.iter().any(|t| *t == self.canonical) {
            return Err(EnvError {
                variable: "POLYFAQ_TARGET_LANGS".to_string(),
                message: format!(
                    "Target languages must not contain the canonical language '{}'",
                    self.canonical
                ),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for target in &self.targets {
            if !seen.insert(target) {
                return Err(EnvError {
                    variable: "POLYFAQ_TARGET_LANGS".to_string(),
                    message: format!("Duplicate target language '{}'", target),
                });
            }
        }

        Ok(())
    }

    /// 全部支持的语言：规范语言在前，之后是目标语言
    pub fn all(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.canonical).chain(self.targets.iter())
    }

    /// 语言是否在配置的集合中
    pub fn supports(&self, lang: &str) -> bool {
        self.canonical == lang || self.targets.iter().any(|t| t == lang)
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("Failed to load language config from environment: {}. Using defaults.", e);
            Self {
                canonical: "en".to_string(),
                targets: vec!["hi".to_string(), "bn".to_string()],
            }
        })
    }
}

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
    /// MongoDB 配置
    pub mongo: MongoConfig,
    /// 缓存配置
    pub cache: CacheConfig,
    /// 翻译配置
    pub translator: TranslatorConfig,
    /// 语言配置
    pub languages: LanguageConfig,
}

impl WebConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::web;

        Ok(Self {
            bind_addr: web::BindAddress::get()?,
            port: web::Port::get()?,
            mongo: MongoConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            translator: TranslatorConfig::from_env()?,
            languages: LanguageConfig::from_env()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.bind_addr.is_empty() {
            return Err(EnvError {
                variable: "POLYFAQ_BIND_ADDRESS".to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: "POLYFAQ_PORT".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        self.mongo.validate()?;
        self.cache.validate()?;
        self.translator.validate()?;
        self.languages.validate()?;

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// 检查是否为本地开发模式
    pub fn is_development(&self) -> bool {
        use crate::env::core;
        core::Mode::get()
            .map(|mode| mode == "development")
            .unwrap_or(false)
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("Failed to load web config from environment: {}. Using defaults.", e);
            Self {
                bind_addr: "127.0.0.1".to_string(),
                port: 3000,
                mongo: MongoConfig::default(),
                cache: CacheConfig::default(),
                translator: TranslatorConfig::default(),
                languages: LanguageConfig::default(),
            }
        })
    }
}
