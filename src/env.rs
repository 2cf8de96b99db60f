//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，配置结构体在 `config` 模块中聚合

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 应用运行模式
    pub struct Mode;
    impl EnvVar<String> for Mode {
        const NAME: &'static str = "POLYFAQ_MODE";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("production".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Application mode: development, staging, production";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "development" | "dev" => Ok("development".to_string()),
                "staging" | "stage" => Ok("staging".to_string()),
                "production" | "prod" => Ok("production".to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid mode '{}'. Use: development, staging, production", value),
                }),
            }
        }
    }

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "POLYFAQ_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid log level '{}'. Use: trace, debug, info, warn, error", value),
                }),
            }
        }
    }
}

/// Web 服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "POLYFAQ_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "POLYFAQ_PORT";
        const DEFAULT: Option<u16> = Some(3000);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }

            Ok(port)
        }
    }
}

/// MongoDB相关环境变量
pub mod mongodb {
    use super::*;

    /// MongoDB连接字符串
    pub struct ConnectionString;
    impl EnvVar<String> for ConnectionString {
        const NAME: &'static str = "MONGODB_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("mongodb://localhost:27017".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB connection string";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "MongoDB URL must start with mongodb:// or mongodb+srv://".to_string(),
                })
            }
        }
    }

    /// 数据库名称
    pub struct DatabaseName;
    impl EnvVar<String> for DatabaseName {
        const NAME: &'static str = "MONGODB_DATABASE";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("faq_db".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB database name";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME, "Database name")
        }
    }

    /// 集合名称
    pub struct CollectionName;
    impl EnvVar<String> for CollectionName {
        const NAME: &'static str = "MONGODB_COLLECTION";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("faqs".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB collection name";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME, "Collection name")
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// Redis 连接地址
    pub struct Url;
    impl EnvVar<String> for Url {
        const NAME: &'static str = "REDIS_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("redis://127.0.0.1:6379".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Redis connection URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("redis://") || url.starts_with("rediss://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Redis URL must start with redis:// or rediss://".to_string(),
                })
            }
        }
    }

    /// 缓存启用状态
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "POLYFAQ_CACHE_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Enable the Redis read-through cache";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 缓存TTL
    pub struct Ttl;
    impl EnvVar<Duration> for Ttl {
        const NAME: &'static str = "POLYFAQ_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(3600));
        const DESCRIPTION: &'static str = "Cache TTL in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_secs_in_range(value, Self::NAME, 60, 86400 * 7)
        }
    }

    /// 缓存键前缀
    pub struct KeyPrefix;
    impl EnvVar<String> for KeyPrefix {
        const NAME: &'static str = "POLYFAQ_CACHE_PREFIX";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("polyfaq:".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Prefix applied to every cache key";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// 后端初始化重试次数
    pub struct ConnectRetries;
    impl EnvVar<usize> for ConnectRetries {
        const NAME: &'static str = "POLYFAQ_CACHE_CONNECT_RETRIES";
        const DEFAULT: Option<usize> = Some(3);
        const DESCRIPTION: &'static str = "Connection retries before the cache backend is marked failed";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_usize_in_range(value, Self::NAME, 0, 10)
        }
    }

    /// 重试间隔
    pub struct RetryDelay;
    impl EnvVar<Duration> for RetryDelay {
        const NAME: &'static str = "POLYFAQ_CACHE_RETRY_DELAY";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(5));
        const DESCRIPTION: &'static str = "Delay between cache backend connection retries, in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_secs_in_range(value, Self::NAME, 1, 60)
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 翻译 API 地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "POLYFAQ_TRANSLATION_API_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("http://localhost:1188/translate".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Translation API endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 调度最小间隔（毫秒）
    pub struct MinSpacingMs;
    impl EnvVar<Duration> for MinSpacingMs {
        const NAME: &'static str = "POLYFAQ_TRANSLATION_MIN_SPACING_MS";
        const DEFAULT: Option<Duration> = Some(Duration::from_millis(1000));
        const DESCRIPTION: &'static str = "Minimum milliseconds between translation API calls";

        fn parse(value: &str) -> EnvResult<Duration> {
            let millis: u64 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of milliseconds".to_string(),
            })?;

            if millis > 60_000 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Spacing too long (max 60000 ms)".to_string(),
                });
            }

            Ok(Duration::from_millis(millis))
        }
    }

    /// 单次请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "POLYFAQ_TRANSLATION_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(10));
        const DESCRIPTION: &'static str = "Transport-level timeout per translation request, in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_secs_in_range(value, Self::NAME, 1, 120)
        }
    }
}

/// 语言配置相关环境变量
pub mod languages {
    use super::*;

    /// 规范语言（主字段所用语言）
    pub struct Canonical;
    impl EnvVar<String> for Canonical {
        const NAME: &'static str = "POLYFAQ_CANONICAL_LANG";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("en".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Canonical language code (ISO 639-1)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_lang_code(value, Self::NAME)
        }
    }

    /// 需要同步翻译的目标语言
    pub struct Targets;
    impl EnvVar<Vec<String>> for Targets {
        const NAME: &'static str = "POLYFAQ_TARGET_LANGS";
        const DEFAULT: Option<Vec<String>> = None;

        fn get() -> EnvResult<Vec<String>> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(vec!["hi".to_string(), "bn".to_string()]),
            }
        }
        const DESCRIPTION: &'static str = "Comma-separated target language codes (ISO 639-1)";

        fn parse(value: &str) -> EnvResult<Vec<String>> {
            let codes: Vec<String> = value
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| parse_lang_code(s, Self::NAME))
                .collect::<EnvResult<Vec<String>>>()?;

            if codes.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "At least one target language is required".to_string(),
                });
            }

            Ok(codes)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_usize_in_range(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid non-negative number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_secs_in_range(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<Duration> {
    let seconds: u64 = value.parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid number of seconds".to_string(),
    })?;

    if seconds < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {} seconds", seconds, min),
        });
    }

    if seconds > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {} seconds", seconds, max),
        });
    }

    Ok(Duration::from_secs(seconds))
}

fn parse_lang_code(value: &str, var_name: &str) -> EnvResult<String> {
    let lang = value.trim().to_lowercase();
    if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid language code '{}': must be 2 characters (ISO 639-1)", value),
        });
    }
    Ok(lang)
}

fn non_empty(value: &str, var_name: &str, what: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("{} cannot be empty", what),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_mode_parsing() {
        assert_eq!(core::Mode::parse("development").unwrap(), "development");
        assert_eq!(core::Mode::parse("PRODUCTION").unwrap(), "production");
        assert_eq!(core::Mode::parse("staging").unwrap(), "staging");

        assert!(core::Mode::parse("invalid").is_err());
    }

    #[test]
    fn test_boolean_parsing() {
        assert!(cache::Enabled::parse("true").unwrap());
        assert!(cache::Enabled::parse("1").unwrap());
        assert!(cache::Enabled::parse("YES").unwrap());

        assert!(!cache::Enabled::parse("false").unwrap());
        assert!(!cache::Enabled::parse("0").unwrap());
        assert!(!cache::Enabled::parse("off").unwrap());

        assert!(cache::Enabled::parse("maybe").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(translation::ApiUrl::parse("http://localhost:1188/translate").is_ok());
        assert!(translation::ApiUrl::parse("https://api.example.com").is_ok());
        assert!(translation::ApiUrl::parse("ftp://example.com").is_err());

        assert!(cache::Url::parse("redis://127.0.0.1:6379").is_ok());
        assert!(cache::Url::parse("rediss://secure:6380").is_ok());
        assert!(cache::Url::parse("http://127.0.0.1:6379").is_err());

        assert!(mongodb::ConnectionString::parse("mongodb://localhost:27017").is_ok());
        assert!(mongodb::ConnectionString::parse("mongodb+srv://cluster.example.com").is_ok());
        assert!(mongodb::ConnectionString::parse("localhost:27017").is_err());
    }

    #[test]
    fn test_duration_parsing() {
        assert_eq!(cache::Ttl::parse("3600").unwrap(), Duration::from_secs(3600));
        assert!(cache::Ttl::parse("10").is_err(), "TTL below minimum should be rejected");
        assert!(cache::Ttl::parse("not-a-number").is_err());

        assert_eq!(
            translation::MinSpacingMs::parse("1000").unwrap(),
            Duration::from_millis(1000)
        );
        assert_eq!(
            translation::MinSpacingMs::parse("0").unwrap(),
            Duration::from_millis(0),
            "Zero spacing is allowed for tests and local development"
        );
        assert!(translation::MinSpacingMs::parse("120000").is_err());
    }

    #[test]
    fn test_language_code_parsing() {
        assert_eq!(languages::Canonical::parse("EN").unwrap(), "en");
        assert!(languages::Canonical::parse("eng").is_err());
        assert!(languages::Canonical::parse("").is_err());

        assert_eq!(
            languages::Targets::parse("hi, bn").unwrap(),
            vec!["hi".to_string(), "bn".to_string()]
        );
        assert!(languages::Targets::parse("hi,banana").is_err());
        assert!(languages::Targets::parse("  ").is_err());
    }
}
