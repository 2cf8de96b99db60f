// 集成测试公共模块
//
// 提供翻译桩后端、缓存连接器桩、测试应用组装和 HTTP 请求辅助

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use polyfaq::cache::{
    CacheAsideLayer, CacheBackend, CacheConnector, CacheError, CacheResult, MemoryConnector,
};
use polyfaq::config::{CacheConfig, LanguageConfig};
use polyfaq::service::FaqService;
use polyfaq::storage::{FaqStore, MemoryFaqStore};
use polyfaq::translation::{
    RateLimitedTranslator, TranslateBackend, TranslationError, TranslationResult,
};
use polyfaq::web::{create_router, AppState};

/// 把输入转成大写的翻译桩
pub struct UppercaseBackend;

#[async_trait]
impl TranslateBackend for UppercaseBackend {
    async fn translate_text(&self, text: &str, _target_lang: &str) -> TranslationResult<String> {
        Ok(text.to_uppercase())
    }
}

/// 永远失败的翻译桩
pub struct FailingBackend;

#[async_trait]
impl TranslateBackend for FailingBackend {
    async fn translate_text(&self, _text: &str, _target_lang: &str) -> TranslationResult<String> {
        Err(TranslationError::Network("connection refused".to_string()))
    }
}

/// 记录每次调用起始时刻的翻译桩
pub struct RecordingBackend {
    starts: Arc<Mutex<Vec<tokio::time::Instant>>>,
}

impl RecordingBackend {
    pub fn new() -> (Self, Arc<Mutex<Vec<tokio::time::Instant>>>) {
        let starts = Arc::new(Mutex::new(Vec::new()));
        let backend = Self {
            starts: Arc::clone(&starts),
        };
        (backend, starts)
    }
}

#[async_trait]
impl TranslateBackend for RecordingBackend {
    async fn translate_text(&self, text: &str, target_lang: &str) -> TranslationResult<String> {
        self.starts.lock().unwrap().push(tokio::time::Instant::now());
        Ok(format!("{}:{}", target_lang, text))
    }
}

/// 永远连接失败的缓存连接器，记录尝试次数
pub struct FailingConnector {
    pub attempts: AtomicUsize,
}

impl FailingConnector {
    pub fn new() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CacheConnector for FailingConnector {
    async fn connect(&self) -> CacheResult<Arc<dyn CacheBackend>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Backend("connection refused".to_string()))
    }
}

/// 组装好的测试应用
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryFaqStore>,
    pub service: Arc<FaqService>,
}

/// 测试应用构建器：内存存储 + 内存缓存 + 大写翻译桩，零间隔派发
pub struct TestAppBuilder {
    backend: Arc<dyn TranslateBackend>,
    connector: Arc<dyn CacheConnector>,
    min_spacing: Duration,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            backend: Arc::new(UppercaseBackend),
            connector: Arc::new(MemoryConnector::new()),
            min_spacing: Duration::ZERO,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn TranslateBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_connector(mut self, connector: Arc<dyn CacheConnector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn build(self) -> TestApp {
        let store = Arc::new(MemoryFaqStore::new());
        let cache_config = CacheConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            enabled: true,
            ttl: Duration::from_secs(3600),
            key_prefix: "test:".to_string(),
            connect_retries: 0,
            retry_delay: Duration::ZERO,
        };
        let cache = Arc::new(CacheAsideLayer::new(self.connector, &cache_config));
        let translator = RateLimitedTranslator::spawn(self.backend, self.min_spacing);
        let languages = LanguageConfig::new("en", vec!["hi".to_string(), "bn".to_string()]);

        let service = Arc::new(FaqService::new(
            Arc::clone(&store) as Arc<dyn FaqStore>,
            cache,
            translator,
            languages,
        ));
        let router = create_router(Arc::new(AppState {
            service: Arc::clone(&service),
        }));

        TestApp {
            router,
            store,
            service,
        }
    }
}

/// 默认配置的测试应用
pub fn test_app() -> TestApp {
    TestAppBuilder::new().build()
}

/// 构造带 JSON 体的请求
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// 构造 GET 请求
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// 构造无请求体的请求（DELETE、POST 触发类接口）
pub fn bodyless_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// 读取响应体原始字节
pub async fn response_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// 读取响应体为 JSON
pub async fn response_json(response: Response) -> Value {
    let bytes = response_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// 通过 API 创建一条 FAQ，返回其 id
pub async fn create_faq(app: &TestApp, question: &str, answer: &str) -> String {
    use tower::ServiceExt;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/faqs",
            serde_json::json!({ "question": question, "answer": answer }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    body["id"].as_str().unwrap().to_string()
}
