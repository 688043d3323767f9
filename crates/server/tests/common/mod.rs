//! Common test utilities for API testing with mocks.
//!
//! Provides a test fixture that builds the in-process router with mock
//! remote services injected, so the full HTTP surface can be exercised
//! without external infrastructure.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use magnetcloud_core::{
    testing::{MockCloudClient, MockSearcher},
    CloudClient, Config, LimitsConfig, MonitorConfig, Searcher, ServerConfig,
};

/// Fixture settings that individual tests tweak.
pub struct TestConfig {
    pub with_searcher: bool,
    pub with_cloud: bool,
    pub poll_interval_ms: u64,
    pub download_cooldown_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            with_searcher: true,
            with_cloud: true,
            poll_interval_ms: 20,
            download_cooldown_secs: 30,
        }
    }
}

/// Test fixture owning the router and the mock remote services.
pub struct TestFixture {
    pub router: Router,
    pub searcher: Arc<MockSearcher>,
    pub cloud: Arc<MockCloudClient>,
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let searcher = Arc::new(MockSearcher::new());
        let cloud = Arc::new(MockCloudClient::new());

        let config = Config {
            server: ServerConfig {
                host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            static_dir: PathBuf::from("dist"),
            search: None,
            cloud: None,
            limits: LimitsConfig {
                download_cooldown_secs: test_config.download_cooldown_secs,
            },
            monitor: MonitorConfig {
                poll_interval_ms: test_config.poll_interval_ms,
            },
        };

        let state = Arc::new(magnetcloud_server::state::AppState::new(
            config,
            test_config
                .with_searcher
                .then(|| Arc::clone(&searcher) as Arc<dyn Searcher>),
            test_config
                .with_cloud
                .then(|| Arc::clone(&cloud) as Arc<dyn CloudClient>),
        ));

        let router = magnetcloud_server::api::create_router(state);

        Self {
            router,
            searcher,
            cloud,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(body) => {
                request_builder = request_builder.header("Content-Type", "application/json");
                request_builder
                    .body(Body::from(body.to_string()))
                    .unwrap()
            }
            None => request_builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
