#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use shrtn::application::services::{AuthService, ClickRecorder, LinkService};
use shrtn::domain::click_worker::run_click_worker;
use shrtn::domain::rate_limiter::{RateLimiterConfig, TokenBucketLimiter};
use shrtn::infrastructure::persistence::{InMemoryClickRepository, InMemoryLinkRepository};
use shrtn::routes::app_router;
use shrtn::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

pub const TEST_API_KEY: &str = "test-api-key-0123456789";
pub const ALLOWED_ORIGIN: &str = "https://app.example.com";

pub struct TestOptions {
    pub api_key: Option<String>,
    pub rate_limit: RateLimiterConfig,
    /// When false the click queue has no consumer and is closed immediately.
    pub click_worker: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            rate_limit: RateLimiterConfig {
                requests_per_minute: 6_000,
                burst_size: 1_000,
                cleanup_interval: Duration::from_secs(300),
            },
            click_worker: true,
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<InMemoryLinkRepository>,
    pub clicks: Arc<InMemoryClickRepository>,
    pub api_key: Option<String>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(TestOptions::default())
}

/// Builds the full router over in-memory stores.
///
/// Must be called inside a Tokio runtime.
pub fn spawn_app_with(options: TestOptions) -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::new());
    let clicks = Arc::new(InMemoryClickRepository::new());

    let (tx, rx) = mpsc::channel(1_000);
    if options.click_worker {
        tokio::spawn(run_click_worker(rx, links.clone(), clicks.clone(), 4));
    } else {
        drop(rx);
    }

    let link_service = Arc::new(LinkService::new(links.clone(), Duration::from_secs(5)));
    let state = AppState::new(
        link_service,
        ClickRecorder::new(tx),
        AuthService::new(options.api_key.clone()),
        TokenBucketLimiter::new(options.rate_limit),
        None,
    );

    let app = app_router(state, &[ALLOWED_ORIGIN.to_string()]).layer(MockConnectInfoLayer);
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        links,
        clicks,
        api_key: options.api_key,
    }
}

impl TestApp {
    /// Creates a link through the API and returns its JSON body.
    pub async fn create_link(&self, url: &str, custom_code: Option<&str>) -> serde_json::Value {
        let mut body = serde_json::json!({ "originalUrl": url });
        if let Some(code) = custom_code {
            body["customCode"] = code.into();
        }

        let mut request = self.server.post("/api/shorten").json(&body);
        if let Some(key) = &self.api_key {
            request = request.add_header("X-API-Key", key.clone());
        }

        let response = request.await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<serde_json::Value>()
    }
}

/// Polls `condition` until it holds or one second passes.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

pub const PEER_ADDR: &str = "198.51.100.23:40000";

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
