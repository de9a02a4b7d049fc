#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use tracklytic_api::app::{router, AppState};
use tracklytic_api::auth::{generate_jwt, Claims};
use tracklytic_api::config::AppConfig;
use tracklytic_api::database::{MemoryStore, Store};
use tracklytic_api::period::FixedClock;
use tracklytic_api::types::OwnerId;

pub const OWNER_A: &str = "owner-a";
pub const OWNER_B: &str = "owner-b";

/// The full router over an in-memory store, with a clock that only moves when told to
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub config: AppConfig,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `status` field of the envelope
    pub fn envelope_status(&self) -> u64 {
        self.body["status"].as_u64().unwrap_or_default()
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }
}

pub fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        Self::at(instant(2025, 3, 15))
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(now));
        let config = AppConfig::development();

        let shared: Arc<dyn Store> = store.clone();
        let state = AppState::new(shared, clock.clone(), config.clone());

        Self {
            router: router(state),
            store,
            clock,
            config,
        }
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        self.clock.set(now);
    }

    pub fn token(&self, owner: &str) -> String {
        let claims = Claims::new(&OwnerId::from(owner), format!("{owner}@example.com"), None, 1);
        generate_jwt(&claims, &self.config.security.jwt_secret).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
        };
        Ok(TestResponse { status, body })
    }

    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        owner: Option<&str>,
        body: impl Into<Body>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(owner) = owner {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(owner)));
        }
        self.send(builder.body(body.into())?).await
    }

    pub async fn request(&self, method: Method, uri: &str, owner: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
        let body = match body {
            Some(value) => Body::from(serde_json::to_vec(&value)?),
            None => Body::empty(),
        };
        self.request_raw(method, uri, owner, body).await
    }

    pub async fn get(&self, uri: &str, owner: &str) -> Result<TestResponse> {
        self.request(Method::GET, uri, Some(owner), None).await
    }

    pub async fn post(&self, uri: &str, owner: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, Some(owner), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, owner: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, Some(owner), Some(body)).await
    }

    /// Creates a record through the API and returns its id
    pub async fn create(&self, uri: &str, owner: &str, body: Value) -> Result<String> {
        let res = self.post(uri, owner, body).await?;
        anyhow::ensure!(res.envelope_status() == 201, "create failed: {}", res.body);
        res.data()["id"]
            .as_str()
            .map(str::to_string)
            .context("created record has no id")
    }
}

/// The release binary running against the in-memory store, for smoke tests over real HTTP
pub struct TestServer {
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_tracklytic-api"))
            .env("TRACKLYTIC_API_PORT", port.to_string())
            .env("TRACKLYTIC_STORE", "memory")
            .env("APP_ENV", "development")
            .env("SECURITY_JWT_SECRET", AppConfig::development().security.jwt_secret)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
