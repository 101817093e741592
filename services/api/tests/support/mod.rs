//! Shared test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use common::database::{DatabaseConfig, init_pool, run_migrations};
use health_api::{
    AppState,
    assistant::{
        AssistantGateway, AssistantProvider, ProviderError, RunOutcome, RunStatus, ThreadMessage,
    },
    routes::create_router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const ASSISTANT_REPLY: &str =
    "In general, dizziness on standing can have many causes. Please talk to a doctor.";

/// Provider fake that counts calls and always completes with the same reply
#[derive(Default)]
pub struct CountingProvider {
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssistantProvider for CountingProvider {
    async fn run(&self, _prompt: &str) -> Result<RunOutcome, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let message: ThreadMessage = serde_json::from_value(serde_json::json!({
            "role": "assistant",
            "content": [{"type": "text", "text": {"value": ASSISTANT_REPLY}}]
        }))
        .expect("valid thread message");

        Ok(RunOutcome {
            status: RunStatus::Completed,
            messages: vec![message],
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<CountingProvider>,
    pub pool: SqlitePool,
    _dir: TempDir,
}

/// Create a fresh database file with the schema applied
pub async fn create_test_database() -> (SqlitePool, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}", dir.path().join("health.db").display()),
        max_connections: 2,
        connection_timeout: 5,
    };

    let pool = init_pool(&config).await.expect("database pool");
    run_migrations(&pool).await.expect("migrations");
    (pool, dir)
}

/// App wired to a counting fake provider
pub async fn spawn_app() -> TestApp {
    let (pool, dir) = create_test_database().await;
    let provider = Arc::new(CountingProvider::default());
    let gateway = AssistantGateway::new(provider.clone());

    TestApp {
        router: create_router(AppState::new(pool.clone(), gateway)),
        provider,
        pool,
        _dir: dir,
    }
}

/// App wired to an explicit gateway
pub async fn spawn_app_with_gateway(gateway: AssistantGateway) -> TestApp {
    let (pool, dir) = create_test_database().await;

    TestApp {
        router: create_router(AppState::new(pool.clone(), gateway)),
        provider: Arc::new(CountingProvider::default()),
        pool,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn post_json(&self, uri: &str, body: Value) -> (u16, Value) {
        let request = Request::builder()
            .uri(uri)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        json_response(self.router.clone().oneshot(request).await.unwrap()).await
    }

    pub async fn get_json(&self, uri: &str) -> (u16, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        json_response(self.router.clone().oneshot(request).await.unwrap()).await
    }

    pub async fn get_text(&self, uri: &str) -> (u16, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Sign up and return the issued user id
    pub async fn signup(&self, username: &str, password: &str) -> i64 {
        let (status, body) = self
            .post_json(
                "/signup",
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], true, "signup failed: {}", body);
        body["user_id"].as_i64().expect("user_id")
    }
}

async fn json_response(response: Response<Body>) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Test user credentials
pub mod fixtures {
    pub const TEST_USERNAME: &str = "testuser";
    pub const TEST_PASSWORD: &str = "TestPassword123!";
}
