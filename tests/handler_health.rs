mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use linkcut::domain::entities::{Link, NewLink};
use linkcut::domain::repositories::{LinkRepository, OwnerRepository, StoreStats};
use linkcut::error::AppError;
use linkcut::infrastructure::memory::MemoryOwnerRepository;
use linkcut::routes::router;
use linkcut::state::AppState;
use linkcut::utils::code_generator::CodeGenerator;

/// A store whose backend is unreachable.
struct UnavailableStore;

fn unavailable() -> AppError {
    AppError::internal("Database error", json!({}))
}

#[async_trait]
impl LinkRepository for UnavailableStore {
    async fn create(&self, _: NewLink) -> Result<Link, AppError> {
        Err(unavailable())
    }
    async fn find_active_by_code(&self, _: &str) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }
    async fn find_active_by_id(&self, _: Uuid) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }
    async fn find_active_by_owner(&self, _: Uuid) -> Result<Vec<Link>, AppError> {
        Err(unavailable())
    }
    async fn update_target(&self, _: Uuid, _: &str) -> Result<Link, AppError> {
        Err(unavailable())
    }
    async fn soft_delete(&self, _: Uuid) -> Result<bool, AppError> {
        Err(unavailable())
    }
    async fn soft_delete_by_owner(&self, _: Uuid) -> Result<u64, AppError> {
        Err(unavailable())
    }
    async fn increment_and_fetch(&self, _: &str) -> Result<String, AppError> {
        Err(unavailable())
    }
    async fn stats(&self) -> Result<StoreStats, AppError> {
        Err(unavailable())
    }
    async fn health_check(&self) -> bool {
        false
    }
}

fn unavailable_server() -> TestServer {
    let links: Arc<dyn LinkRepository> = Arc::new(UnavailableStore);
    let owners: Arc<dyn OwnerRepository> = Arc::new(MemoryOwnerRepository::new(links.clone()));
    let state = AppState::new(
        links,
        owners,
        CodeGenerator::os(),
        Some(common::BASE_URL.to_string()),
        common::SIGNING_SECRET.to_string(),
    );
    TestServer::new(router(state)).unwrap()
}

#[tokio::test]
async fn test_health_ok() {
    let server = common::memory_app().server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_degraded() {
    let response = unavailable_server().get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["storage"]["status"], "error");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let server = unavailable_server();

    let redirect = server.get("/Ab3xYz").await;
    redirect.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = redirect.json();
    assert_eq!(body["error"]["code"], "internal_error");

    server
        .post("/urls")
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
