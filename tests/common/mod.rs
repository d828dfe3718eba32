#![allow(dead_code)]

use axum_test::TestServer;
use sqlx::PgPool;
use std::sync::Arc;

use linkcut::application::services::auth_service::{generate_token, hash_token};
use linkcut::domain::entities::{NewOwner, Owner};
use linkcut::domain::repositories::{LinkRepository, OwnerRepository};
use linkcut::infrastructure::memory::{MemoryLinkRepository, MemoryOwnerRepository};
use linkcut::infrastructure::persistence::{PgLinkRepository, PgOwnerRepository};
use linkcut::routes::router;
use linkcut::state::AppState;
use linkcut::utils::code_generator::CodeGenerator;

pub const BASE_URL: &str = "https://s.example.com";
pub const SIGNING_SECRET: &str = "test-signing-secret";

/// State over in-memory stores, with direct handles to both stores.
pub struct TestApp {
    pub state: AppState,
    pub links: Arc<dyn LinkRepository>,
    pub owners: Arc<dyn OwnerRepository>,
}

pub fn memory_app() -> TestApp {
    memory_app_with(CodeGenerator::os(), Some(BASE_URL))
}

pub fn memory_app_with(generator: CodeGenerator, base_url: Option<&str>) -> TestApp {
    let links: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());
    let owners: Arc<dyn OwnerRepository> = Arc::new(MemoryOwnerRepository::new(links.clone()));

    app_over(links, owners, generator, base_url)
}

pub fn pg_app(pool: PgPool) -> TestApp {
    let pool = Arc::new(pool);
    let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let owners: Arc<dyn OwnerRepository> = Arc::new(PgOwnerRepository::new(pool));

    app_over(links, owners, CodeGenerator::os(), Some(BASE_URL))
}

fn app_over(
    links: Arc<dyn LinkRepository>,
    owners: Arc<dyn OwnerRepository>,
    generator: CodeGenerator,
    base_url: Option<&str>,
) -> TestApp {
    let state = AppState::new(
        links.clone(),
        owners.clone(),
        generator,
        base_url.map(str::to_string),
        SIGNING_SECRET.to_string(),
    );

    TestApp {
        state,
        links,
        owners,
    }
}

impl TestApp {
    pub fn server(&self) -> TestServer {
        TestServer::new(router(self.state.clone())).unwrap()
    }

    /// Creates an owner and returns it with its raw token.
    pub async fn create_owner(&self, name: &str) -> (Owner, String) {
        let token = generate_token();
        let owner = self
            .owners
            .create(NewOwner {
                name: name.to_string(),
                token_hash: hash_token(SIGNING_SECRET, &token),
            })
            .await
            .unwrap();

        (owner, token)
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
