mod common;

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use linkcut::domain::entities::{NewLink, NewOwner};
use linkcut::domain::repositories::{LinkRepository, OwnerRepository};
use linkcut::error::AppError;
use linkcut::infrastructure::persistence::{PgLinkRepository, PgOwnerRepository};

fn new_owner(hash: &str) -> NewOwner {
    NewOwner {
        name: "ci".to_string(),
        token_hash: hash.to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_create_and_lookup(pool: PgPool) {
    let repo = PgOwnerRepository::new(Arc::new(pool));

    let owner = repo.create(new_owner("hash-1")).await.unwrap();

    let by_hash = repo.find_by_token_hash("hash-1").await.unwrap().unwrap();
    assert_eq!(by_hash.id, owner.id);

    let by_id = repo.find_owner(owner.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "ci");

    assert!(repo.find_owner(Uuid::new_v4()).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_duplicate_hash_conflicts(pool: PgPool) {
    let repo = PgOwnerRepository::new(Arc::new(pool));
    repo.create(new_owner("hash-1")).await.unwrap();

    let err = repo.create(new_owner("hash-1")).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgOwnerRepository::new(Arc::new(pool));
    let owner = repo.create(new_owner("hash-1")).await.unwrap();
    assert!(owner.last_used_at.is_none());

    repo.update_last_used("hash-1").await.unwrap();

    let owner = repo.find_owner(owner.id).await.unwrap().unwrap();
    assert!(owner.last_used_at.is_some());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_soft_delete_cascades(pool: PgPool) {
    let pool = Arc::new(pool);
    let owners = PgOwnerRepository::new(pool.clone());
    let links = PgLinkRepository::new(pool);

    let owner = owners.create(new_owner("hash-1")).await.unwrap();
    for code in ["aaaaaa", "bbbbbb"] {
        links
            .create(NewLink::new(
                "https://example.com".into(),
                code.into(),
                format!("{}/{code}", common::BASE_URL),
                Some(owner.id),
            ))
            .await
            .unwrap();
    }
    links
        .create(NewLink::new(
            "https://example.com".into(),
            "cccccc".into(),
            format!("{}/cccccc", common::BASE_URL),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(owners.soft_delete(owner.id).await.unwrap(), 2);

    assert!(owners.find_owner(owner.id).await.unwrap().is_none());
    assert!(owners.find_by_token_hash("hash-1").await.unwrap().is_none());
    assert!(links.find_active_by_owner(owner.id).await.unwrap().is_empty());
    assert!(links.find_active_by_code("cccccc").await.unwrap().is_some());

    let listed = owners.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].is_deleted());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_soft_delete_unknown_not_found(pool: PgPool) {
    let repo = PgOwnerRepository::new(Arc::new(pool));

    let err = repo.soft_delete(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound { .. }));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_http_flow_over_postgres(pool: PgPool) {
    let app = common::pg_app(pool);
    let (_, token) = app.create_owner("ci").await;
    let server = app.server();

    let created: serde_json::Value = server
        .post("/urls")
        .add_header("Authorization", common::bearer(&token))
        .json(&serde_json::json!({ "originalUrl": "https://example.com" }))
        .await
        .json();
    let code = created["shortCode"].as_str().unwrap();

    let response = server.get(&format!("/{code}")).await;
    assert_eq!(response.status_code(), axum::http::StatusCode::FOUND);

    let links: Vec<serde_json::Value> = server
        .get("/urls")
        .add_header("Authorization", common::bearer(&token))
        .await
        .json();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["clicks"], 1);
}
