//! PostgreSQL implementation of owner repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewOwner, Owner};
use crate::domain::repositories::OwnerRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct OwnerRow {
    id: Uuid,
    name: String,
    token_hash: String,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<OwnerRow> for Owner {
    fn from(r: OwnerRow) -> Self {
        Owner {
            id: r.id,
            name: r.name,
            token_hash: r.token_hash,
            created_at: r.created_at,
            last_used_at: r.last_used_at,
            deleted_at: r.deleted_at,
        }
    }
}

/// PostgreSQL repository for owners and their token hashes.
///
/// Raw tokens are never persisted. Deleting an owner cascades a soft delete
/// to its links inside one transaction.
pub struct PgOwnerRepository {
    pool: Arc<PgPool>,
}

impl PgOwnerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerRepository for PgOwnerRepository {
    async fn find_owner(&self, owner_id: Uuid) -> Result<Option<Owner>, AppError> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r#"
            SELECT id, name, token_hash, created_at, last_used_at, deleted_at
            FROM owners
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(owner_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Owner::from))
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Owner>, AppError> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r#"
            SELECT id, name, token_hash, created_at, last_used_at, deleted_at
            FROM owners
            WHERE token_hash = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Owner::from))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE owners
            SET last_used_at = NOW()
            WHERE token_hash = $1
              AND deleted_at IS NULL
            "#,
        )
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn create(&self, new_owner: NewOwner) -> Result<Owner, AppError> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r#"
            INSERT INTO owners (id, name, token_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, token_hash, created_at, last_used_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_owner.name)
        .bind(&new_owner.token_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Owner>, AppError> {
        let rows = sqlx::query_as::<_, OwnerRow>(
            r#"
            SELECT id, name, token_hash, created_at, last_used_at, deleted_at
            FROM owners
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Owner::from).collect())
    }

    async fn soft_delete(&self, owner_id: Uuid) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let owner = sqlx::query(
            "UPDATE owners SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        if owner.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Owner not found",
                json!({ "owner_id": owner_id }),
            ));
        }

        let links = sqlx::query(
            "UPDATE links SET deleted_at = NOW() WHERE owner_id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%owner_id, links = links.rows_affected(), "Owner deleted with cascade");

        Ok(links.rows_affected())
    }
}
