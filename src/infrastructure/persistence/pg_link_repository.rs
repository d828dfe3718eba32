//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreStats};
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, original_url, short_code, short_url, clicks, created_at, owner_id, deleted_at";

#[derive(FromRow)]
struct LinkRow {
    id: Uuid,
    original_url: String,
    short_code: String,
    short_url: String,
    clicks: i64,
    created_at: DateTime<Utc>,
    owner_id: Option<Uuid>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            original_url: r.original_url,
            short_code: r.short_code,
            short_url: r.short_url,
            clicks: r.clicks,
            created_at: r.created_at,
            owner_id: r.owner_id,
            deleted_at: r.deleted_at,
        }
    }
}

#[derive(FromRow)]
struct StatsRow {
    total_links: i64,
    active_links: i64,
    deleted_links: i64,
    total_clicks: i64,
}

/// PostgreSQL repository for link storage, lookups and click counting.
///
/// Uniqueness of active codes is enforced by the partial unique index
/// `links_active_short_code_key`; click increments are single-statement
/// updates, so concurrent redirects never lose a count.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn link_not_found(details: serde_json::Value) -> AppError {
    AppError::not_found("Short link not found", details)
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (id, original_url, short_code, short_url, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(new_link.id)
        .bind(&new_link.original_url)
        .bind(&new_link.short_code)
        .bind(&new_link.short_url)
        .bind(new_link.owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1 AND deleted_at IS NULL"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE owner_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn update_target(&self, id: Uuid, new_url: &str) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links
            SET original_url = $2
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from)
            .ok_or_else(|| link_not_found(json!({ "id": id })))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE links SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(link_not_found(json!({ "id": id })));
        }

        Ok(true)
    }

    async fn soft_delete_by_owner(&self, owner_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE links SET deleted_at = NOW() WHERE owner_id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn increment_and_fetch(&self, code: &str) -> Result<String, AppError> {
        let url = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE links
            SET clicks = clicks + 1
            WHERE short_code = $1 AND deleted_at IS NULL
            RETURNING original_url
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        url.ok_or_else(|| link_not_found(json!({ "code": code })))
    }

    async fn stats(&self) -> Result<StoreStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COUNT(*)::BIGINT                                      AS total_links,
                COUNT(*) FILTER (WHERE deleted_at IS NULL)::BIGINT    AS active_links,
                COUNT(*) FILTER (WHERE deleted_at IS NOT NULL)::BIGINT AS deleted_links,
                COALESCE(SUM(clicks), 0)::BIGINT                      AS total_clicks
            FROM links
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(StoreStats {
            total_links: row.total_links,
            active_links: row.active_links,
            deleted_links: row.deleted_links,
            total_clicks: row.total_clicks,
        })
    }

    async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").execute(self.pool.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        }
    }
}
