//! DTOs for owner link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::Link;

/// JSON representation of a stored link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: Uuid,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            short_url: link.short_url,
            clicks: link.clicks,
            created_at: link.created_at,
            owner_id: link.owner_id,
            deleted_at: link.deleted_at,
        }
    }
}

/// Request body for `PATCH /urls/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// New destination URL for this link.
    #[serde(default)]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Body returned by `DELETE /urls/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}
