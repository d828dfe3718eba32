//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A shortened URL with its visit counter and lifecycle metadata.
///
/// `short_code` and `short_url` are fixed at creation; only `original_url`
/// changes afterwards. A link with `deleted_at` set is kept in storage but
/// excluded from every active-record query.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: Uuid,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true if the link is active and attributed to `owner_id`.
    pub fn is_owned_by(&self, owner_id: Uuid) -> bool {
        !self.is_deleted() && self.owner_id == Some(owner_id)
    }
}

/// Input data for persisting a new link.
///
/// The id is assigned here so that every store hands out the same kind of
/// identifier; `clicks` and `created_at` are initialised by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub id: Uuid,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub owner_id: Option<Uuid>,
}

impl NewLink {
    pub fn new(
        original_url: String,
        short_code: String,
        short_url: String,
        owner_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_url,
            short_code,
            short_url,
            owner_id,
        }
    }

    /// Materialises the link as a store would right after insertion.
    pub fn into_link(self, created_at: DateTime<Utc>) -> Link {
        Link {
            id: self.id,
            original_url: self.original_url,
            short_code: self.short_code,
            short_url: self.short_url,
            clicks: 0,
            created_at,
            owner_id: self.owner_id,
            deleted_at: None,
        }
    }
}
