//! Owner entity: an API client that links can be attributed to.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered owner authenticated by an API bearer token.
///
/// Only the HMAC hash of the token is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Owner {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Input data for registering a new owner.
#[derive(Debug, Clone)]
pub struct NewOwner {
    pub name: String,
    pub token_hash: String,
}
