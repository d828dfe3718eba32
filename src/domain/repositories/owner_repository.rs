//! Repository trait for link owners (the user management collaborator).

use crate::domain::entities::{NewOwner, Owner};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for owners and their API tokens.
///
/// Tokens are stored as HMAC-SHA256 hashes; raw tokens never reach this layer.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgOwnerRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryOwnerRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Looks up an active owner by id.
    ///
    /// Used only to decide attribution of new links; returns `Ok(None)` for
    /// unknown or deleted owners.
    async fn find_owner(&self, owner_id: Uuid) -> Result<Option<Owner>, AppError>;

    /// Looks up an active owner by token hash.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Owner>, AppError>;

    /// Updates the `last_used_at` timestamp for the owner of a token.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Registers a new owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the token hash is already registered.
    async fn create(&self, new_owner: NewOwner) -> Result<Owner, AppError>;

    /// Lists all owners, including deleted ones.
    async fn list(&self) -> Result<Vec<Owner>, AppError>;

    /// Soft-deletes an owner and, in the same step, every active link it owns.
    ///
    /// Returns the number of links that were soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner is absent or already deleted.
    async fn soft_delete(&self, owner_id: Uuid) -> Result<u64, AppError>;
}
