//! Repository trait for short link persistence.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Aggregate counters over the whole link table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total_links: i64,
    pub active_links: i64,
    pub deleted_links: i64,
    pub total_clicks: i64,
}

/// Persistence interface for short links.
///
/// Every lookup named `*_active_*` filters out soft-deleted rows, and so do
/// the mutating operations: a deleted link can never be found, updated,
/// deleted again or counted.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link with `clicks = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an active link already uses the
    /// short code. This is the authoritative uniqueness check.
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds the active link with the given short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if unknown or deleted
    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds the active link with the given id.
    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError>;

    /// Lists the active links attributed to `owner_id`, newest first.
    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError>;

    /// Replaces the destination URL of an active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is absent or deleted.
    async fn update_target(&self, id: Uuid, new_url: &str) -> Result<Link, AppError>;

    /// Soft-deletes an active link by setting `deleted_at = now()`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is absent or already deleted.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Soft-deletes every active link attributed to `owner_id`.
    ///
    /// Returns the number of links that were deleted.
    async fn soft_delete_by_owner(&self, owner_id: Uuid) -> Result<u64, AppError>;

    /// Atomically increments `clicks` of the active link with `code` and
    /// returns its destination URL.
    ///
    /// Concurrent calls on the same code never lose an increment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or deleted; no
    /// counter is touched in that case.
    async fn increment_and_fetch(&self, code: &str) -> Result<String, AppError>;

    /// Returns link and click totals.
    async fn stats(&self) -> Result<StoreStats, AppError>;

    /// Checks that the backing store is reachable.
    async fn health_check(&self) -> bool;
}
