//! Link creation and owner-scoped link management.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::application::services::code_assigner::UniqueCodeAssigner;
use crate::domain::entities::Link;
use crate::domain::repositories::{LinkRepository, OwnerRepository};
use crate::error::AppError;

/// Summary of a freshly created short link.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLinkInfo {
    pub id: Uuid,
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for ShortLinkInfo {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            short_url: link.short_url,
            short_code: link.short_code,
            original_url: link.original_url,
            created_at: link.created_at,
        }
    }
}

/// Service for creating links and managing the links an owner holds.
///
/// Update and delete are scoped to the caller: a link owned by someone else,
/// an anonymous link and a missing link all look the same (`NotFound`).
pub struct ShortenService<L: LinkRepository + ?Sized, O: OwnerRepository + ?Sized> {
    link_repository: Arc<L>,
    owner_repository: Arc<O>,
    assigner: UniqueCodeAssigner<L>,
}

impl<L: LinkRepository + ?Sized, O: OwnerRepository + ?Sized> ShortenService<L, O> {
    pub fn new(
        link_repository: Arc<L>,
        owner_repository: Arc<O>,
        assigner: UniqueCodeAssigner<L>,
    ) -> Self {
        Self {
            link_repository,
            owner_repository,
            assigner,
        }
    }

    /// Creates a short link, attributed to `owner_id` when given.
    ///
    /// An owner id that no longer resolves to an active owner is dropped and
    /// the link is created anonymously.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `original_url` is empty
    /// - [`AppError::Configuration`] / [`AppError::CodeExhaustion`] from assignment
    pub async fn shorten(
        &self,
        original_url: &str,
        owner_id: Option<Uuid>,
    ) -> Result<ShortLinkInfo, AppError> {
        let original_url = original_url.trim();
        if original_url.is_empty() {
            return Err(AppError::bad_request(
                "originalUrl is required",
                json!({ "field": "originalUrl" }),
            ));
        }

        let owner = match owner_id {
            Some(id) => self.resolve_owner(id).await?,
            None => None,
        };

        let link = self.assigner.assign(original_url, owner).await?;

        tracing::info!(
            link_id = %link.id,
            short_code = %link.short_code,
            owner_id = ?link.owner_id,
            "Short link created"
        );

        Ok(link.into())
    }

    /// Returns the active links owned by `owner_id`, newest first.
    pub async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        self.link_repository.find_active_by_owner(owner_id).await
    }

    /// Changes the destination of a link owned by `caller`.
    ///
    /// `short_code`, `short_url`, `id` and `created_at` are never touched.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `new_url` is empty
    /// - [`AppError::NotFound`] if no active link with `id` belongs to `caller`
    pub async fn update_destination(
        &self,
        caller: Uuid,
        id: Uuid,
        new_url: &str,
    ) -> Result<Link, AppError> {
        let new_url = new_url.trim();
        if new_url.is_empty() {
            return Err(AppError::bad_request(
                "url is required",
                json!({ "field": "url" }),
            ));
        }

        self.find_owned(caller, id).await?;

        let link = self.link_repository.update_target(id, new_url).await?;

        tracing::info!(link_id = %id, "Short link destination updated");

        Ok(link)
    }

    /// Soft-deletes a link owned by `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active link with `id` belongs to
    /// `caller`, including when it was already deleted.
    pub async fn remove(&self, caller: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.find_owned(caller, id).await?;

        let deleted = self.link_repository.soft_delete(id).await?;

        tracing::info!(link_id = %id, "Short link deleted");

        Ok(deleted)
    }

    async fn find_owned(&self, caller: Uuid, id: Uuid) -> Result<Link, AppError> {
        self.link_repository
            .find_active_by_id(id)
            .await?
            .filter(|link| link.is_owned_by(caller))
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    async fn resolve_owner(&self, owner_id: Uuid) -> Result<Option<Uuid>, AppError> {
        match self.owner_repository.find_owner(owner_id).await? {
            Some(owner) => Ok(Some(owner.id)),
            None => {
                tracing::warn!(%owner_id, "Owner not found, creating anonymous link");
                Ok(None)
            }
        }
    }
}
