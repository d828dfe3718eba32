//! In-process implementation of owner repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewOwner, Owner};
use crate::domain::repositories::{LinkRepository, OwnerRepository};
use crate::error::AppError;

/// In-memory owner store.
///
/// Holds the link repository so that deleting an owner can cascade to its
/// links, mirroring the transactional cascade of the PostgreSQL backend.
pub struct MemoryOwnerRepository {
    owners: DashMap<Uuid, Owner>,
    token_index: DashMap<String, Uuid>,
    links: Arc<dyn LinkRepository>,
}

impl MemoryOwnerRepository {
    pub fn new(links: Arc<dyn LinkRepository>) -> Self {
        Self {
            owners: DashMap::new(),
            token_index: DashMap::new(),
            links,
        }
    }

    fn active(&self, id: Uuid) -> Option<Owner> {
        self.owners
            .get(&id)
            .filter(|owner| !owner.is_deleted())
            .map(|owner| owner.value().clone())
    }
}

#[async_trait]
impl OwnerRepository for MemoryOwnerRepository {
    async fn find_owner(&self, owner_id: Uuid) -> Result<Option<Owner>, AppError> {
        Ok(self.active(owner_id))
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Owner>, AppError> {
        let Some(id) = self.token_index.get(token_hash).map(|id| *id) else {
            return Ok(None);
        };

        Ok(self.active(id))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let Some(id) = self.token_index.get(token_hash).map(|id| *id) else {
            return Ok(());
        };

        if let Some(mut owner) = self.owners.get_mut(&id) {
            owner.last_used_at = Some(Utc::now());
        }

        Ok(())
    }

    async fn create(&self, new_owner: NewOwner) -> Result<Owner, AppError> {
        match self.token_index.entry(new_owner.token_hash.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "owners_token_hash_key" }),
            )),
            Entry::Vacant(slot) => {
                let owner = Owner {
                    id: Uuid::new_v4(),
                    name: new_owner.name,
                    token_hash: new_owner.token_hash,
                    created_at: Utc::now(),
                    last_used_at: None,
                    deleted_at: None,
                };
                self.owners.insert(owner.id, owner.clone());
                slot.insert(owner.id);
                Ok(owner)
            }
        }
    }

    async fn list(&self) -> Result<Vec<Owner>, AppError> {
        let mut owners: Vec<Owner> = self
            .owners
            .iter()
            .map(|owner| owner.value().clone())
            .collect();
        owners.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owners)
    }

    async fn soft_delete(&self, owner_id: Uuid) -> Result<u64, AppError> {
        {
            let mut owner = self
                .owners
                .get_mut(&owner_id)
                .filter(|owner| !owner.is_deleted())
                .ok_or_else(|| {
                    AppError::not_found("Owner not found", json!({ "owner_id": owner_id }))
                })?;
            owner.deleted_at = Some(Utc::now());
        }

        let links = self.links.soft_delete_by_owner(owner_id).await?;

        tracing::info!(%owner_id, links, "Owner deleted with cascade");

        Ok(links)
    }
}
