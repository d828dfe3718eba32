//! In-process implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreStats};
use crate::error::AppError;

/// In-memory link store backed by two [`DashMap`]s.
///
/// `links` holds every record, deleted ones included. `active_codes` maps each
/// active short code to its link id and plays the role of the partial unique
/// index: claiming a code is a single `entry` call on that map.
///
/// Lock order is always `active_codes` before `links`; no code path holds a
/// `links` guard while touching `active_codes`.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    links: DashMap<Uuid, Link>,
    active_codes: DashMap<String, Uuid>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn active_id(&self, code: &str) -> Option<Uuid> {
        self.active_codes.get(code).map(|id| *id)
    }
}

fn link_not_found(details: serde_json::Value) -> AppError {
    AppError::not_found("Short link not found", details)
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.active_codes.entry(new_link.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_active_short_code_key" }),
            )),
            Entry::Vacant(slot) => {
                let link = new_link.into_link(Utc::now());
                self.links.insert(link.id, link.clone());
                slot.insert(link.id);
                Ok(link)
            }
        }
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let Some(id) = self.active_id(code) else {
            return Ok(None);
        };

        Ok(self
            .links
            .get(&id)
            .filter(|link| !link.is_deleted())
            .map(|link| link.value().clone()))
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .get(&id)
            .filter(|link| !link.is_deleted())
            .map(|link| link.value().clone()))
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .links
            .iter()
            .filter(|link| link.is_owned_by(owner_id))
            .map(|link| link.value().clone())
            .collect();

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links)
    }

    async fn update_target(&self, id: Uuid, new_url: &str) -> Result<Link, AppError> {
        let mut link = self
            .links
            .get_mut(&id)
            .filter(|link| !link.is_deleted())
            .ok_or_else(|| link_not_found(json!({ "id": id })))?;

        link.original_url = new_url.to_string();

        Ok(link.value().clone())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let code = {
            let mut link = self
                .links
                .get_mut(&id)
                .filter(|link| !link.is_deleted())
                .ok_or_else(|| link_not_found(json!({ "id": id })))?;

            link.deleted_at = Some(Utc::now());
            link.short_code.clone()
        };

        self.active_codes.remove_if(&code, |_, active| *active == id);

        Ok(true)
    }

    async fn soft_delete_by_owner(&self, owner_id: Uuid) -> Result<u64, AppError> {
        let ids: Vec<Uuid> = self
            .links
            .iter()
            .filter(|link| link.is_owned_by(owner_id))
            .map(|link| link.id)
            .collect();

        let mut deleted = 0;
        for id in ids {
            match self.soft_delete(id).await {
                Ok(_) => deleted += 1,
                // Deleted concurrently by someone else.
                Err(AppError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(deleted)
    }

    async fn increment_and_fetch(&self, code: &str) -> Result<String, AppError> {
        let not_found = || link_not_found(json!({ "code": code }));

        let id = self.active_id(code).ok_or_else(not_found)?;

        let mut link = self
            .links
            .get_mut(&id)
            .filter(|link| !link.is_deleted())
            .ok_or_else(not_found)?;

        link.clicks += 1;

        Ok(link.original_url.clone())
    }

    async fn stats(&self) -> Result<StoreStats, AppError> {
        let mut stats = StoreStats::default();

        for link in self.links.iter() {
            stats.total_links += 1;
            stats.total_clicks += link.clicks;
            if link.is_deleted() {
                stats.deleted_links += 1;
            } else {
                stats.active_links += 1;
            }
        }

        Ok(stats)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_link(code: &str, owner_id: Option<Uuid>) -> NewLink {
        NewLink::new(
            "https://example.com".to_string(),
            code.to_string(),
            format!("https://s.example.com/{code}"),
            owner_id,
        )
    }

    #[tokio::test]
    async fn create_and_find() {
        let repo = MemoryLinkRepository::new();

        let link = repo.create(new_link("abc123", None)).await.unwrap();

        let found = repo.find_active_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found, link);
        assert_eq!(found.clicks, 0);
    }

    #[tokio::test]
    async fn create_conflict_on_active_code() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("abc123", None)).await.unwrap();

        let err = repo.create(new_link("abc123", None)).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn deleted_code_can_be_reused() {
        let repo = MemoryLinkRepository::new();
        let old = repo.create(new_link("abc123", None)).await.unwrap();
        repo.soft_delete(old.id).await.unwrap();

        let fresh = repo.create(new_link("abc123", None)).await.unwrap();

        assert_ne!(fresh.id, old.id);
        let found = repo.find_active_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found.id, fresh.id);
    }

    #[tokio::test]
    async fn soft_delete_twice_is_not_found() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("abc123", None)).await.unwrap();

        assert!(repo.soft_delete(link.id).await.unwrap());
        let err = repo.soft_delete(link.id).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(repo.find_active_by_id(link.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn increment_and_fetch_counts() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("abc123", None)).await.unwrap();

        for _ in 0..3 {
            let url = repo.increment_and_fetch("abc123").await.unwrap();
            assert_eq!(url, "https://example.com");
        }

        let found = repo.find_active_by_id(link.id).await.unwrap().unwrap();
        assert_eq!(found.clicks, 3);
    }

    #[tokio::test]
    async fn increment_deleted_is_not_found() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("abc123", None)).await.unwrap();
        repo.soft_delete(link.id).await.unwrap();

        let err = repo.increment_and_fetch("abc123").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_clicks, 0);
        assert_eq!(stats.deleted_links, 1);
    }

    #[tokio::test]
    async fn update_target_keeps_identity() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("abc123", None)).await.unwrap();

        let updated = repo
            .update_target(link.id, "https://new.example")
            .await
            .unwrap();

        assert_eq!(updated.original_url, "https://new.example");
        assert_eq!(updated.short_code, link.short_code);
        assert_eq!(updated.short_url, link.short_url);
        assert_eq!(updated.created_at, link.created_at);
    }

    #[tokio::test]
    async fn find_by_owner_newest_first() {
        let repo = MemoryLinkRepository::new();
        let owner = Uuid::new_v4();

        let first = repo.create(new_link("aaaaaa", Some(owner))).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.create(new_link("bbbbbb", Some(owner))).await.unwrap();
        repo.create(new_link("cccccc", None)).await.unwrap();

        let links = repo.find_active_by_owner(owner).await.unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].id, second.id);
        assert_eq!(links[1].id, first.id);
    }

    #[tokio::test]
    async fn soft_delete_by_owner_only_touches_owner() {
        let repo = MemoryLinkRepository::new();
        let owner = Uuid::new_v4();

        repo.create(new_link("aaaaaa", Some(owner))).await.unwrap();
        repo.create(new_link("bbbbbb", Some(owner))).await.unwrap();
        repo.create(new_link("cccccc", None)).await.unwrap();

        assert_eq!(repo.soft_delete_by_owner(owner).await.unwrap(), 2);
        assert!(repo.find_active_by_owner(owner).await.unwrap().is_empty());
        assert!(repo.find_active_by_code("cccccc").await.unwrap().is_some());
    }
}
