//! Collision-avoiding short code assignment.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;

/// Number of candidates tried before giving up with [`AppError::CodeExhaustion`].
pub const MAX_ATTEMPTS: usize = 5;

/// Assigns a short code that is unique among active links and persists the
/// resulting link.
///
/// Each attempt generates a candidate and checks storage for an active link
/// with the same code. The check is only a fast path: the store enforces
/// uniqueness on insert, and a [`AppError::Conflict`] from `create` is
/// counted as a collision like any other.
pub struct UniqueCodeAssigner<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    generator: CodeGenerator,
    base_url: Option<String>,
}

impl<L: LinkRepository + ?Sized> UniqueCodeAssigner<L> {
    /// Creates a new assigner.
    ///
    /// `base_url` may be `None`; creation then fails per call with
    /// [`AppError::Configuration`] while lookups keep working.
    pub fn new(link_repository: Arc<L>, generator: CodeGenerator, base_url: Option<String>) -> Self {
        Self {
            link_repository,
            generator,
            base_url,
        }
    }

    /// Generates a unique code for `original_url` and stores the new link.
    ///
    /// # Errors
    ///
    /// - [`AppError::Configuration`] if no base address is configured
    /// - [`AppError::CodeExhaustion`] after [`MAX_ATTEMPTS`] consecutive collisions
    /// - Any other storage error, unchanged
    pub async fn assign(&self, original_url: &str, owner_id: Option<Uuid>) -> Result<Link, AppError> {
        let base_url = self.base_url()?;

        for attempt in 1..=MAX_ATTEMPTS {
            let code = self.generator.generate()?;

            if self
                .link_repository
                .find_active_by_code(&code)
                .await?
                .is_some()
            {
                tracing::debug!(attempt, code, "Short code collision");
                continue;
            }

            let short_url = format!("{base_url}/{code}");
            let new_link = NewLink::new(original_url.to_string(), code, short_url, owner_id);

            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { details, .. }) => {
                    tracing::debug!(attempt, %details, "Short code taken at insert");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(attempts = MAX_ATTEMPTS, "Short code space exhausted for request");

        Err(AppError::code_exhaustion(
            "Could not generate a unique short code, please retry",
            json!({ "attempts": MAX_ATTEMPTS }),
        ))
    }

    fn base_url(&self) -> Result<&str, AppError> {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                AppError::configuration(
                    "Base address is not configured",
                    json!({ "variable": "BASE_URL" }),
                )
            })
    }
}
