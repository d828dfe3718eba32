//! Redirect resolution with click counting.

use std::sync::Arc;

use serde_json::json;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::is_valid_code;

/// Resolves short codes to destinations on the redirect path.
///
/// Every call goes to storage: nothing is cached, so a deleted or retargeted
/// link takes effect on the very next request.
pub struct RedirectService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Records a visit and returns the destination URL for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active link uses `code`. Codes
    /// that cannot have been generated are rejected without a storage call.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !is_valid_code(code) {
            return Err(not_found(code));
        }

        match self.link_repository.increment_and_fetch(code).await {
            Ok(url) => Ok(url),
            Err(AppError::NotFound { .. }) => Err(not_found(code)),
            Err(e) => Err(e),
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}
