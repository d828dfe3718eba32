//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    AuthService, RedirectService, ShortenService, UniqueCodeAssigner,
};
use crate::domain::repositories::{LinkRepository, OwnerRepository};
use crate::utils::code_generator::CodeGenerator;

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService<dyn LinkRepository, dyn OwnerRepository>>,
    pub redirect_service: Arc<RedirectService<dyn LinkRepository>>,
    pub auth_service: Arc<AuthService<dyn OwnerRepository>>,
    /// Direct store handle for the health check.
    pub link_repository: Arc<dyn LinkRepository>,
}

impl AppState {
    /// Wires the services over the given stores.
    ///
    /// `base_url` may be `None`: redirects and management keep working and
    /// link creation fails with a configuration error.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        owner_repository: Arc<dyn OwnerRepository>,
        generator: CodeGenerator,
        base_url: Option<String>,
        token_signing_secret: String,
    ) -> Self {
        let assigner = UniqueCodeAssigner::new(link_repository.clone(), generator, base_url);

        Self {
            shorten_service: Arc::new(ShortenService::new(
                link_repository.clone(),
                owner_repository.clone(),
                assigner,
            )),
            redirect_service: Arc::new(RedirectService::new(link_repository.clone())),
            auth_service: Arc::new(AuthService::new(owner_repository, token_signing_secret)),
            link_repository,
        }
    }
}
