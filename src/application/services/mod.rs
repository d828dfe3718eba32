//! Business logic services for the application layer.

pub mod auth_service;
pub mod code_assigner;
pub mod redirect_service;
pub mod shorten_service;

pub use auth_service::AuthService;
pub use code_assigner::UniqueCodeAssigner;
pub use redirect_service::RedirectService;
pub use shorten_service::{ShortLinkInfo, ShortenService};
