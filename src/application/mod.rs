//! Application layer services implementing business logic.
//!
//! Services orchestrate repository calls and enforce business rules. They
//! consume repository traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::code_assigner::UniqueCodeAssigner`] - Collision-safe short code assignment
//! - [`services::shorten_service::ShortenService`] - Link creation and owner-scoped management
//! - [`services::redirect_service::RedirectService`] - Code resolution and click counting
//! - [`services::auth_service::AuthService`] - Owner token authentication

pub mod services;
