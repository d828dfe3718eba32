//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, lookups and click counting
//! - [`PgOwnerRepository`] - Owner and token hash storage

pub mod pg_link_repository;
pub mod pg_owner_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_owner_repository::PgOwnerRepository;
