//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access and are implemented in the
//! infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence` (PostgreSQL)
//!   and `crate::infrastructure::memory` (in-process)
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link persistence, lookups and click counting
//! - [`OwnerRepository`] - Owners and their API token hashes

pub mod link_repository;
pub mod owner_repository;

pub use link_repository::{LinkRepository, StoreStats};
pub use owner_repository::OwnerRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use owner_repository::MockOwnerRepository;
