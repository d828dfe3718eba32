//! In-process repository implementations.
//!
//! Selected with `STORAGE_BACKEND=memory` for local development, and used by
//! the integration tests. Data does not survive a restart.

mod memory_link_repository;
mod memory_owner_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use memory_owner_repository::MemoryOwnerRepository;
