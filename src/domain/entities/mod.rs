//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping
//! - [`Owner`] - An authenticated API client that links can belong to
//!
//! Creation inputs live in separate structs (`NewLink`, `NewOwner`).

pub mod link;
pub mod owner;

pub use link::{Link, NewLink};
pub use owner::{NewOwner, Owner};
