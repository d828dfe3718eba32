//! HTTP middleware for request processing.
//!
//! Provides bearer-token authentication and request tracing.

pub mod auth;
pub mod tracing;
