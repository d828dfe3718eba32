//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /health`      - Storage health check (public)
//! - `POST   /urls`        - Create a short link (Bearer token optional)
//! - `GET    /urls`        - List own links (Bearer token required)
//! - `PATCH  /urls/{id}`   - Change a link's destination (Bearer token required)
//! - `DELETE /urls/{id}`   - Soft-delete a link (Bearer token required)
//! - `GET    /{code}`      - Short link redirect (public)
//!
//! Static segments win over the `/{code}` capture, and generated codes never
//! equal a static segment.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer token, required or optional per route group
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the application router with all routes and the tracing layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .merge(api::routes::public_routes(state.clone()))
        .merge(api::routes::protected_routes(state.clone()))
        .with_state(state)
        .layer(tracing::layer())
}

/// Wraps [`router`] so that `/urls/` and `/urls` route the same way.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
