//! API route configuration.
//!
//! Authentication is applied per route group via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    delete_link_handler, list_links_handler, shorten_handler, update_link_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

/// Link creation, open to anonymous callers.
///
/// # Endpoints
///
/// - `POST   /urls`        - Create a short link (Bearer token optional)
pub fn public_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/urls", post(shorten_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::optional_layer))
}

/// Owner link management, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /urls`        - List the caller's links
/// - `PATCH  /urls/{id}`   - Change a link's destination
/// - `DELETE /urls/{id}`   - Soft-delete a link
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_links_handler))
        .route(
            "/urls/{id}",
            patch(update_link_handler).delete(delete_link_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}
