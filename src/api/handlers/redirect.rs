//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Every hit goes to storage, which counts the visit and returns the
/// destination in one step. Nothing is cached.
///
/// # Response
///
/// `302 Found` with the destination in `Location`.
///
/// # Errors
///
/// Returns 404 Not Found if no active link uses the code.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.redirect_service.resolve(&code).await?;

    tracing::debug!(code, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]))
}
