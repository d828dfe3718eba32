//! Handler for link shortening endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::auth::AuthenticatedOwner;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /urls`
///
/// Authentication is optional. With a valid bearer token the link is
/// attributed to the token's owner; otherwise it is anonymous.
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": "6f1c0a1e-3c4f-4a8e-9d53-2f0b7f4b8a11",
///   "shortUrl": "https://s.example.com/Ab3xYz",
///   "shortCode": "Ab3xYz",
///   "originalUrl": "https://example.com/some/long/path",
///   "createdAt": "2025-01-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 if `originalUrl` is missing or not an absolute URL
/// - 500 if no base address is configured
/// - 503 if no unique code could be found (retry is safe)
pub async fn shorten_handler(
    State(state): State<AppState>,
    owner: Option<Extension<AuthenticatedOwner>>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let owner_id = owner.map(|Extension(owner)| owner.id());

    let info = state
        .shorten_service
        .shorten(&payload.original_url, owner_id)
        .await?;

    Ok((StatusCode::CREATED, Json(info.into())))
}
