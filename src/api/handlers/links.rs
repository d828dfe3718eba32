//! Handlers for owner link management (list, update, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::link::{DeleteResponse, LinkResponse, UpdateLinkRequest};
use crate::api::middleware::auth::AuthenticatedOwner;
use crate::error::AppError;
use crate::state::AppState;

/// A malformed id cannot name any link, so it is reported like an unknown one.
fn parse_link_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::not_found("Short link not found", json!({ "id": raw })))
}

/// Lists the caller's active links, newest first.
///
/// # Endpoint
///
/// `GET /urls` (Bearer token required)
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.shorten_service.list_owned(owner.id()).await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Changes the destination of one of the caller's links.
///
/// # Endpoint
///
/// `PATCH /urls/{id}` (Bearer token required)
///
/// # Request Body
///
/// ```json
/// { "url": "https://new-destination.com" }
/// ```
///
/// The short code and short URL never change.
///
/// # Errors
///
/// - 400 if `url` is missing or not an absolute URL
/// - 404 if the link does not exist, is deleted, or belongs to someone else
pub async fn update_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;
    let id = parse_link_id(&id)?;

    let link = state
        .shorten_service
        .update_destination(owner.id(), id, &payload.url)
        .await?;

    Ok(Json(link.into()))
}

/// Soft-deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /urls/{id}` (Bearer token required)
///
/// The record stays in storage with `deletedAt` set. Redirects for its code
/// return 404 immediately, and the code becomes available for reuse.
///
/// # Errors
///
/// Returns 404 if the link does not exist, is already deleted, or belongs to
/// someone else.
pub async fn delete_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_link_id(&id)?;

    let ok = state.shorten_service.remove(owner.id(), id).await?;

    Ok(Json(DeleteResponse { ok }))
}
