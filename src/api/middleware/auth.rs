//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use uuid::Uuid;

use crate::domain::entities::Owner;
use crate::{error::AppError, state::AppState};

/// The owner resolved from the request's bearer token.
///
/// Inserted into request extensions by [`layer`] and [`optional_layer`];
/// handlers read it with `Extension<AuthenticatedOwner>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedOwner(pub Owner);

impl AuthenticatedOwner {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

async fn bearer_token(parts: &mut Parts) -> Result<String, AppError> {
    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    Ok(token)
}

/// Requires a valid bearer token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Hash it and resolve the active owner
/// 3. Insert [`AuthenticatedOwner`] into request extensions
/// 4. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if the header
/// is missing or malformed, or the token does not belong to an active owner.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = bearer_token(&mut parts).await?;
    let owner = st.auth_service.authenticate(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthenticatedOwner(owner));

    Ok(next.run(req).await)
}

/// Attaches the owner when a valid bearer token is present.
///
/// A request without an `Authorization` header passes through anonymously.
/// A present but invalid token is logged and the request also continues
/// anonymously; only storage failures abort the request.
pub async fn optional_layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !req.headers().contains_key(header::AUTHORIZATION) {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();

    let owner = match bearer_token(&mut parts).await {
        Ok(token) => match st.auth_service.authenticate(&token).await {
            Ok(owner) => Some(owner),
            Err(AppError::Unauthorized { .. }) => {
                tracing::warn!("Invalid bearer token, continuing anonymously");
                None
            }
            Err(e) => return Err(e),
        },
        Err(_) => {
            tracing::warn!("Malformed Authorization header, continuing anonymously");
            None
        }
    };

    let mut req = Request::from_parts(parts, body);
    if let Some(owner) = owner {
        req.extensions_mut().insert(AuthenticatedOwner(owner));
    }

    Ok(next.run(req).await)
}
