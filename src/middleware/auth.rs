use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::{UserError, UserService};

/// Resolves the bearer token to a `Principal` and injects it into the request.
/// Requests without a valid token are rejected before any handler runs.
pub async fn require_principal(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let principal = UserService::new(state.store())
        .authenticate(&token)
        .await
        .map_err(|err| match err {
            UserError::Store(e) => ApiError::from(e),
            other => {
                tracing::warn!("Authentication failed: {}", other);
                ApiError::unauthorized("Invalid token.")
            }
        })?;

    tracing::debug!("Authenticated {} ({})", principal.email, principal.id);
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "Authentication credentials were not provided.".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .ok_or_else(|| "Authorization header must use Bearer token format".to_string())?
        .trim();

    if token.is_empty() {
        return Err("Empty bearer token".to_string());
    }
    Ok(token.to_string())
}
