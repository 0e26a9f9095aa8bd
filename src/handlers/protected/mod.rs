// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here receives the resolved `Principal` through a request
// extension set by `middleware::require_principal`, and passes it to the
// service layer which scopes all reads and writes to that owner.
pub mod attributes;
pub mod recipes;
pub mod user;

use axum::extract::rejection::PathRejection;

use crate::error::ApiError;

/// Numeric ids only; anything else is treated as an unknown resource
pub(crate) fn path_id(
    id: Result<axum::extract::Path<i64>, PathRejection>,
) -> Result<i64, ApiError> {
    id.map(|axum::extract::Path(id)| id)
        .map_err(|_| ApiError::not_found("Not found."))
}
