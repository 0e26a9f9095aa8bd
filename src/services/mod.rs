pub mod attribute_service;
pub mod recipe_service;
pub mod user_service;

pub use attribute_service::AttributeService;
pub use recipe_service::RecipeService;
pub use user_service::{UserError, UserService};

use thiserror::Error;

use crate::database::store::StoreError;
use crate::error::ApiError;
use crate::serializers::FieldErrors;

/// Outcome of a scoped operation that did not succeed
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing, or owned by someone else; callers cannot tell which
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(what) => ApiError::not_found(format!("{what} not found")),
            ServiceError::Validation(errors) => errors.into(),
            ServiceError::Store(e) => e.into(),
        }
    }
}
