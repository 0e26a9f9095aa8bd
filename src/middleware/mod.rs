pub mod auth;
pub mod response;

pub use auth::{extract_bearer_token, require_principal};
pub use response::{ApiResponse, ApiResult};
