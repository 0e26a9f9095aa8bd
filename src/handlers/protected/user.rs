use axum::Extension;

use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};
use crate::serializers::UserOut;

/// GET /api/user/me - the authenticated user
pub async fn me(Extension(principal): Extension<Principal>) -> ApiResult<UserOut> {
    Ok(ApiResponse::success(UserOut::from(&principal)))
}
