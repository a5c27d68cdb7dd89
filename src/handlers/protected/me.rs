use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UpdateProfileRequest;

/// GET /users/me - The caller's own `{name, email}`, as loaded by `require_auth`
pub async fn get(Extension(auth_user): Extension<AuthUser>) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(UserProfile::from(auth_user)))
}

/// PATCH /users/me - Update any of `name`, `email`, `password`
pub async fn patch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(request) = payload?;
    let profile = state.users.update_profile(auth_user.id, request, true).await?;
    Ok(ApiResponse::success(profile))
}

/// PUT /users/me - Replace `name`, `email` and `password` together
pub async fn put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(request) = payload?;
    let profile = state.users.update_profile(auth_user.id, request, false).await?;
    Ok(ApiResponse::success(profile))
}
