use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CreateUserRequest, TokenRequest};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /users/create - Register a new account
///
/// Input: `{"email": "...", "password": "...", "name": "..."}`
///
/// Output (201): `{"email": "...", "name": "..."}`; the password is never echoed.
/// Missing fields, short password, malformed or taken email → 400.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(request) = payload?;
    let profile = state.users.register(request).await?;
    Ok(ApiResponse::created(profile))
}

/// POST /users/token - Exchange credentials for a bearer token
///
/// Input: `{"email": "...", "password": "..."}`
///
/// Output (200): `{"token": "..."}`. Every failure is a 400 without a
/// `token` field, and bad credentials are not told apart.
pub async fn token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(request) = payload?;
    let token = state.users.issue_token(request).await?;
    Ok(ApiResponse::success(TokenResponse { token }))
}
