use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::{ResourceKind, ResourceView};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::CreateResourceRequest;

async fn list(state: AppState, kind: ResourceKind, auth_user: AuthUser) -> ApiResult<Vec<ResourceView>> {
    let rows = state.resources.list(kind, auth_user.id).await?;
    Ok(ApiResponse::success(rows))
}

async fn create(
    state: AppState,
    kind: ResourceKind,
    auth_user: AuthUser,
    payload: Result<Json<CreateResourceRequest>, JsonRejection>,
) -> ApiResult<ResourceView> {
    let Json(request) = payload?;
    let created = state.resources.create(kind, auth_user.id, request).await?;
    Ok(ApiResponse::created(created))
}

/// GET /recipe/tags - Caller's tags, name descending
pub async fn list_tags(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<ResourceView>> {
    list(state, ResourceKind::Tag, auth_user).await
}

/// POST /recipe/tags - `{"name": "..."}` → 201 `{"id", "name"}`
pub async fn create_tag(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<CreateResourceRequest>, JsonRejection>,
) -> ApiResult<ResourceView> {
    create(state, ResourceKind::Tag, auth_user, payload).await
}

/// GET /recipe/ingredients
pub async fn list_ingredients(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<ResourceView>> {
    list(state, ResourceKind::Ingredient, auth_user).await
}

/// POST /recipe/ingredients
pub async fn create_ingredient(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<CreateResourceRequest>, JsonRejection>,
) -> ApiResult<ResourceView> {
    create(state, ResourceKind::Ingredient, auth_user, payload).await
}
