use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;

use super::path_id;
use crate::app::AppState;
use crate::auth::Principal;
use crate::filter::{parse_id_list, RecipeFilter};
use crate::middleware::{ApiResponse, ApiResult};
use crate::serializers::{RecipeDetailOut, RecipeOut, RecipePayload};
use crate::services::RecipeService;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Comma separated tag ids, e.g. `tags=1,2`
    pub tags: Option<String>,
    /// Comma separated ingredient ids
    pub ingredients: Option<String>,
}

/// GET /api/recipe/recipes - the caller's recipes, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<RecipeOut>> {
    let Query(query) = query?;
    let filter = RecipeFilter::new(principal.id)
        .tags(parse_id_list("tags", query.tags.as_deref())?)
        .ingredients(parse_id_list("ingredients", query.ingredients.as_deref())?);

    let rows = RecipeService::new(state.store())
        .list(&principal, filter)
        .await?;
    Ok(ApiResponse::success(rows.iter().map(RecipeOut::from).collect()))
}

/// POST /api/recipe/recipes
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<RecipeDetailOut> {
    let Json(payload) = payload?;

    let created = RecipeService::new(state.store())
        .create(&principal, payload)
        .await?;
    Ok(ApiResponse::created(RecipeDetailOut::from(&created)))
}

/// GET /api/recipe/recipes/:id - detail view with nested ingredients and tags
pub async fn retrieve(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<RecipeDetailOut> {
    let id = path_id(id)?;

    let recipe = RecipeService::new(state.store()).get(&principal, id).await?;
    Ok(ApiResponse::success(RecipeDetailOut::from(&recipe)))
}

/// PUT /api/recipe/recipes/:id
pub async fn replace(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<RecipeDetailOut> {
    update(state, principal, id, payload, false).await
}

/// PATCH /api/recipe/recipes/:id
pub async fn patch(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<RecipeDetailOut> {
    update(state, principal, id, payload, true).await
}

/// DELETE /api/recipe/recipes/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let id = path_id(id)?;

    RecipeService::new(state.store()).delete(&principal, id).await?;
    Ok(ApiResponse::no_content())
}

async fn update(
    state: AppState,
    principal: Principal,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
    partial: bool,
) -> ApiResult<RecipeDetailOut> {
    let id = path_id(id)?;
    let Json(payload) = payload?;

    let updated = RecipeService::new(state.store())
        .update(&principal, id, payload, partial)
        .await?;
    Ok(ApiResponse::success(RecipeDetailOut::from(&updated)))
}
