//! Ingredient and tag endpoints. Both resources behave identically, so the
//! handlers are generic over a marker type that names the kind.

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
use crate::database::models::AttributeKind;
use crate::filter::parse_flag;
use crate::middleware::{ApiResponse, ApiResult};
use crate::serializers::{AttributeOut, AttributePayload};
use crate::services::AttributeService;

pub trait AttributeResource: Send + Sync + 'static {
    const KIND: AttributeKind;
}

/// `/api/recipe/ingredients`
pub struct Ingredients;

/// `/api/recipe/tags`
pub struct Tags;

impl AttributeResource for Ingredients {
    const KIND: AttributeKind = AttributeKind::Ingredient;
}

impl AttributeResource for Tags {
    const KIND: AttributeKind = AttributeKind::Tag;
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `1`/`true` restricts the list to entries used by at least one recipe
    pub assigned_only: Option<String>,
}

/// GET - list the caller's entries, name descending
pub async fn list<R: AttributeResource>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<AttributeOut>> {
    let Query(query) = query?;
    let assigned_only = parse_flag("assigned_only", query.assigned_only.as_deref())?;

    let rows = AttributeService::new(state.store(), R::KIND)
        .list(&principal, assigned_only)
        .await?;
    Ok(ApiResponse::success(rows.into_iter().map(AttributeOut::from).collect()))
}

/// POST - create an entry owned by the caller
pub async fn create<R: AttributeResource>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<AttributePayload>, JsonRejection>,
) -> ApiResult<AttributeOut> {
    let Json(payload) = payload?;

    let created = AttributeService::new(state.store(), R::KIND)
        .create(&principal, &payload)
        .await?;
    Ok(ApiResponse::created(created.into()))
}

/// GET /:id
pub async fn retrieve<R: AttributeResource>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<AttributeOut> {
    let id = path_id(id)?;

    let found = AttributeService::new(state.store(), R::KIND)
        .get(&principal, id)
        .await?;
    Ok(ApiResponse::success(found.into()))
}

/// PUT /:id
pub async fn replace<R: AttributeResource>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AttributePayload>, JsonRejection>,
) -> ApiResult<AttributeOut> {
    update::<R>(state, principal, id, payload, false).await
}

/// PATCH /:id
pub async fn patch<R: AttributeResource>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AttributePayload>, JsonRejection>,
) -> ApiResult<AttributeOut> {
    update::<R>(state, principal, id, payload, true).await
}

/// DELETE /:id - also unlinks the entry from the caller's recipes
pub async fn delete<R: AttributeResource>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let id = path_id(id)?;

    AttributeService::new(state.store(), R::KIND)
        .delete(&principal, id)
        .await?;
    Ok(ApiResponse::no_content())
}

async fn update<R: AttributeResource>(
    state: AppState,
    principal: Principal,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AttributePayload>, JsonRejection>,
    partial: bool,
) -> ApiResult<AttributeOut> {
    let id = path_id(id)?;
    let Json(payload) = payload?;

    let updated = AttributeService::new(state.store(), R::KIND)
        .update(&principal, id, &payload, partial)
        .await?;
    Ok(ApiResponse::success(updated.into()))
}
