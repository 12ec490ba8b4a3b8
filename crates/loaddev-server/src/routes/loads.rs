use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use loaddev_core::entities::{Load, Owned};
use loaddev_core::statistics::{GroupStatistics, LoadDetails};
use serde::Deserialize;

use super::JsonBody;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/loads", get(list).post(create))
        .route("/loads/:id", get(fetch).put(update).delete(remove))
        .route("/loads/:id/statistics", get(statistics))
        .route("/loads/:id/details", get(details))
}

#[derive(Debug, Deserialize)]
struct NameFilter {
    name: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(filter): Query<NameFilter>,
) -> Result<Json<Vec<Load>>, ApiError> {
    let loads = match filter.name.as_deref() {
        Some(name) => state.service().find_loads_by_name(user.owner(), name).await?,
        None => state.service().list_loads(user.owner()).await?,
    };
    Ok(Json(loads))
}

async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(mut load): JsonBody<Load>,
) -> Result<(StatusCode, Json<Load>), ApiError> {
    load.set_id(None);
    let saved = state.service().save_load(user.owner(), &load).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn fetch(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Load>, ApiError> {
    state
        .service()
        .find_load(user.owner(), id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found(Load::ENTITY, id))
}

async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(mut load): JsonBody<Load>,
) -> Result<Json<Load>, ApiError> {
    load.set_id(Some(id));
    Ok(Json(state.service().save_load(user.owner(), &load).await?))
}

async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_load(user.owner(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn statistics(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<GroupStatistics>>, ApiError> {
    state
        .service()
        .load_statistics(user.owner(), id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found(Load::ENTITY, id))
}

async fn details(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<LoadDetails>, ApiError> {
    state
        .service()
        .load_details(user.owner(), id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found(Load::ENTITY, id))
}
