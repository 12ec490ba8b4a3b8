use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use loaddev_core::entities::{Group, Load, Owned};
use loaddev_core::statistics::GroupStatistics;

use super::JsonBody;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups", post(create))
        .route("/groups/load/:load_id", get(list_by_load))
        .route("/groups/:id", get(fetch).put(update).delete(remove))
        .route("/groups/:id/statistics", get(statistics))
}

/// 404 when the load is not the caller's, so other owners' ids are not probed.
async fn list_by_load(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(load_id): Path<i64>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let service = state.service();
    if service.find_load(user.owner(), load_id).await?.is_none() {
        return Err(ApiError::not_found(Load::ENTITY, load_id));
    }
    Ok(Json(service.list_groups_by_load(user.owner(), load_id).await?))
}

async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(mut group): JsonBody<Group>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    group.set_id(None);
    let saved = state.service().save_group(user.owner(), &group).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn fetch(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Group>, ApiError> {
    state
        .service()
        .find_group(user.owner(), id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found(Group::ENTITY, id))
}

async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(mut group): JsonBody<Group>,
) -> Result<Json<Group>, ApiError> {
    group.set_id(Some(id));
    Ok(Json(state.service().save_group(user.owner(), &group).await?))
}

async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_group(user.owner(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn statistics(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<GroupStatistics>, ApiError> {
    state
        .service()
        .group_statistics(user.owner(), id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found(Group::ENTITY, id))
}
