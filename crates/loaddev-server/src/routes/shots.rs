use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use loaddev_core::entities::{Group, Owned, Shot};

use super::JsonBody;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shots", post(create))
        .route("/shots/group/:group_id", get(list_by_group))
        .route("/shots/:id", get(fetch).put(update).delete(remove))
}

async fn list_by_group(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<Shot>>, ApiError> {
    let service = state.service();
    if service.find_group(user.owner(), group_id).await?.is_none() {
        return Err(ApiError::not_found(Group::ENTITY, group_id));
    }
    Ok(Json(service.list_shots_by_group(user.owner(), group_id).await?))
}

async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(mut shot): JsonBody<Shot>,
) -> Result<(StatusCode, Json<Shot>), ApiError> {
    shot.set_id(None);
    let saved = state.service().save_shot(user.owner(), &shot).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn fetch(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Shot>, ApiError> {
    state
        .service()
        .find_shot(user.owner(), id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found(Shot::ENTITY, id))
}

async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(mut shot): JsonBody<Shot>,
) -> Result<Json<Shot>, ApiError> {
    shot.set_id(Some(id));
    Ok(Json(state.service().save_shot(user.owner(), &shot).await?))
}

async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_shot(user.owner(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
