use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use loaddev_core::entities::{Owned, Rifle};

use super::JsonBody;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rifles", get(list).post(create))
        .route("/rifles/:id", get(fetch).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Rifle>>, ApiError> {
    Ok(Json(state.service().list_rifles(user.owner()).await?))
}

async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(mut rifle): JsonBody<Rifle>,
) -> Result<(StatusCode, Json<Rifle>), ApiError> {
    rifle.set_id(None);
    let saved = state.service().save_rifle(user.owner(), &rifle).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn fetch(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Rifle>, ApiError> {
    state
        .service()
        .find_rifle(user.owner(), id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found(Rifle::ENTITY, id))
}

async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(mut rifle): JsonBody<Rifle>,
) -> Result<Json<Rifle>, ApiError> {
    rifle.set_id(Some(id));
    Ok(Json(state.service().save_rifle(user.owner(), &rifle).await?))
}

async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_rifle(user.owner(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
