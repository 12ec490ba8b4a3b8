//! Projectile, propellant, primer, and case routes.
//!
//! The four component services share one shape: list, create, full-text
//! search, and by-id get/update/delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use loaddev_core::entities::{Case, Owned, Primer, Projectile, Propellant};
use serde::Deserialize;

use super::JsonBody;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
}

macro_rules! component_routes {
    (
        $module:ident, $prefix:literal, $ty:ty,
        save: $save:ident, find: $find:ident, list: $list:ident,
        search: $search:ident, delete: $delete:ident $(,)?
    ) => {
        mod $module {
            use super::*;

            pub fn router() -> Router<AppState> {
                Router::new()
                    .route($prefix, get(list).post(create))
                    .route(concat!($prefix, "/search"), get(search))
                    .route(
                        concat!($prefix, "/:id"),
                        get(fetch).put(update).delete(remove),
                    )
            }

            async fn list(
                State(state): State<AppState>,
                user: CurrentUser,
            ) -> Result<Json<Vec<$ty>>, ApiError> {
                Ok(Json(state.service().$list(user.owner()).await?))
            }

            async fn search(
                State(state): State<AppState>,
                user: CurrentUser,
                Query(params): Query<SearchParams>,
            ) -> Result<Json<Vec<$ty>>, ApiError> {
                Ok(Json(
                    state.service().$search(user.owner(), &params.query).await?,
                ))
            }

            async fn create(
                State(state): State<AppState>,
                user: CurrentUser,
                JsonBody(mut item): JsonBody<$ty>,
            ) -> Result<(StatusCode, Json<$ty>), ApiError> {
                item.set_id(None);
                let saved = state.service().$save(user.owner(), &item).await?;
                Ok((StatusCode::CREATED, Json(saved)))
            }

            async fn fetch(
                State(state): State<AppState>,
                user: CurrentUser,
                Path(id): Path<i64>,
            ) -> Result<Json<$ty>, ApiError> {
                state
                    .service()
                    .$find(user.owner(), id)
                    .await?
                    .map(Json)
                    .ok_or(ApiError::not_found(<$ty>::ENTITY, id))
            }

            async fn update(
                State(state): State<AppState>,
                user: CurrentUser,
                Path(id): Path<i64>,
                JsonBody(mut item): JsonBody<$ty>,
            ) -> Result<Json<$ty>, ApiError> {
                item.set_id(Some(id));
                Ok(Json(state.service().$save(user.owner(), &item).await?))
            }

            async fn remove(
                State(state): State<AppState>,
                user: CurrentUser,
                Path(id): Path<i64>,
            ) -> Result<StatusCode, ApiError> {
                state.service().$delete(user.owner(), id).await?;
                Ok(StatusCode::NO_CONTENT)
            }
        }
    };
}

component_routes!(
    projectiles, "/projectiles", Projectile,
    save: save_projectile, find: find_projectile, list: list_projectiles,
    search: search_projectiles, delete: delete_projectile,
);

component_routes!(
    propellants, "/propellants", Propellant,
    save: save_propellant, find: find_propellant, list: list_propellants,
    search: search_propellants, delete: delete_propellant,
);

component_routes!(
    primers, "/primers", Primer,
    save: save_primer, find: find_primer, list: list_primers,
    search: search_primers, delete: delete_primer,
);

component_routes!(
    cases, "/cases", Case,
    save: save_case, find: find_case, list: list_cases,
    search: search_cases, delete: delete_case,
);

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(projectiles::router())
        .merge(propellants::router())
        .merge(primers::router())
        .merge(cases::router())
}
