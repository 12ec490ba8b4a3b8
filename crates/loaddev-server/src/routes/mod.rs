//! Route tables for the entity services.

mod components;
mod groups;
mod loads;
mod rifles;
mod shots;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ServiceKind;
use crate::error::ApiError;
use crate::state::AppState;

/// JSON request body whose rejections render as 400 with the parse error.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    service: ServiceKind,
}

/// All routes for one service kind, plus `/health`.
pub fn service_routes(kind: ServiceKind) -> Router<AppState> {
    let mut router = Router::new().route("/health", get(move || health(kind)));
    if kind.serves_rifles() {
        router = router.merge(rifles::router());
    }
    if kind.serves_loads() {
        router = router
            .merge(loads::router())
            .merge(groups::router())
            .merge(shots::router());
    }
    if kind.serves_components() {
        router = router.merge(components::router());
    }
    router
}

async fn health(service: ServiceKind) -> impl IntoResponse {
    Json(Health {
        status: "UP",
        service,
    })
}
