//! HTTP error mapping.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use loaddev_core::validation::ValidationErrors;
use loaddev_db::error::DatabaseError;
use thiserror::Error;

/// Errors returned from request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The owner has no entity with this id. Rendered with an empty body.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Validation(ValidationErrors),

    /// Malformed JSON, unknown units, bad path parameters.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error(transparent)]
    Internal(DatabaseError),
}

impl ApiError {
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => Self::NotFound { entity, id },
            DatabaseError::Validation(errors) => Self::Validation(errors),
            other => Self::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { entity, id } => {
                tracing::debug!(entity, id, "not found");
                StatusCode::NOT_FOUND.into_response()
            }
            Self::Validation(errors) => {
                tracing::warn!(%errors, "validation failed");
                (StatusCode::BAD_REQUEST, errors.to_string()).into_response()
            }
            Self::BadRequest(message) => {
                tracing::warn!(%message, "bad request");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            Self::Unauthenticated(message) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                message,
            )
                .into_response(),
            Self::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use loaddev_core::validation::Validator;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn database_errors_map_to_statuses() {
        let cases = [
            (DatabaseError::NotFound { entity: "rifle", id: 3 }, StatusCode::NOT_FOUND),
            (DatabaseError::NoResult, StatusCode::INTERNAL_SERVER_ERROR),
            (
                DatabaseError::Query("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn validation_is_bad_request() {
        let errors = Validator::new()
            .not_blank("name", "", "Name is required")
            .finish()
            .unwrap_err();
        let response = ApiError::from(DatabaseError::Validation(errors)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthenticated_challenges_bearer() {
        let response = ApiError::Unauthenticated("missing token".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }
}
