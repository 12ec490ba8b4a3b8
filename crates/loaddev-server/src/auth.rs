//! Caller identity from the bearer token.
//!
//! The owner id is the JWT `sub` claim. The payload is decoded without
//! signature verification; tokens are verified by the gateway or identity
//! provider in front of the services.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::Engine as _;
use loaddev_core::identity::OwnerId;

use crate::error::ApiError;

/// The authenticated owner of the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub OwnerId);

impl CurrentUser {
    #[must_use]
    pub fn owner(&self) -> &str {
        self.0.as_str()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthenticated("missing bearer token".into()))?;
        let value = header
            .to_str()
            .map_err(|_| ApiError::Unauthenticated("malformed authorization header".into()))?;
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthenticated("expected a bearer token".into()))?;
        decode_subject(token.trim()).map(Self)
    }
}

/// Read the `sub` claim of a JWT.
///
/// # Errors
///
/// Returns `ApiError::Unauthenticated` if the token is not a three-part JWT,
/// the payload is not base64url JSON, or `sub` is missing or blank.
pub fn decode_subject(jwt: &str) -> Result<OwnerId, ApiError> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(ApiError::Unauthenticated("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| ApiError::Unauthenticated(format!("base64 decode failed: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| ApiError::Unauthenticated(format!("JSON parse failed: {e}")))?;
    let sub = value["sub"]
        .as_str()
        .ok_or_else(|| ApiError::Unauthenticated("missing sub claim".into()))?;
    OwnerId::parse(sub).map_err(|e| ApiError::Unauthenticated(e.to_string()))
}
