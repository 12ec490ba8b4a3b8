//! # loaddev-server
//!
//! axum HTTP services for LoadDev and the API gateway in front of them.
//!
//! One binary can serve any subset of the entity services (rifles, loads with
//! their groups and shots, or the four component kinds). The gateway
//! forwards each request to the upstream configured for the longest
//! matching path prefix.

pub mod auth;
pub mod error;
pub mod gateway;
mod routes;
pub mod state;

use std::fmt;
use std::str::FromStr;

use axum::Router;
use axum::http::HeaderValue;
use loaddev_config::ServerConfig;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use gateway::{GatewayError, GatewayState, gateway_router, serve_gateway};
pub use state::AppState;

/// Which entity services a process exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Rifles,
    Loads,
    Components,
    All,
}

impl ServiceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rifles => "rifles",
            Self::Loads => "loads",
            Self::Components => "components",
            Self::All => "all",
        }
    }

    const fn serves_rifles(self) -> bool {
        matches!(self, Self::Rifles | Self::All)
    }

    const fn serves_loads(self) -> bool {
        matches!(self, Self::Loads | Self::All)
    }

    const fn serves_components(self) -> bool {
        matches!(self, Self::Components | Self::All)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rifles" => Ok(Self::Rifles),
            "loads" => Ok(Self::Loads),
            "components" => Ok(Self::Components),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown service '{other}', expected rifles, loads, components or all"
            )),
        }
    }
}

/// Build the router for one service kind with tracing and CORS layers.
pub fn build_router(kind: ServiceKind, state: AppState, config: &ServerConfig) -> Router {
    routes::service_routes(kind)
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return base.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

/// Bind `config.bind_address()` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(
    kind: ServiceKind,
    state: AppState,
    config: &ServerConfig,
) -> std::io::Result<()> {
    let router = build_router(kind, state, config);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, service = %kind, "serving");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("rifles", ServiceKind::Rifles)]
    #[case("LOADS", ServiceKind::Loads)]
    #[case("components", ServiceKind::Components)]
    #[case("all", ServiceKind::All)]
    fn parse_service_kind(#[case] input: &str, #[case] expected: ServiceKind) {
        assert_eq!(input.parse::<ServiceKind>().unwrap(), expected);
    }

    #[test]
    fn unknown_service_kind_rejected() {
        let err = "registry".parse::<ServiceKind>().unwrap_err();
        assert!(err.contains("registry"));
    }

    #[test]
    fn all_serves_everything() {
        let all = ServiceKind::All;
        assert!(all.serves_rifles() && all.serves_loads() && all.serves_components());
        assert!(!ServiceKind::Rifles.serves_loads());
        assert!(!ServiceKind::Components.serves_rifles());
    }
}
