//! Reverse-proxy gateway.
//!
//! Each request is matched against the configured route table by longest
//! path prefix (on a segment boundary) and forwarded with its method, path,
//! query, headers and body. Hop-by-hop headers are dropped in both
//! directions. Request bodies over `MAX_BODY_BYTES` get 413.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use loaddev_config::{GatewayConfig, RouteConfig};
use thiserror::Error;
use tower_http::trace::TraceLayer;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no route for {0}")]
    NoRoute(String),

    #[error("upstream {0} timed out")]
    Timeout(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NoRoute(_) => StatusCode::NOT_FOUND,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::warn!(error = %self, %status, "gateway error");
        }
        (status, self.to_string()).into_response()
    }
}

/// Route table ordered longest prefix first.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteConfig>,
}

impl RouteTable {
    #[must_use]
    pub fn new(mut routes: Vec<RouteConfig>) -> Self {
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { routes }
    }

    /// The route whose prefix is the longest match for `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&RouteConfig> {
        self.routes.iter().find(|route| {
            let prefix = route.prefix.trim_end_matches('/');
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

#[derive(Clone)]
pub struct GatewayState {
    table: Arc<RouteTable>,
    client: reqwest::Client,
}

impl GatewayState {
    /// # Errors
    ///
    /// Returns `GatewayError::Client` if the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            table: Arc::new(RouteTable::new(config.routes.clone())),
            client,
        })
    }
}

/// Gateway router: `/health` plus a catch-all proxy.
pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(proxy)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the gateway address and proxy until Ctrl-C.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve_gateway(state: GatewayState, config: &GatewayConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        routes = config.routes.len(),
        "gateway listening"
    );
    axum::serve(listener, gateway_router(state))
        .with_graceful_shutdown(crate::shutdown_signal())
        .await
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "UP", "service": "gateway" }))
}

async fn proxy(
    State(gateway): State<GatewayState>,
    method: Method,
    uri: Uri,
    mut headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let path = uri.path();
    let route = gateway
        .table
        .resolve(path)
        .ok_or_else(|| GatewayError::NoRoute(path.to_string()))?;

    let path_and_query = uri.path_and_query().map_or(path, |pq| pq.as_str());
    let url = format!("{}{}", route.upstream.trim_end_matches('/'), path_and_query);

    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    tracing::debug!(%method, %url, "forwarding");
    let upstream = gateway
        .client
        .request(method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| upstream_error(&url, &e))?;

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(header::CONTENT_LENGTH);
    let bytes: Bytes = upstream.bytes().await.map_err(|e| upstream_error(&url, &e))?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

fn upstream_error(url: &str, err: &reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(url.to_string())
    } else {
        GatewayError::Upstream(err.to_string())
    }
}

/// Remove hop-by-hop headers, including any named by `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in &named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use pretty_assertions::assert_eq;

    use super::*;

    fn route(prefix: &str, upstream: &str) -> RouteConfig {
        RouteConfig {
            prefix: prefix.into(),
            upstream: upstream.into(),
        }
    }

    #[test]
    fn longest_prefix_wins() {
        let table = RouteTable::new(vec![
            route("/loads", "http://loads"),
            route("/loads/archive", "http://archive"),
        ]);
        assert_eq!(table.resolve("/loads/7").unwrap().upstream, "http://loads");
        assert_eq!(
            table.resolve("/loads/archive/7").unwrap().upstream,
            "http://archive"
        );
        assert_eq!(table.resolve("/loads").unwrap().upstream, "http://loads");
    }

    #[test]
    fn prefix_matches_whole_segments() {
        let table = RouteTable::new(vec![route("/cases", "http://c")]);
        assert!(table.resolve("/casesx").is_none());
        assert!(table.resolve("/rifles").is_none());
    }

    #[test]
    fn root_prefix_matches_everything() {
        let table = RouteTable::new(vec![route("/", "http://all")]);
        assert!(table.resolve("/anything/here").is_some());
    }

    #[test]
    fn hop_by_hop_headers_removed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("close, x-trace"));
        headers.insert("x-trace", HeaderValue::from_static("1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));

        strip_hop_by_hop(&mut headers);
        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key(header::AUTHORIZATION));
    }

    #[test]
    fn error_statuses() {
        let cases = [
            (GatewayError::NoRoute("/x".into()), StatusCode::NOT_FOUND),
            (GatewayError::Timeout("u".into()), StatusCode::GATEWAY_TIMEOUT),
            (GatewayError::Upstream("refused".into()), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
