//! Gateway forwarding against a live upstream on an ephemeral port.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use loaddev_config::{GatewayConfig, RouteConfig};
use loaddev_server::{GatewayState, gateway_router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn echo(headers: HeaderMap, req: Request) -> Json<Value> {
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let body = axum::body::to_bytes(req.into_body(), usize::MAX).await.unwrap();
    Json(json!({
        "method": method,
        "uri": uri,
        "authorization": headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
        "hasKeepAlive": headers.contains_key("keep-alive"),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3)).await;
    "late"
}

async fn upstream() -> SocketAddr {
    let app = Router::new()
        .route("/slow/wait", get(slow))
        .route("/teapot/brew", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
        .fallback(echo);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn gateway(routes: Vec<RouteConfig>, timeout_secs: u64) -> Router {
    let config = GatewayConfig {
        routes,
        timeout_secs,
        ..GatewayConfig::default()
    };
    gateway_router(GatewayState::new(&config).unwrap())
}

fn route(prefix: &str, upstream: String) -> RouteConfig {
    RouteConfig {
        prefix: prefix.into(),
        upstream,
    }
}

async fn body_of(response: axum::response::Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

#[tokio::test]
async fn forwards_method_path_query_headers_and_body() {
    let addr = upstream().await;
    let app = gateway(vec![route("/loads", format!("http://{addr}"))], 5);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/loads?name=ladder")
        .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
        .header("keep-alive", "timeout=5")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"ladder"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let echoed: Value = serde_json::from_slice(&body_of(response).await).unwrap();
    assert_eq!(
        echoed,
        json!({
            "method": "POST",
            "uri": "/loads?name=ladder",
            "authorization": "Bearer abc.def.ghi",
            "hasKeepAlive": false,
            "body": r#"{"name":"ladder"}"#,
        })
    );
}

#[tokio::test]
async fn relays_upstream_status_and_body() {
    let addr = upstream().await;
    let app = gateway(vec![route("/teapot", format!("http://{addr}"))], 5);

    let request = Request::builder().uri("/teapot/brew").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(body_of(response).await, "short and stout");
}

#[tokio::test]
async fn unmatched_path_is_not_found() {
    let addr = upstream().await;
    let app = gateway(vec![route("/rifles", format!("http://{addr}"))], 5);

    let request = Request::builder().uri("/registry").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let app = gateway(vec![route("/cases", format!("http://{addr}"))], 5);

    let request = Request::builder().uri("/cases").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn slow_upstream_is_gateway_timeout() {
    let addr = upstream().await;
    let app = gateway(vec![route("/slow", format!("http://{addr}"))], 1);

    let request = Request::builder().uri("/slow/wait").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let addr = upstream().await;
    let app = gateway(vec![route("/loads", format!("http://{addr}"))], 5);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/loads")
        .body(Body::from(vec![b'x'; 11 * 1024 * 1024]))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn gateway_health() {
    let app = gateway(Vec::new(), 5);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
