//! Request-level tests against the full service router over an in-memory
//! database.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use base64::Engine as _;
use loaddev_config::ServerConfig;
use loaddev_db::service::LoadDevService;
use loaddev_server::{AppState, ServiceKind, build_router};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

const ALICE: &str = "user_alice";
const BOB: &str = "user_bob";

fn bearer(sub: &str) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"RS256"}"#);
    let payload = engine.encode(format!(r#"{{"sub":"{sub}"}}"#));
    let signature = engine.encode("fake_sig");
    format!("Bearer {header}.{payload}.{signature}")
}

async fn app(kind: ServiceKind) -> Router {
    let service = LoadDevService::new_local(":memory:").await.unwrap();
    build_router(kind, AppState::new(service), &ServerConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, owner: &str, body: Option<Value>) -> (StatusCode, String) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(owner));
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

fn rifle_json() -> Value {
    json!({
        "name": "Tikka T3x",
        "caliber": "6.5 Creedmoor",
        "barrelLength": { "value": 24, "unit": "[in_i]" },
        "rifling": { "twistRate": { "value": 8, "unit": "[in_i]" }, "twistDirection": "RIGHT" }
    })
}

fn load_json(rifle_id: Option<i64>) -> Value {
    json!({
        "name": "H4350 ladder",
        "powderManufacturer": "Hodgdon",
        "powderType": "H4350",
        "bulletManufacturer": "Hornady",
        "bulletType": "ELD Match",
        "bulletWeight": { "value": 140, "unit": "[gr]" },
        "primerManufacturer": "CCI",
        "primerType": "BR-2",
        "distanceFromLands": { "value": 0.02, "unit": "[in_i]" },
        "rifleId": rifle_id
    })
}

#[tokio::test]
async fn rifle_crud_lifecycle() {
    let app = app(ServiceKind::All).await;

    let (status, body) = send(&app, Method::POST, "/rifles", ALICE, Some(rifle_json())).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = parse(&body);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["barrelLength"], json!({ "value": 24.0, "unit": "[in_i]" }));
    assert!(created.get("ownerId").is_none());

    let (status, body) = send(&app, Method::GET, &format!("/rifles/{id}"), ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), created);

    let mut renamed = rifle_json();
    renamed["name"] = json!("Tikka T3x CTR");
    let (status, body) = send(&app, Method::PUT, &format!("/rifles/{id}"), ALICE, Some(renamed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["name"], "Tikka T3x CTR");

    let (status, _) = send(&app, Method::DELETE, &format!("/rifles/{id}"), ALICE, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/rifles/{id}"), ALICE, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn other_owner_gets_not_found() {
    let app = app(ServiceKind::All).await;
    let (_, body) = send(&app, Method::POST, "/rifles", ALICE, Some(rifle_json())).await;
    let id = parse(&body)["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::GET, &format!("/rifles/{id}"), BOB, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::PUT, &format!("/rifles/{id}"), BOB, Some(rifle_json())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/rifles/{id}"), BOB, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/rifles", BOB, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!([]));
}

#[tokio::test]
async fn validation_errors_are_listed_per_field() {
    let app = app(ServiceKind::All).await;
    let mut load = load_json(None);
    load["name"] = json!("");
    load["bulletWeight"] = json!({ "value": -1, "unit": "[gr]" });
    load["distanceFromLands"] = Value::Null;

    let (status, body) = send(&app, Method::POST, "/loads", ALICE, Some(load)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("name: Name is required"));
    assert!(body.contains("bulletWeight: Bullet weight must be positive"));
    assert!(body.contains(
        "distanceFromLands: Either distance from lands or case overall length must be specified"
    ));
    assert!(body.contains("; "));
}

#[rstest]
#[case(json!({ "value": 140, "unit": "[oz_av]" }), "Invalid unit value")]
#[case(json!({ "unit": "[gr]" }), "value not found")]
#[case(json!({ "value": 140, "unit": "[in_i]" }), "is not a mass unit")]
#[tokio::test]
async fn bad_quantities_are_bad_requests(#[case] weight: Value, #[case] message: &str) {
    let app = app(ServiceKind::Loads).await;
    let mut load = load_json(None);
    load["bulletWeight"] = weight;

    let (status, body) = send(&app, Method::POST, "/loads", ALICE, Some(load)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(message), "body was: {body}");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = app(ServiceKind::All).await;
    let request = Request::builder().uri("/rifles").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/rifles")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = app(ServiceKind::Components).await;
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        serde_json::from_slice::<Value>(&bytes).unwrap(),
        json!({ "status": "UP", "service": "components" })
    );
}

#[tokio::test]
async fn service_kind_limits_routes() {
    let app = app(ServiceKind::Rifles).await;
    let (status, _) = send(&app, Method::GET, "/loads", ALICE, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/rifles", ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn load_groups_shots_and_statistics() {
    let app = app(ServiceKind::All).await;
    let (_, body) = send(&app, Method::POST, "/rifles", ALICE, Some(rifle_json())).await;
    let rifle_id = parse(&body)["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::POST, "/loads", ALICE, Some(load_json(Some(rifle_id)))).await;
    assert_eq!(status, StatusCode::CREATED);
    let load_id = parse(&body)["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::GET, "/loads?name=H4350%20ladder", ALICE, None).await;
    assert_eq!(status, StatusCode::OK);

    let group = json!({
        "loadId": load_id,
        "date": "2024-09-14",
        "powderCharge": { "value": 41.5, "unit": "[gr]" },
        "targetRange": { "value": 100, "unit": "[yd_i]" },
        "groupSize": { "value": 0.45, "unit": "[in_i]" }
    });
    let (status, body) = send(&app, Method::POST, "/groups", ALICE, Some(group)).await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = parse(&body)["id"].as_i64().unwrap();

    for fps in [2800, 2810, 2820] {
        let shot = json!({ "groupId": group_id, "velocity": { "value": fps, "unit": "[ft_i]/s" } });
        let (status, _) = send(&app, Method::POST, "/shots", ALICE, Some(shot)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, Method::GET, &format!("/shots/group/{group_id}"), ALICE, None).await;
    assert_eq!(parse(&body).as_array().unwrap().len(), 3);

    let (status, body) = send(&app, Method::GET, &format!("/groups/{group_id}/statistics"), ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    let stats = parse(&body);
    assert_eq!(stats["averageVelocity"], json!({ "value": 2810.0, "unit": "[ft_i]/s" }));
    assert_eq!(stats["extremeSpread"]["value"], 20.0);

    let (status, body) = send(&app, Method::GET, &format!("/loads/{load_id}/details"), ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    let details = parse(&body);
    assert_eq!(details["rifle"]["id"], rifle_id);
    assert_eq!(details["groups"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Method::GET, &format!("/groups/load/{load_id}"), ALICE, None).await;
    assert_eq!(parse(&body).as_array().unwrap().len(), 1);
    let (status, _) = send(&app, Method::GET, &format!("/groups/load/{load_id}"), BOB, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/loads/{load_id}"), ALICE, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/groups/{group_id}"), ALICE, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn component_search() {
    let app = app(ServiceKind::Components).await;
    for (manufacturer, kind) in [("Hornady", "ELD Match"), ("Berger", "Hybrid Target")] {
        let projectile = json!({
            "manufacturer": manufacturer,
            "type": kind,
            "weight": { "value": 140, "unit": "[gr]" },
            "cost": { "amount": 54.99, "currency": "USD" },
            "quantityPerBox": 100
        });
        let (status, _) = send(&app, Method::POST, "/projectiles", ALICE, Some(projectile)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/projectiles/search?query=hyb", ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    let hits = parse(&body);
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["manufacturer"], "Berger");
    assert_eq!(hits[0]["cost"], json!({ "amount": 54.99, "currency": "USD" }));

    let (_, body) = send(&app, Method::GET, "/projectiles/search?query=hyb", BOB, None).await;
    assert_eq!(parse(&body), json!([]));

    let (_, body) = send(&app, Method::GET, "/projectiles", ALICE, None).await;
    assert_eq!(parse(&body).as_array().unwrap().len(), 2);
}

#[rstest]
#[case::huge_negative(-1e300)]
#[case::huge_positive(1e300)]
#[tokio::test]
async fn out_of_range_cost_is_bad_request(#[case] amount: f64) {
    let app = app(ServiceKind::Components).await;
    let primer = json!({
        "manufacturer": "CCI",
        "type": "BR-4",
        "primerSize": "SMALL_RIFLE",
        "cost": { "amount": amount, "currency": "USD" },
        "quantityPerBox": 100
    });

    let (status, body) = send(&app, Method::POST, "/primers", ALICE, Some(primer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid numeric value for 'amount'"), "body was: {body}");
}
