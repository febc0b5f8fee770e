use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use onecdc_routes::RoutesConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};

// No API key: every routing call fails fast and legs fall back to straight lines.
fn setup_app() -> (axum::Router, Arc<AppState>) {
    let mut config = Config::from_env();
    config.cart_redirect_path = "/cart".to_string();
    config.routes = RoutesConfig::default();

    let state = Arc::new(AppState::new(config).expect("state"));
    let app = api::app(state.clone());
    (app, state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn walking_payload() -> Value {
    json!({
        "origin": { "lat": 1.30, "lng": 103.80 },
        "originAddress": "Home",
        "transportMode": "walking",
        "selectedShopIds": ["s1"],
        "selectedShopsDetailed": [
            { "id": "s1", "name": "Kopi Corner", "lat": 1.31, "lng": 103.81 }
        ]
    })
}

#[tokio::test]
async fn health_check_carries_request_id() {
    let (app, _state) = setup_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .expect("request id");
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn client_request_id_is_echoed() {
    let (app, _state) = setup_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "cart-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "cart-42");
}

#[tokio::test]
async fn route_without_service_is_drawn_straight() {
    let (app, _state) = setup_app();
    let response = app
        .oneshot(post_json("/v1/routes", walking_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["mode"], "walking");
    assert_eq!(body["source"], "straight_line");
    assert!(body["total_duration_seconds"].is_null());
    assert_eq!(body["legs"].as_array().unwrap().len(), 1);
    assert_eq!(body["path"].as_array().unwrap().len(), 2);
    assert_eq!(body["waypoints"][0]["id"], "s1");
    assert_eq!(body["origin_address"], "Home");

    let distance = body["total_distance_meters"].as_f64().unwrap();
    assert!((distance - 1568.8).abs() / 1568.8 < 0.01);
}

#[tokio::test]
async fn missing_origin_redirects_to_cart() {
    let (app, _state) = setup_app();
    let mut payload = walking_payload();
    payload["origin"] = Value::Null;

    let response = app.oneshot(post_json("/v1/routes", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/cart");
    let body = read_json(response).await;
    assert_eq!(body["redirect"], "/cart");
    assert_eq!(body["reason"], "missing_origin");
}

#[tokio::test]
async fn empty_selection_redirects_to_cart() {
    let (app, _state) = setup_app();
    let payload = json!({
        "origin": { "lat": 1.30, "lng": 103.80 },
        "selectedShopsDetailed": [{ "name": "Nowhere" }]
    });

    let response = app.oneshot(post_json("/v1/routes", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let body = read_json(response).await;
    assert_eq!(body["reason"], "no_waypoints");
}

#[tokio::test]
async fn malformed_payload_is_rejected() {
    let (app, _state) = setup_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/routes")
                .header("content-type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn route_view_releases_its_registration() {
    let (app, state) = setup_app();
    let response = app
        .clone()
        .oneshot(post_json("/v1/route-views/view-1", walking_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.active_views(), 0);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/route-views/view-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_aborts_registered_view() {
    let (app, state) = setup_app();
    let lease = state.begin_view("view-2");

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/route-views/view-2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(lease.signal().is_aborted());
}
