use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use gazman_api::{
    config::AuthSettings, routes, services::auth_service::issue_token, state::AppState,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

// None of these requests should reach the database.
fn app() -> Router {
    routes::app(AppState {
        orm: DatabaseConnection::Disconnected,
        auth: settings(),
    })
}

fn settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: Arc::from("guard-test-secret"),
        token_ttl: Duration::minutes(30),
        expose_reset_token: false,
    }
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_answers_without_credentials() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn cart_requires_a_bearer_token() {
    let (status, body) = send(get("/api/cart")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing Authorization header");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let request = Request::builder()
        .uri("/api/orders")
        .header(header::AUTHORIZATION, "Basic YWRtaW46YWRtaW4=")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let foreign = AuthSettings {
        jwt_secret: Arc::from("someone-elses-secret"),
        ..settings()
    };
    let token = issue_token(Uuid::new_v4(), &foreign).unwrap();
    let request = Request::builder()
        .uri("/api/driver/orders")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn categories_are_public() {
    let (status, body) = send(get("/api/categories")).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body["data"]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 6);
    assert_eq!(categories[0]["value"], "domestic");
}

#[tokio::test]
async fn unknown_sort_field_is_a_bad_request() {
    let (status, body) = send(get("/api/products?sort=-password_hash")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("password_hash"));
}

#[tokio::test]
async fn malformed_query_is_a_bad_request() {
    let (status, _) = send(get("/api/products?page=first")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    let (status, body) = send(get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/api/nope");
}
