//! In-process harness: the real router wired to the in-memory repositories.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use rental_booking_backend::auth;
use rental_booking_backend::config::AppConfig;
use rental_booking_backend::handlers::{self, AppState};
use rental_booking_backend::in_memory::InMemoryRepository;

pub const JWT_SECRET: &str = "test-secret";

pub fn test_app() -> (Router, InMemoryRepository) {
    let repo = InMemoryRepository::new();
    let config = AppConfig {
        database_url: String::new(),
        port: 0,
        jwt_secret: JWT_SECRET.to_string(),
    };
    let state = AppState {
        config,
        bookings: Arc::new(repo.clone()),
        properties: Arc::new(repo.clone()),
    };
    (handlers::router(state), repo)
}

pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", auth::create_token(user_id, JWT_SECRET).unwrap())
}

/// Drives one request through the router and returns the status plus the
/// decoded JSON body (`Null` when the body is empty, e.g. for 204s).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", token);
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
