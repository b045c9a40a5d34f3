pub mod bookings;
pub mod properties;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::auth;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::repository::{BookingRepository, PropertyRepository};

/// Everything the handlers need, injected once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub bookings: Arc<dyn BookingRepository>,
    pub properties: Arc<dyn PropertyRepository>,
}

/// Builds the routing table once at process start. Property and booking
/// routes sit behind the bearer-token middleware; the health and token routes
/// stay public.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route(
            "/bookings/:id",
            get(bookings::get_booking).delete(bookings::delete_booking),
        )
        .route(
            "/properties",
            post(properties::create_property).get(properties::list_properties),
        )
        .route(
            "/properties/:id",
            get(properties::get_property).delete(properties::delete_property),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/token", post(issue_token))
        .merge(protected)
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub user_id: String,
}

/// Issues a signed token for the submitted subject. The production identity
/// provider lives outside this service; this route keeps local development
/// and the examples self-contained.
async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::new(
            "missing_user_id",
            "user_id must not be empty",
            StatusCode::BAD_REQUEST,
        ));
    }
    let token = auth::create_token(&req.user_id, &state.config.jwt_secret).map_err(|e| {
        log::error!("failed to create token: {}", e);
        ApiError::internal("failed_to_create_token", "failed to create token")
    })?;
    Ok(Json(json!({ "token": token })))
}
