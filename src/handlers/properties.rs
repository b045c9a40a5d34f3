use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, RepositoryError};
use crate::handlers::AppState;
use crate::models::NewProperty;

#[derive(Debug, Deserialize)]
pub struct CreatePropertyRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_per_night_cents: i64,
    #[serde(default)]
    pub currency: String,
}

pub async fn create_property(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreatePropertyRequest>,
) -> Response {
    log::info!("create property: host_id={}", user.0);

    let property = NewProperty {
        // The authenticated subject is the host; the body cannot claim
        // someone else's listing.
        host_id: user.0,
        title: req.title,
        description: req.description,
        price_per_night_cents: req.price_per_night_cents,
        currency: req.currency,
    };

    match state.properties.create_property(property).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(RepositoryError::Validation(message)) => {
            ApiError::new("invalid_property", message, StatusCode::BAD_REQUEST).into_response()
        }
        Err(e) => {
            log::error!("failed to create property: {}", e);
            ApiError::internal("failed_to_create_property", "failed to create property")
                .into_response()
        }
    }
}

pub async fn get_property(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    log::info!("get property: id={}", id);
    match state.properties.get_property(&id).await {
        Ok(Some(property)) => Json(property).into_response(),
        Ok(None) => ApiError::new(
            "property_not_found",
            "property not found",
            StatusCode::NOT_FOUND,
        )
        .into_response(),
        Err(e) => {
            log::error!("failed to get property: {}", e);
            ApiError::internal("failed_to_get_property", "failed to get property").into_response()
        }
    }
}

pub async fn delete_property(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    log::info!("delete property: id={}", id);
    match state.properties.delete_property(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            log::error!("failed to delete property: {}", e);
            ApiError::internal("failed_to_delete_property", "failed to delete property")
                .into_response()
        }
    }
}

pub async fn list_properties(State(state): State<AppState>) -> Response {
    match state.properties.list_properties().await {
        Ok(properties) => Json(properties).into_response(),
        Err(e) => {
            log::error!("failed to list properties: {}", e);
            ApiError::internal("failed_to_get_properties", "failed to get properties")
                .into_response()
        }
    }
}
