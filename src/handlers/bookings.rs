use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, RepositoryError};
use crate::handlers::AppState;
use crate::models::{BookingFilter, NewBooking};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Request body for creating a booking. Dates are calendar days in UTC,
/// formatted YYYY-MM-DD; the checkout day itself is not occupied.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub property_id: String,
    #[serde(default)]
    pub guest_id: String,
    #[serde(default)]
    pub check_in_date: String,
    #[serde(default)]
    pub check_out_date: String,
    #[serde(default)]
    pub total_price_cents: i64,
    #[serde(default)]
    pub currency: String,
}

pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateBookingRequest>,
) -> Response {
    if req.property_id.is_empty()
        || req.guest_id.is_empty()
        || req.check_in_date.is_empty()
        || req.check_out_date.is_empty()
    {
        return ApiError::new(
            "missing_required_fields",
            "missing required fields",
            StatusCode::BAD_REQUEST,
        )
        .into_response();
    }

    log::info!(
        "create booking: property_id={} guest_id={}",
        req.property_id,
        req.guest_id
    );

    // Guests only book for themselves.
    if user.0 != req.guest_id {
        log::warn!(
            "guest_id differs from token subject: guest_id={} subject={}",
            req.guest_id,
            user.0
        );
        return ApiError::unauthorized().into_response();
    }

    let property_id = match Uuid::parse_str(&req.property_id) {
        Ok(id) => id,
        Err(_) => {
            return ApiError::new(
                "invalid_property_id",
                "invalid property id",
                StatusCode::BAD_REQUEST,
            )
            .into_response()
        }
    };

    let (check_in_date, check_out_date) = match (
        NaiveDate::parse_from_str(&req.check_in_date, DATE_FORMAT),
        NaiveDate::parse_from_str(&req.check_out_date, DATE_FORMAT),
    ) {
        (Ok(check_in), Ok(check_out)) => (check_in, check_out),
        _ => {
            return ApiError::new(
                "invalid_date_format",
                "invalid date format. Expected YYYY-MM-DD",
                StatusCode::BAD_REQUEST,
            )
            .into_response()
        }
    };

    let candidate = NewBooking {
        property_id,
        guest_id: req.guest_id,
        check_in_date,
        check_out_date,
        total_price_cents: req.total_price_cents,
        currency: req.currency,
    };

    match state.bookings.create_booking(candidate).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(RepositoryError::Validation(message)) => {
            ApiError::new("invalid_booking", message, StatusCode::BAD_REQUEST).into_response()
        }
        Err(RepositoryError::Overlap) => ApiError::new(
            "booking_overlaps",
            "booking dates overlap an existing booking",
            StatusCode::CONFLICT,
        )
        .into_response(),
        Err(RepositoryError::PropertyNotFound) => ApiError::new(
            "property_not_found",
            "property does not exist",
            StatusCode::NOT_FOUND,
        )
        .into_response(),
        Err(e) => {
            log::error!("failed to create booking: {}", e);
            ApiError::internal("failed_to_create_booking", "failed to create booking")
                .into_response()
        }
    }
}

pub async fn get_booking(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    log::info!("get booking: id={}", id);
    match state.bookings.get_booking(&id).await {
        Ok(Some(booking)) => Json(booking).into_response(),
        Ok(None) => ApiError::new(
            "booking_not_found",
            "booking not found",
            StatusCode::NOT_FOUND,
        )
        .into_response(),
        Err(e) => {
            log::error!("failed to get booking: {}", e);
            ApiError::internal("failed_to_get_booking", "failed to get booking").into_response()
        }
    }
}

pub async fn delete_booking(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    log::info!("delete booking: id={}", id);
    match state.bookings.delete_booking(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            log::error!("failed to delete booking: {}", e);
            ApiError::internal("failed_to_delete_booking", "failed to delete booking")
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub property_id: Option<String>,
    pub guest_id: Option<String>,
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<BookingsQuery>,
) -> Response {
    log::info!(
        "list bookings: property_id={:?} guest_id={:?}",
        query.property_id,
        query.guest_id
    );

    // A guest may only list their own bookings.
    if let Some(guest_id) = query.guest_id.as_deref().filter(|s| !s.is_empty()) {
        if guest_id != user.0 {
            log::warn!(
                "guest_id filter differs from token subject: guest_id={} subject={}",
                guest_id,
                user.0
            );
            return ApiError::unauthorized().into_response();
        }
    }

    let filter = BookingFilter {
        property_id: query.property_id,
        guest_id: query.guest_id,
    };

    match state.bookings.list_bookings(filter).await {
        Ok(bookings) => Json(bookings).into_response(),
        Err(e) => {
            log::error!("failed to list bookings: {}", e);
            ApiError::internal("failed_to_get_bookings", "failed to get bookings").into_response()
        }
    }
}
