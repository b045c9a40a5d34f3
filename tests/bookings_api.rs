mod common;

use axum::http::StatusCode;
use serde_json::json;

use rental_booking_backend::models::NewProperty;
use rental_booking_backend::repository::PropertyRepository;

use common::{bearer, send, test_app};

async fn seed_property(repo: &rental_booking_backend::in_memory::InMemoryRepository) -> String {
    repo.create_property(NewProperty {
        host_id: "host-1".to_string(),
        title: "Test Property".to_string(),
        description: "Test Description".to_string(),
        price_per_night_cents: 10_000,
        currency: "USD".to_string(),
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn create_booking_returns_created_with_id() {
    let (app, repo) = test_app();
    let property_id = seed_property(&repo).await;
    let token = bearer("guest-1");

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({
            "property_id": property_id,
            "guest_id": "guest-1",
            "check_in_date": "2025-01-01",
            "check_out_date": "2025-01-04",
            "total_price_cents": 30_000,
            "currency": "USD",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let (status, fetched) = send(&app, "GET", &format!("/bookings/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], json!(id));
    assert_eq!(fetched["property_id"], json!(property_id));
    assert_eq!(fetched["guest_id"], json!("guest-1"));
    assert_eq!(fetched["check_in_date"], json!("2025-01-01"));
    assert_eq!(fetched["check_out_date"], json!("2025-01-04"));
    assert_eq!(fetched["total_price_cents"], json!(30_000));
    assert_eq!(fetched["currency"], json!("USD"));
}

#[tokio::test]
async fn missing_required_fields_are_rejected() {
    let (app, _repo) = test_app();
    let token = bearer("guest-1");

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({ "guest_id": "guest-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("missing_required_fields"));
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    let (app, repo) = test_app();
    let property_id = seed_property(&repo).await;
    let token = bearer("guest-1");

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({
            "property_id": property_id,
            "guest_id": "guest-1",
            "check_in_date": "01/01/2025",
            "check_out_date": "2025-01-04",
            "total_price_cents": 30_000,
            "currency": "USD",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_date_format"));
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
    let (app, _repo) = test_app();

    let (status, body) = send(&app, "GET", "/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("unauthorized"));

    let (status, _) = send(&app, "GET", "/bookings", Some("Bearer garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_for_another_guest_is_unauthorized() {
    let (app, repo) = test_app();
    let property_id = seed_property(&repo).await;
    let token = bearer("guest-1");

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({
            "property_id": property_id,
            "guest_id": "someone-else",
            "check_in_date": "2025-01-01",
            "check_out_date": "2025-01-04",
            "total_price_cents": 30_000,
            "currency": "USD",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("unauthorized"));
}

#[tokio::test]
async fn overlapping_booking_is_a_conflict() {
    let (app, repo) = test_app();
    let property_id = seed_property(&repo).await;
    let token = bearer("guest-1");

    let first = json!({
        "property_id": property_id,
        "guest_id": "guest-1",
        "check_in_date": "2025-01-05",
        "check_out_date": "2025-01-14",
        "total_price_cents": 90_000,
        "currency": "USD",
    });
    let (status, _) = send(&app, "POST", "/bookings", Some(&token), Some(first)).await;
    assert_eq!(status, StatusCode::CREATED);

    let overlapping = json!({
        "property_id": property_id,
        "guest_id": "guest-1",
        "check_in_date": "2025-01-13",
        "check_out_date": "2025-01-16",
        "total_price_cents": 30_000,
        "currency": "USD",
    });
    let (status, body) = send(&app, "POST", "/bookings", Some(&token), Some(overlapping)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("booking_overlaps"));

    // Boundary-touching range still goes through.
    let touching = json!({
        "property_id": property_id,
        "guest_id": "guest-1",
        "check_in_date": "2025-01-14",
        "check_out_date": "2025-01-15",
        "total_price_cents": 10_000,
        "currency": "USD",
    });
    let (status, _) = send(&app, "POST", "/bookings", Some(&token), Some(touching)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn booking_against_unknown_property_is_not_found() {
    let (app, _repo) = test_app();
    let token = bearer("guest-1");

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({
            "property_id": uuid::Uuid::new_v4().to_string(),
            "guest_id": "guest-1",
            "check_in_date": "2025-01-01",
            "check_out_date": "2025-01-04",
            "total_price_cents": 30_000,
            "currency": "USD",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("property_not_found"));
}

#[tokio::test]
async fn getting_a_missing_booking_is_not_found() {
    let (app, _repo) = test_app();
    let token = bearer("guest-1");

    let uri = format!("/bookings/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("booking_not_found"));
}

#[tokio::test]
async fn delete_booking_is_idempotent_at_the_boundary() {
    let (app, repo) = test_app();
    let property_id = seed_property(&repo).await;
    let token = bearer("guest-1");

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({
            "property_id": property_id,
            "guest_id": "guest-1",
            "check_in_date": "2025-01-01",
            "check_out_date": "2025-01-04",
            "total_price_cents": 30_000,
            "currency": "USD",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let uri = format!("/bookings/{id}");
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Deleting again still succeeds silently.
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_anothers_bookings_is_unauthorized() {
    let (app, _repo) = test_app();
    let token = bearer("guest-1");

    let (status, body) = send(
        &app,
        "GET",
        "/bookings?guest_id=someone-else",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("unauthorized"));
}

#[tokio::test]
async fn listing_returns_an_empty_array_when_nothing_matches() {
    let (app, repo) = test_app();
    let property_id = seed_property(&repo).await;
    let token = bearer("guest-1");

    let uri = format!("/bookings?property_id={property_id}");
    let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
