//! Integration tests for the hold, confirm, release and cancel endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use boxoffice_entity::booking::BookingStatus;

#[tokio::test]
async fn test_hold_requires_token() {
    let app = helpers::TestApp::new();

    let body = json!({ "event_id": app.event.id, "seat_id": app.seat(0) });
    let response = app.request("POST", "/hold", Some(body), None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_hold_rejects_bad_tokens() {
    let app = helpers::TestApp::new();
    let body = json!({ "event_id": app.event.id, "seat_id": app.seat(0) });

    let response = app
        .request("POST", "/hold", Some(body.clone()), Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let expired = helpers::mint_token("alice@example.com", 1_000);
    let response = app
        .request("POST", "/hold", Some(body.clone()), Some(&expired))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let stranger = helpers::mint_token("nobody@example.com", chrono::Utc::now().timestamp() + 60);
    let response = app
        .request("POST", "/hold", Some(body), Some(&stranger))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Could not validate credentials");
}

#[tokio::test]
async fn test_hold_then_conflict() {
    let app = helpers::TestApp::new();
    let alice = app.token_for(&app.alice);
    let bob = app.token_for(&app.bob);
    let body = json!({ "event_id": app.event.id, "seat_id": app.seat(0) });

    let response = app
        .request("POST", "/hold", Some(body.clone()), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Seat successfully held for 5 minutes");
    let expiry = response.body["hold_expires_at"].as_str().unwrap();
    assert!(expiry.ends_with('Z'));
    assert_eq!(expiry.len(), "2025-01-01T00:00:00Z".len());

    let response = app
        .request("POST", "/hold", Some(body.clone()), Some(&alice))
        .await;
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "You already have this seat on hold");

    let response = app.request("POST", "/hold", Some(body), Some(&bob)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], false);
    assert_eq!(
        response.body["message"],
        "This seat is currently held by another user"
    );
}

#[tokio::test]
async fn test_hold_seat_of_other_event() {
    let app = helpers::TestApp::new();
    let other = app.store.insert_event("Matinee");
    let token = app.token_for(&app.alice);

    let body = json!({ "event_id": other.id, "seat_id": app.seat(0) });
    let response = app.request("POST", "/hold", Some(body), Some(&token)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Seat does not belong to this event");
}

#[tokio::test]
async fn test_hold_multiple_validation() {
    let app = helpers::TestApp::new();
    let token = app.token_for(&app.alice);

    let too_many: Vec<i64> = (1..=11).collect();
    let response = app
        .request(
            "POST",
            "/hold-multiple",
            Some(json!({ "event_id": app.event.id, "seat_ids": too_many })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(
        response.body["message"],
        "Cannot hold more than 10 seats at once"
    );

    let response = app
        .request(
            "POST",
            "/hold-multiple",
            Some(json!({ "event_id": app.event.id, "seat_ids": [] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "No seats provided");
}

#[tokio::test]
async fn test_hold_multiple_all_or_nothing() {
    let app = helpers::TestApp::new();
    let alice = app.token_for(&app.alice);
    let bob = app.token_for(&app.bob);

    let response = app
        .request(
            "POST",
            "/hold",
            Some(json!({ "event_id": app.event.id, "seat_id": app.seat(1) })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.body["success"], true);

    let response = app
        .request(
            "POST",
            "/hold-multiple",
            Some(json!({
                "event_id": app.event.id,
                "seat_ids": [app.seat(0), app.seat(1), app.seat(2)],
            })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["held_seats"], json!([]));
    assert_eq!(response.body["failed_seats"][0]["seat_id"], app.seat(1));
    assert_eq!(
        response.body["failed_seats"][0]["reason"],
        "held_by_another_user"
    );

    // Nothing from the failed batch is left held by alice.
    let response = app
        .request(
            "GET",
            &format!("/my-holds/{}", app.event.id),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.body["held_seats"], json!([]));

    let response = app
        .request(
            "GET",
            &format!("/events/{}/seats/fast", app.event.id),
            None,
            None,
        )
        .await;
    let statuses: Vec<&str> = response.body["seats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["available", "held", "available", "available"]);
}

#[tokio::test]
async fn test_hold_confirm_cancel_flow() {
    let app = helpers::TestApp::new();
    let alice = app.token_for(&app.alice);
    let bob = app.token_for(&app.bob);
    let wanted = json!([app.seat(0), app.seat(1)]);

    let response = app
        .request(
            "POST",
            "/hold-multiple",
            Some(json!({ "event_id": app.event.id, "seat_ids": wanted })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Successfully held 2 seat(s) for 5 minutes");
    assert_eq!(response.body["held_seats"], wanted);

    let response = app
        .request(
            "GET",
            &format!("/my-holds/{}", app.event.id),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let held = response.body["held_seats"].as_array().unwrap();
    assert_eq!(held.len(), 2);
    assert_eq!(held[0]["seat_number"], "A1");
    assert!(held[0]["expires_in_seconds"].as_u64().unwrap() > 0);

    let response = app
        .request(
            "POST",
            "/confirm",
            Some(json!({ "seat_ids": wanted })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Successfully confirmed 2 booking(s)");
    assert_eq!(response.body["confirmed_seats"], wanted);
    assert_eq!(app.store.bookings().len(), 2);

    let response = app.request("GET", "/my-bookings", None, Some(&alice)).await;
    let bookings = response.body.as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0]["status"], "confirmed");
    let booking_id = bookings[0]["id"].as_i64().unwrap();

    let response = app
        .request(
            "POST",
            &format!("/cancel-booking/{booking_id}"),
            None,
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            &format!("/cancel-booking/{booking_id}"),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Booking cancelled successfully");
    assert_eq!(response.body["booking_id"], booking_id);

    let response = app
        .request(
            "POST",
            &format!("/cancel-booking/{booking_id}"),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_STATE");

    let cancelled = app
        .store
        .bookings()
        .into_iter()
        .filter(|b| b.status == BookingStatus::Cancelled)
        .count();
    assert_eq!(cancelled, 1);
}

#[tokio::test]
async fn test_confirm_reports_unheld_seats() {
    let app = helpers::TestApp::new();
    let alice = app.token_for(&app.alice);

    app.request(
        "POST",
        "/hold",
        Some(json!({ "event_id": app.event.id, "seat_id": app.seat(0) })),
        Some(&alice),
    )
    .await;

    let response = app
        .request(
            "POST",
            "/confirm",
            Some(json!({ "seat_ids": [app.seat(0), app.seat(2)] })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], "Confirmed 1 seat(s), failed 1");
    assert_eq!(response.body["confirmed_seats"], json!([app.seat(0)]));
    assert_eq!(response.body["failed_seats"][0]["seat_id"], app.seat(2));
    assert_eq!(
        response.body["failed_seats"][0]["reason"],
        "not_held_by_caller"
    );
}

#[tokio::test]
async fn test_confirm_requires_seats() {
    let app = helpers::TestApp::new();
    let alice = app.token_for(&app.alice);

    let response = app
        .request("POST", "/confirm", Some(json!({ "seat_ids": [] })), Some(&alice))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "No seats provided");
    assert!(response.body.get("details").is_some());
}

#[tokio::test]
async fn test_release_returns_seat_to_sale() {
    let app = helpers::TestApp::new();
    let alice = app.token_for(&app.alice);
    let bob = app.token_for(&app.bob);
    let hold = json!({ "event_id": app.event.id, "seat_id": app.seat(3) });

    app.request("POST", "/hold", Some(hold.clone()), Some(&alice))
        .await;

    let response = app
        .request(
            "POST",
            "/release",
            Some(json!({ "seat_ids": [app.seat(3)] })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Released 1 seat(s)");
    assert_eq!(response.body["released_seats"], json!([app.seat(3)]));

    let response = app.request("POST", "/hold", Some(hold), Some(&bob)).await;
    assert_eq!(response.body["success"], true);
}

#[tokio::test]
async fn test_cancel_unknown_and_malformed_booking() {
    let app = helpers::TestApp::new();
    let alice = app.token_for(&app.alice);

    let response = app
        .request("POST", "/cancel-booking/9999", None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("POST", "/cancel-booking/abc", None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
