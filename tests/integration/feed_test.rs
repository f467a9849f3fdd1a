//! Integration tests for the seat listing and the live WebSocket feed.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn next_message(ws: &mut Socket) -> Message {
    tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timed out waiting for a frame")
        .expect("Socket closed")
        .expect("Socket error")
}

async fn next_json(ws: &mut Socket) -> Value {
    let msg = next_message(ws).await;
    serde_json::from_str(msg.to_text().expect("Expected a text frame")).expect("Invalid JSON frame")
}

#[tokio::test]
async fn test_fast_seat_listing() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "GET",
            &format!("/events/{}/seats/fast", app.event.id),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["event_id"], app.event.id.get());
    let seats = response.body["seats"].as_array().unwrap();
    assert_eq!(seats.len(), 4);
    assert_eq!(
        seats[0],
        json!({ "id": app.seat(0), "seat_number": "A1", "status": "available" })
    );
}

#[tokio::test]
async fn test_fast_seat_listing_unknown_event() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/events/9999/seats/fast", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Event not found");
}

#[tokio::test]
async fn test_feed_snapshot_pong_and_updates() {
    let app = helpers::TestApp::new();
    let addr = app.serve().await;

    let url = format!("ws://{addr}/ws/events/{}", app.event.id);
    let (mut ws, _) = connect_async(url).await.expect("Failed to connect");

    let initial = next_json(&mut ws).await;
    assert_eq!(initial["type"], "initial");
    assert_eq!(initial["event_id"], app.event.id.get());
    assert_eq!(initial["event_name"], "Evening Concert");
    assert_eq!(initial["seats"].as_array().unwrap().len(), 4);

    ws.send(Message::Text("ping".into())).await.unwrap();
    assert_eq!(next_json(&mut ws).await, json!({ "type": "pong" }));

    let alice = app.token_for(&app.alice);
    let response = app
        .request(
            "POST",
            "/hold",
            Some(json!({ "event_id": app.event.id, "seat_id": app.seat(2) })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.body["success"], true);

    let update = next_json(&mut ws).await;
    assert_eq!(update["type"], "seat_update");
    assert_eq!(update["seat_id"], app.seat(2));
    assert_eq!(update["seat_number"], "A3");
    assert_eq!(update["status"], "held");
    assert_eq!(update["user_id"], app.alice.id.get());

    app.request(
        "POST",
        "/release",
        Some(json!({ "seat_ids": [app.seat(2)] })),
        Some(&alice),
    )
    .await;

    let update = next_json(&mut ws).await;
    assert_eq!(update["status"], "available");
    assert!(update.get("user_id").is_none());

    ws.close(None).await.unwrap();
}

#[tokio::test]
async fn test_feed_unknown_event_closes_with_policy_violation() {
    let app = helpers::TestApp::new();
    let addr = app.serve().await;

    let (mut ws, _) = connect_async(format!("ws://{addr}/ws/events/9999"))
        .await
        .expect("Failed to connect");

    match next_message(&mut ws).await {
        Message::Close(Some(frame)) => {
            assert_eq!(u16::from(frame.code), 1008);
            assert_eq!(frame.reason.as_str(), "Event not found");
        }
        other => panic!("Expected a close frame, got {other:?}"),
    }
}
