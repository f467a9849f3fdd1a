//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;

use boxoffice_api::{AppState, build_app};
use boxoffice_core::config::{AppConfig, StoreProvider};
use boxoffice_database::store::BookingStore;
use boxoffice_database::store::memory::MemoryBookingStore;
use boxoffice_entity::event::Event;
use boxoffice_entity::seat::Seat;
use boxoffice_entity::user::User;
use boxoffice_lock::LockManager;
use boxoffice_lock::memory::MemoryLockCoordinator;

/// Secret shared by the test app and the tokens it accepts.
pub const JWT_SECRET: &str = "integration-test-secret";

/// Test application context backed by in-memory store and locks.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Direct access to seeded rows
    pub store: Arc<MemoryBookingStore>,
    /// Seeded event
    pub event: Event,
    /// Four seats of the seeded event, A1 to A4
    pub seats: Vec<Seat>,
    /// First customer
    pub alice: User,
    /// Second customer
    pub bob: User,
}

impl TestApp {
    /// Create a new test application with one event of four seats.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = JWT_SECRET.to_string();
        config.store.provider = StoreProvider::Memory;

        let store = Arc::new(MemoryBookingStore::new());
        let event = store.insert_event("Evening Concert");
        let seats = (1..=4)
            .map(|n| store.insert_seat(event.id, &format!("A{n}")))
            .collect();
        let alice = store.insert_user("alice@example.com");
        let bob = store.insert_user("bob@example.com");

        let locks = LockManager::from_coordinator(Arc::new(MemoryLockCoordinator::new()));
        let cors = config.server.cors.clone();
        let state = AppState::new(
            Arc::new(config),
            Arc::clone(&store) as Arc<dyn BookingStore>,
            locks,
        );

        Self {
            router: build_app(state, &cors),
            store,
            event,
            seats,
            alice,
            bob,
        }
    }

    /// Mint a bearer token for a user.
    pub fn token_for(&self, user: &User) -> String {
        mint_token(&user.email, Utc::now().timestamp() + 3600)
    }

    /// Raw ID of the n-th seeded seat.
    pub fn seat(&self, index: usize) -> i64 {
        self.seats[index].id.get()
    }

    /// Send a JSON request through the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Serve the router on an ephemeral local port.
    pub async fn serve(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });
        addr
    }
}

/// Sign an HS256 token with the test secret.
pub fn mint_token(sub: &str, exp: i64) -> String {
    let claims = serde_json::json!({ "sub": sub, "exp": exp, "iat": Utc::now().timestamp() });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
