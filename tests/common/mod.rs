#![allow(dead_code)]

use std::sync::Arc;

use artmart_api::{
    build_router,
    config::AppConfig,
    db::{self, DbConfig},
    AppState,
};
use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";

/// Helper harness for spinning up the application over an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestApp::new`], letting the caller adjust configuration first.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            Some(TEST_SECRET.to_string()),
            "test".to_string(),
        );
        adjust(&mut cfg);

        let pool = db::establish_connection_with_config(&DbConfig::in_memory_sqlite())
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), &cfg).expect("app state for tests");
        let router = build_router(state.clone());

        Self { router, state }
    }

    /// Send a request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Registers Asha the artist and returns her id.
    pub async fn seed_artist(&self) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/artists/register",
                Some(json!({
                    "name": "Asha",
                    "email": "a@x.com",
                    "phone": "9123456789",
                    "password": "pw",
                    "bio": "Watercolours of the backwaters",
                    "address": { "state": "Kerala", "pin": "682001", "country": "India" }
                })),
            )
            .await;
        assert_eq!(response.status(), 201, "seed artist");
        let body = response_json(response).await;
        body["artist"]["id"].as_str().expect("artist id").to_string()
    }

    /// Registers a buyer with the given email and phone and returns the id.
    pub async fn seed_user(&self, email: &str, phone: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/users/register",
                Some(json!({
                    "name": "Ravi",
                    "email": email,
                    "phone": phone,
                    "password": "secret",
                    "address": {
                        "street": "MG Road",
                        "state": "Karnataka",
                        "pin": "560001",
                        "country": "India"
                    }
                })),
            )
            .await;
        assert_eq!(response.status(), 201, "seed user");
        let body = response_json(response).await;
        body["user"]["id"].as_str().expect("user id").to_string()
    }

    /// Adds a painting for `artist_id` and returns its id.
    pub async fn seed_painting(&self, artist_id: &str, price: u32, discount: u32) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/paintings/add",
                Some(json!({
                    "title": "Monsoon",
                    "description": "Rain over the paddy fields",
                    "imageURLs": ["https://img.example/monsoon.jpg"],
                    "price": price,
                    "discount": discount,
                    "seasonOrFestival": "Summer",
                    "artistId": artist_id,
                })),
            )
            .await;
        assert_eq!(response.status(), 201, "seed painting");
        let body = response_json(response).await;
        body["painting"]["id"].as_str().expect("painting id").to_string()
    }

    /// Places a cash-on-delivery order, returning the status code and body.
    pub async fn place_order(&self, user_id: &str, artist_id: &str, items: Value) -> (u16, Value) {
        let response = self
            .request(
                Method::POST,
                "/api/orders/create",
                Some(json!({
                    "userId": user_id,
                    "artistId": artist_id,
                    "paintings": items,
                    "paymentMethod": "COD",
                    "shippingAddress": {
                        "name": "Ravi",
                        "phone": "9876543210",
                        "address": "12 MG Road",
                        "city": "Bengaluru",
                        "state": "Karnataka",
                        "pincode": "560001"
                    }
                })),
            )
            .await;
        let status = response.status().as_u16();
        (status, response_json(response).await)
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Reads a decimal that was serialized as a JSON string or number.
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("not a decimal: {other}"),
    }
}

/// A money value read back from a response, at two decimal places.
pub fn money(value: &Value) -> Decimal {
    decimal(value).round_dp(2)
}
