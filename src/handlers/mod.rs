pub mod artists;
mod extract;
pub mod health;
pub mod orders;
pub mod paintings;
pub mod users;

use crate::{
    auth::TokenIssuer,
    db::DbPool,
    services::{
        artists::ArtistService, order_status::TransitionPolicy, orders::OrderService,
        paintings::PaintingService, users::UserService,
    },
};
use axum::Json;
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub use extract::ApiJson;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService>,
    pub artists: Arc<ArtistService>,
    pub paintings: Arc<PaintingService>,
    pub orders: Arc<OrderService>,
}

impl AppServices {
    /// Builds every service over the one shared pool.
    pub fn new(db_pool: Arc<DbPool>, tokens: TokenIssuer, policy: TransitionPolicy) -> Self {
        Self {
            users: Arc::new(UserService::new(db_pool.clone(), tokens.clone())),
            artists: Arc::new(ArtistService::new(db_pool.clone(), tokens)),
            paintings: Arc::new(PaintingService::new(db_pool.clone())),
            orders: Arc::new(OrderService::new(db_pool, policy)),
        }
    }
}

/// `{message}` acknowledgement body.
pub(crate) fn ack(message: &str) -> Json<Value> {
    Json(json!({ "message": message }))
}

/// `{message, <key>: payload}` body.
pub(crate) fn with_payload<T: serde::Serialize>(
    message: &str,
    key: &str,
    payload: T,
) -> Result<Json<Value>, crate::errors::ServiceError> {
    let payload = serde_json::to_value(payload)
        .map_err(|e| crate::errors::ServiceError::InternalError(e.to_string()))?;
    let mut body = Map::new();
    body.insert("message".to_string(), Value::String(message.to_string()));
    body.insert(key.to_string(), payload);
    Ok(Json(Value::Object(body)))
}
