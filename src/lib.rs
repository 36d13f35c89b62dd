//! ArtMart API Library
//!
//! Marketplace backend connecting buyers, artists and the paintings they
//! sell, with order placement and lifecycle tracking.

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod services;
pub mod validation;

use axum::{http::HeaderValue, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    auth::TokenIssuer, db::DbPool, errors::ServiceError,
    services::order_status::TransitionPolicy,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Wires every service from configuration. Fails when no signing secret is available.
    pub fn new(db: Arc<DbPool>, config: &config::AppConfig) -> Result<Self, ServiceError> {
        let secret = config.signing_secret().ok_or_else(|| {
            ServiceError::InternalError("JWT signing secret is not configured".to_string())
        })?;
        let ttl = chrono::Duration::seconds(config.jwt_expiration_secs as i64);
        let tokens = TokenIssuer::new(secret, ttl);
        let policy = TransitionPolicy::from_strict_flag(config.strict_order_transitions);
        info!(?policy, "Order transition policy selected");

        Ok(Self {
            services: handlers::AppServices::new(db.clone(), tokens, policy),
            db,
            config: config.clone(),
        })
    }
}

/// Resource routers under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", handlers::users::user_routes())
        .nest("/artists", handlers::artists::artist_routes())
        .nest("/paintings", handlers::paintings::painting_routes())
        .nest("/orders", handlers::orders::order_routes())
}

/// Full application router with the shared middleware stack applied.
pub fn build_router(state: AppState) -> Router {
    let cors_layer = cors_layer(&state.config);

    Router::new()
        .nest("/api", api_routes())
        .nest("/health", handlers::health::health_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

fn cors_layer(config: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        if !config.is_development() {
            warn!("No CORS origins configured; allowing any origin");
        }
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
