use super::{ack, with_payload, ApiJson, AppState};
use crate::{
    errors::ServiceError,
    services::{
        accounts::{LoginRequest, RegisterAccount},
        parse_id,
        users::UpdateUser,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

async fn register_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterAccount>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        with_payload("User registered successfully", "user", user)?,
    ))
}

async fn login_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state.services.users.login(payload).await?;
    Ok(Json(json!({
        "message": "Login successful",
        "token": outcome.token,
        "user": outcome.profile,
    })))
}

async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let users = state.services.users.list().await?;
    Ok(Json(users))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "User")?;
    let user = state.services.users.get(id).await?;
    Ok(Json(user))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "User")?;
    let user = state.services.users.update(id, payload).await?;
    with_payload("User updated", "user", user)
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "User")?;
    state.services.users.soft_delete(id).await?;
    Ok(ack("User deleted (soft delete)"))
}

async fn restore_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "User")?;
    state.services.users.restore(id).await?;
    Ok(ack("User restored"))
}

/// Mounted at `/api/users`.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/restore", put(restore_user))
}
