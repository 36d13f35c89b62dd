use super::{ack, with_payload, ApiJson, AppState};
use crate::{
    errors::ServiceError,
    services::{
        accounts::{LoginRequest, RegisterAccount},
        artists::UpdateArtist,
        parse_id,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

async fn register_artist(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterAccount>,
) -> Result<impl IntoResponse, ServiceError> {
    let artist = state.services.artists.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        with_payload("Artist registered successfully", "artist", artist)?,
    ))
}

async fn login_artist(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state.services.artists.login(payload).await?;
    Ok(Json(json!({
        "message": "Login successful",
        "token": outcome.token,
        "artist": outcome.profile,
    })))
}

async fn list_artists(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.artists.list().await?))
}

async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "Artist")?;
    Ok(Json(state.services.artists.get(id).await?))
}

async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateArtist>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "Artist")?;
    let artist = state.services.artists.update(id, payload).await?;
    with_payload("Artist updated successfully", "artist", artist)
}

async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "Artist")?;
    state.services.artists.soft_delete(id).await?;
    Ok(ack("Artist deleted successfully"))
}

/// Mounted at `/api/artists`.
pub fn artist_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_artist))
        .route("/login", post(login_artist))
        .route("/", get(list_artists))
        .route(
            "/:id",
            get(get_artist).put(update_artist).delete(delete_artist),
        )
}
