use super::{ack, with_payload, ApiJson, AppState};
use crate::{
    errors::ServiceError,
    services::{
        paintings::{NewComment, NewPainting, UpdatePainting},
        parse_id,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

/// Body of a like request.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LikeRequest {
    pub user_id: Option<String>,
}

async fn add_painting(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewPainting>,
) -> Result<impl IntoResponse, ServiceError> {
    let painting = state.services.paintings.add(payload).await?;
    Ok((
        StatusCode::CREATED,
        with_payload("Painting added successfully", "painting", painting)?,
    ))
}

async fn list_paintings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.paintings.list().await?))
}

async fn get_painting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "Painting")?;
    Ok(Json(state.services.paintings.get(id).await?))
}

async fn update_painting(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdatePainting>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "Painting")?;
    let painting = state.services.paintings.update_by_id(id, payload).await?;
    with_payload("Painting updated successfully", "painting", painting)
}

async fn delete_painting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "Painting")?;
    state.services.paintings.soft_delete(id).await?;
    Ok(ack("Painting deleted successfully"))
}

async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<NewComment>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "Painting")?;
    let painting = state.services.paintings.add_comment(id, payload).await?;
    Ok((
        StatusCode::CREATED,
        with_payload("Comment added", "comments", painting.comments)?,
    ))
}

async fn like_painting(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<LikeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "Painting")?;
    let user_id = payload.user_id.ok_or(ServiceError::MissingField)?;
    let painting = state.services.paintings.like(id, &user_id).await?;
    with_payload("Painting liked", "likes", painting.likes)
}

async fn unlike_painting(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_id(&id, "Painting")?;
    let painting = state.services.paintings.unlike(id, &user_id).await?;
    with_payload("Like removed", "likes", painting.likes)
}

/// Mounted at `/api/paintings`.
pub fn painting_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_painting))
        .route("/getAll", get(list_paintings))
        .route("/getById/:id", get(get_painting))
        .route("/updateById/:id", put(update_painting))
        .route("/deleteById/:id", delete(delete_painting))
        .route("/:id/comments", post(add_comment))
        .route("/:id/likes", post(like_painting))
        .route("/:id/likes/:user_id", delete(unlike_painting))
}
