use super::{ack, with_payload, ApiJson, AppState};
use crate::{
    errors::ServiceError,
    services::{
        orders::{CancelOrder, NewOrder, OrderView, SetStatus},
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
use serde::Serialize;

/// `{orders: [...]}` list body.
#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<OrderView>,
}

async fn create_order(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewOrder>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        with_payload("Order placed successfully", "order", order)?,
    ))
}

async fn list_orders(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let orders = state.services.orders.list_all().await?;
    Ok(Json(OrderList { orders }))
}

async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let user_id = parse_id(&user_id, "User")?;
    let orders = state.services.orders.list_by_buyer(user_id).await?;
    Ok(Json(OrderList { orders }))
}

async fn list_artist_orders(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let artist_id = parse_id(&artist_id, "Artist")?;
    let orders = state.services.orders.list_by_artist(artist_id).await?;
    Ok(Json(OrderList { orders }))
}

async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    ApiJson(payload): ApiJson<SetStatus>,
) -> Result<impl IntoResponse, ServiceError> {
    let order_id = parse_id(&order_id, "Order")?;
    let order = state.services.orders.set_status(order_id, payload).await?;
    with_payload("Order status updated", "order", order)
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    payload: Option<ApiJson<CancelOrder>>,
) -> Result<impl IntoResponse, ServiceError> {
    let order_id = parse_id(&order_id, "Order")?;
    let payload = payload.map(|ApiJson(p)| p).unwrap_or_default();
    let order = state.services.orders.cancel(order_id, payload).await?;
    with_payload("Order cancelled successfully", "order", order)
}

async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let order_id = parse_id(&order_id, "Order")?;
    state.services.orders.soft_delete(order_id).await?;
    Ok(ack("Order deleted successfully"))
}

/// Mounted at `/api/orders`.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_order))
        .route("/getAll", get(list_orders))
        .route("/user/:user_id", get(list_user_orders))
        .route("/artist/:artist_id", get(list_artist_orders))
        .route("/updateStatus/:order_id", put(update_order_status))
        .route("/cancel/:order_id", put(cancel_order))
        .route("/delete/:order_id", delete(delete_order))
}
