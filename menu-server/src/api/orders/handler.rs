//! Order API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::Order;

use crate::auth::Identity;
use crate::core::ServerState;
use crate::orders::PlaceOrderRequest;
use crate::utils::{AppResult, Json};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// Body of `PUT /api/orders/{id}`
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
}

/// POST /api/orders - 顾客下单 (服务端定价)
pub async fn place(
    State(state): State<ServerState>,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.order_service.place_order(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - 当前餐厅订单，最新在前
pub async fn list(
    State(state): State<ServerState>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let status = query.status.as_deref().filter(|s| !s.is_empty());
    let orders = state
        .order_service
        .list_orders(&identity, status, state.config.orders_list_limit)
        .await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.order_service.get_order(&identity, &id).await?;
    Ok(Json(order))
}

/// PUT /api/orders/{id} - 更新订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = state
        .order_service
        .update_status(&identity, &id, &body.status)
        .await?;
    Ok(Json(order))
}
