//! Order CRUD and status transition endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use common::{OrderId, OwnerId};
use domain::{Money, Order, ProductId};
use lifecycle::{InMemoryInventoryClient, OrderLifecycleService};
use serde::{Deserialize, Serialize};
use store::OrderStore;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub lifecycle: OrderLifecycleService<S, InMemoryInventoryClient>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub line_items: Vec<String>,
    pub total_price_cents: i64,
}

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub line_items: Vec<String>,
    pub total_price_cents: i64,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub owner_id: String,
    pub line_items: Vec<String>,
    pub status: String,
    pub total_price_cents: i64,
    pub created_date: String,
}

impl OrderResponse {
    fn from_order(order: &Order) -> Self {
        Self {
            id: order.id().map(|id| id.to_string()).unwrap_or_default(),
            owner_id: order.owner_id().to_string(),
            line_items: order
                .line_items()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            status: order.status().to_string(),
            total_price_cents: order.total_price().cents(),
            created_date: order.created_date().to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /orders — create a new Pending order for the caller.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderResponse>), ApiError> {
    let owner_id = owner_from_headers(&headers)?;

    let line_items: Vec<ProductId> = req.line_items.into_iter().map(ProductId::from).collect();
    let order = state
        .lifecycle
        .create_order(owner_id, line_items, Money::from_cents(req.total_price_cents))
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(OrderResponse::from_order(&order)),
    ))
}

/// GET /orders — list the caller's orders.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let owner_id = owner_from_headers(&headers)?;

    let orders = state.lifecycle.list_orders_by_owner(owner_id).await?;
    let responses = orders.iter().map(OrderResponse::from_order).collect();
    Ok(Json(responses))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .lifecycle
        .get_order(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(OrderResponse::from_order(&order)))
}

/// PUT /orders/:id — replace a Pending order's line items and price.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;

    let line_items: Vec<ProductId> = req.line_items.into_iter().map(ProductId::from).collect();
    let order = state
        .lifecycle
        .update_line_items(order_id, line_items, Money::from_cents(req.total_price_cents))
        .await?;

    Ok(Json(OrderResponse::from_order(&order)))
}

/// PUT /orders/:id/status — move an order to the requested status.
#[tracing::instrument(skip(state, req))]
pub async fn set_status<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;

    let order = state
        .lifecycle
        .transition_status(order_id, &req.status)
        .await?;

    Ok(Json(OrderResponse::from_order(&order)))
}

/// DELETE /orders/:id — delete a Pending or Cancelled order.
#[tracing::instrument(skip(state))]
pub async fn remove<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ApiError> {
    let order_id = parse_order_id(&id)?;

    state.lifecycle.delete_order(order_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(OrderId::from(uuid))
}

/// Resolves the caller from the `x-owner-id` header.
///
/// Upstream auth middleware is expected to have verified the caller and
/// stamped this header; this service only needs the opaque owner id.
fn owner_from_headers(headers: &HeaderMap) -> Result<OwnerId, ApiError> {
    let raw = headers
        .get("x-owner-id")
        .ok_or_else(|| ApiError::BadRequest("Missing x-owner-id header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::BadRequest("Invalid x-owner-id header".to_string()))?;

    let uuid = uuid::Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid x-owner-id: {e}")))?;
    Ok(OwnerId::from(uuid))
}
