//! Order placement, lookup, cancellation and lifecycle endpoints.

use std::sync::Arc;

use application::{CancelOrder, CancellationOutcome, CreateOrder, OrderTransition};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use domain::{
    Aggregate, CustomerId, Order, OrderId, OrderItemId, OrderStatus, ProductId,
    StandardOrderPolicy, StoreId,
};
use repository::OrderRepository;
use serde::{Deserialize, Serialize};

use super::{MoneyBody, parse_id};
use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub store_id: String,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Deserialize)]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct CancelOrderRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub customer_id: Option<String>,
    pub status: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub store_id: StoreId,
    pub status: OrderStatus,
    pub items: Vec<OrderItemResponse>,
    pub total: MoneyBody,
    pub placed_at: DateTime<Utc>,
    pub cancellation_reason: Option<String>,
    pub estimated_preparation_minutes: u32,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: MoneyBody,
    pub total: MoneyBody,
}

impl OrderResponse {
    fn from_order(order: &Order) -> Result<Self, ApiError> {
        let items = order
            .items()
            .iter()
            .map(|item| {
                Ok(OrderItemResponse {
                    id: item.id(),
                    product_id: item.product_id(),
                    name: item.name().to_string(),
                    quantity: item.quantity(),
                    unit_price: MoneyBody::from(item.unit_price()),
                    total: MoneyBody::from(&item.total()?),
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(Self {
            id: order.id(),
            customer_id: order.customer_id(),
            store_id: order.store_id(),
            status: order.status(),
            items,
            total: MoneyBody::from(order.total_amount()),
            placed_at: order.placed_at(),
            cancellation_reason: order.cancellation_reason().map(String::from),
            estimated_preparation_minutes: StandardOrderPolicy::new()
                .estimated_preparation_minutes(order),
        })
    }
}

#[derive(Serialize)]
pub struct CancellationResponse {
    pub order: OrderResponse,
    pub released: Vec<ReleaseResponse>,
    pub failed_releases: Vec<FailedReleaseResponse>,
}

#[derive(Serialize)]
pub struct ReleaseResponse {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct FailedReleaseResponse {
    pub product_id: ProductId,
    pub quantity: u32,
    pub error: String,
}

impl CancellationResponse {
    fn from_outcome(outcome: CancellationOutcome) -> Result<Self, ApiError> {
        Ok(Self {
            order: OrderResponse::from_order(&outcome.order)?,
            released: outcome
                .released
                .into_iter()
                .map(|r| ReleaseResponse {
                    product_id: r.product_id,
                    quantity: r.quantity,
                })
                .collect(),
            failed_releases: outcome
                .failed_releases
                .into_iter()
                .map(|f| FailedReleaseResponse {
                    product_id: f.product_id,
                    quantity: f.quantity,
                    error: f.error,
                })
                .collect(),
        })
    }
}

// -- Handlers --

/// POST /orders: reserve stock and confirm in one step.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let customer_id: CustomerId = parse_id(&req.customer_id, "customer_id")?;
    let store_id: StoreId = parse_id(&req.store_id, "store_id")?;

    let mut cmd = CreateOrder::new(customer_id, store_id);
    for line in &req.items {
        let product_id: ProductId = parse_id(&line.product_id, "product_id")?;
        cmd = cmd.with_item(product_id, line.quantity);
    }

    let order = state.orders.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from_order(&order)?)))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id: OrderId = parse_id(&id, "order id")?;
    let order = state.repositories.orders.find_by_id(order_id).await?;
    Ok(Json(OrderResponse::from_order(&order)?))
}

/// GET /orders?customer_id=..&status=..
///
/// At least one filter is required; both may be combined.
#[tracing::instrument(skip(state, query))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let orders = match (query.customer_id.as_deref(), status) {
        (Some(raw), status) => {
            let customer_id: CustomerId = parse_id(raw, "customer_id")?;
            let orders = state.repositories.orders.find_by_customer(customer_id).await?;
            orders
                .into_iter()
                .filter(|o| status.is_none_or(|s| o.status() == s))
                .collect()
        }
        (None, Some(status)) => state.repositories.orders.find_by_status(status).await?,
        (None, None) => {
            return Err(ApiError::BadRequest(
                "customer_id or status query parameter is required".to_string(),
            ));
        }
    };

    let responses = orders
        .iter()
        .map(OrderResponse::from_order)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(responses))
}

/// POST /orders/{id}/cancel
#[tracing::instrument(skip(state, req))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    req: Option<Json<CancelOrderRequest>>,
) -> Result<Json<CancellationResponse>, ApiError> {
    let order_id: OrderId = parse_id(&id, "order id")?;
    let reason = req
        .map(|Json(body)| body.reason)
        .filter(|reason| !reason.trim().is_empty())
        .unwrap_or_else(|| "cancelled by request".to_string());

    let outcome = state
        .cancellations
        .handle(CancelOrder::new(order_id, reason))
        .await?;
    Ok(Json(CancellationResponse::from_outcome(outcome)?))
}

/// POST /orders/{id}/prepare
pub async fn prepare(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    advance(&state, &id, OrderTransition::StartPreparing).await
}

/// POST /orders/{id}/ready
pub async fn ready(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    advance(&state, &id, OrderTransition::MarkReady).await
}

/// POST /orders/{id}/complete
pub async fn complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    advance(&state, &id, OrderTransition::Complete).await
}

#[tracing::instrument(skip(state))]
async fn advance(
    state: &AppState,
    id: &str,
    transition: OrderTransition,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id: OrderId = parse_id(id, "order id")?;
    let order = state.lifecycle.handle(order_id, transition).await?;
    Ok(Json(OrderResponse::from_order(&order)?))
}
