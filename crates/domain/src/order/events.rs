//! Order domain events.

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, StoreId};
use serde::{Deserialize, Serialize};

use super::{OrderItemSnapshot, OrderStatus};

pub const ORDER_CREATED: &str = "order.created";
pub const ORDER_CONFIRMED: &str = "order.confirmed";
pub const ORDER_CANCELLED: &str = "order.cancelled";
pub const ORDER_PREPARATION_STARTED: &str = "order.preparation_started";
pub const ORDER_READY: &str = "order.ready";
pub const ORDER_COMPLETED: &str = "order.completed";

/// Events that can occur on an order aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    /// Order was created.
    OrderCreated(OrderCreatedData),

    /// Order was confirmed with its reserved items.
    OrderConfirmed(OrderConfirmedData),

    /// Order was cancelled.
    OrderCancelled(OrderCancelledData),

    /// Store started preparing the order.
    OrderPreparationStarted(OrderPreparationStartedData),

    /// Order is ready for pickup.
    OrderReady(OrderReadyData),

    /// Order was handed over.
    OrderCompleted(OrderCompletedData),
}

impl OrderEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            OrderEvent::OrderCreated(_) => ORDER_CREATED,
            OrderEvent::OrderConfirmed(_) => ORDER_CONFIRMED,
            OrderEvent::OrderCancelled(_) => ORDER_CANCELLED,
            OrderEvent::OrderPreparationStarted(_) => ORDER_PREPARATION_STARTED,
            OrderEvent::OrderReady(_) => ORDER_READY,
            OrderEvent::OrderCompleted(_) => ORDER_COMPLETED,
        }
    }

    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::OrderCreated(d) => d.order_id,
            OrderEvent::OrderConfirmed(d) => d.order_id,
            OrderEvent::OrderCancelled(d) => d.order_id,
            OrderEvent::OrderPreparationStarted(d) => d.order_id,
            OrderEvent::OrderReady(d) => d.order_id,
            OrderEvent::OrderCompleted(d) => d.order_id,
        }
    }
}

/// Data for OrderCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreatedData {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub store_id: StoreId,

    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}

/// Data for OrderConfirmed event.
///
/// Carries a full copy of the items so consumers never need to load the
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmedData {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub store_id: StoreId,
    pub total_amount: Money,
    pub items: Vec<OrderItemSnapshot>,
}

/// Data for OrderCancelled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelledData {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub store_id: StoreId,
    pub reason: String,

    /// Status the order was in when it was cancelled.
    pub previous_status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPreparationStartedData {
    pub order_id: OrderId,
    pub store_id: StoreId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReadyData {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCompletedData {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub total_amount: Money,
    pub completed_at: DateTime<Utc>,
}
