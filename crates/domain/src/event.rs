//! Domain event envelope.

use chrono::{DateTime, Utc};
use common::EventId;
use serde::{Deserialize, Serialize};

use crate::customer::CustomerEvent;
use crate::order::OrderEvent;
use crate::store::StoreEvent;

/// A fact raised by an aggregate, wrapped with its routing metadata.
///
/// Handlers subscribe by [`event_name`](DomainEvent::event_name) and match on
/// the typed [`EventPayload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event identifier.
    pub event_id: EventId,

    /// Identifier of the aggregate that raised the event.
    pub aggregate_id: String,

    /// Type of the aggregate that raised the event.
    pub aggregate_type: String,

    /// When the event was raised.
    pub occurred_at: DateTime<Utc>,

    /// Event-specific data.
    pub payload: EventPayload,
}

impl DomainEvent {
    /// Creates an envelope stamped with a fresh id and the current time.
    pub fn new(
        aggregate_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Utc::now(),
            payload,
        }
    }

    /// Returns the dotted event name, e.g. `order.confirmed`.
    pub fn event_name(&self) -> &'static str {
        self.payload.event_name()
    }
}

/// Payload of a [`DomainEvent`], grouped by the aggregate that raises it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPayload {
    Store(StoreEvent),
    Order(OrderEvent),
    Customer(CustomerEvent),
}

impl EventPayload {
    pub fn event_name(&self) -> &'static str {
        match self {
            EventPayload::Store(e) => e.event_name(),
            EventPayload::Order(e) => e.event_name(),
            EventPayload::Customer(e) => e.event_name(),
        }
    }

    pub fn as_order(&self) -> Option<&OrderEvent> {
        match self {
            EventPayload::Order(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_store(&self) -> Option<&StoreEvent> {
        match self {
            EventPayload::Store(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_customer(&self) -> Option<&CustomerEvent> {
        match self {
            EventPayload::Customer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreEvent> for EventPayload {
    fn from(event: StoreEvent) -> Self {
        EventPayload::Store(event)
    }
}

impl From<OrderEvent> for EventPayload {
    fn from(event: OrderEvent) -> Self {
        EventPayload::Order(event)
    }
}

impl From<CustomerEvent> for EventPayload {
    fn from(event: CustomerEvent) -> Self {
        EventPayload::Customer(event)
    }
}
